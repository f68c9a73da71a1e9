//! Stage-grid parsing: per-epoch scorer labels from `;`-separated CSVs.

use std::fs;
use std::path::Path;

use aho_corasick::AhoCorasick;

use concord_core::config::RosterConfig;
use concord_core::errors::EpochError;
use concord_core::types::{Scorer, StageGrid};

/// Resolves scorer columns in a stage-grid header and extracts the
/// row-aligned label grid.
///
/// Header cells are matched by scorer-code containment, all codes in one
/// scan. A code matching several cells is narrowed by the site's autoscore
/// alias spellings; a code matching none falls back to the `AS - <code>`
/// spelling. Anything still unresolved fails that file.
pub struct StageGridParser {
    codes: [String; Scorer::COUNT],
    matcher: AhoCorasick,
}

impl StageGridParser {
    pub fn new(roster: &RosterConfig) -> Self {
        let codes = roster.effective_scorers();
        let matcher = AhoCorasick::new(&codes).expect("scorer codes build a valid matcher");
        Self { codes, matcher }
    }

    /// Parse one stage-grid file. The grid's study id is the file stem.
    pub fn parse(&self, path: &Path) -> Result<StageGrid, EpochError> {
        let content = fs::read_to_string(path).map_err(|e| EpochError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let study_id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.parse_text(&content, &path.display().to_string(), &study_id)
    }

    /// Parse grid text already read into memory.
    pub fn parse_text(
        &self,
        content: &str,
        path: &str,
        study_id: &str,
    ) -> Result<StageGrid, EpochError> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());
        let Some(header) = lines.next() else {
            return Err(EpochError::MissingColumns {
                path: path.to_string(),
                details: "empty stage grid".to_string(),
            });
        };
        let cells: Vec<&str> = header.split(';').map(str::trim).collect();
        let columns = self.resolve_columns(&cells, path)?;

        let mut grid = StageGrid::new(study_id);
        for line in lines {
            let row: Vec<&str> = line.split(';').map(str::trim).collect();
            grid.rows.push(columns.map(|column| {
                row.get(column).copied().unwrap_or_default().to_string()
            }));
        }

        tracing::debug!(path, epochs = grid.epoch_count(), "parsed stage grid");
        Ok(grid)
    }

    /// Map each scorer code to exactly one header column.
    fn resolve_columns(
        &self,
        cells: &[&str],
        path: &str,
    ) -> Result<[usize; Scorer::COUNT], EpochError> {
        let mut matches: [Vec<usize>; Scorer::COUNT] = Default::default();
        for (column, cell) in cells.iter().enumerate() {
            let mut seen = [false; Scorer::COUNT];
            for hit in self.matcher.find_overlapping_iter(cell) {
                let scorer = hit.pattern().as_usize();
                if !seen[scorer] {
                    seen[scorer] = true;
                    matches[scorer].push(column);
                }
            }
        }

        // Several columns can legitimately mention a code (manual plus
        // autoscore exports); prefer the autoscore spellings.
        for index in 0..Scorer::COUNT {
            if matches[index].len() > 1 {
                for alias in Self::alias_candidates(&self.codes[index]) {
                    if let Some(&column) =
                        matches[index].iter().find(|&&column| cells[column] == alias)
                    {
                        matches[index] = vec![column];
                        break;
                    }
                }
            }
        }

        if matches.iter().any(|columns| columns.len() > 1) {
            return Err(EpochError::AmbiguousColumns {
                path: path.to_string(),
                details: self.column_details(cells, &matches),
            });
        }

        for index in 0..Scorer::COUNT {
            if matches[index].is_empty() {
                let fallback = format!("AS - {}", self.codes[index].to_lowercase());
                matches[index] = cells
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.contains(&fallback))
                    .map(|(column, _)| column)
                    .collect();
            }
        }

        if matches.iter().any(|columns| columns.len() != 1) {
            return Err(EpochError::MissingColumns {
                path: path.to_string(),
                details: self.column_details(cells, &matches),
            });
        }

        Ok([matches[0][0], matches[1][0], matches[2][0]])
    }

    fn alias_candidates(code: &str) -> [String; 5] {
        [
            format!("AUTOSCORE {code}"),
            format!("AUTO-SCORE {code}"),
            format!("AUTO SCORE {code}"),
            format!("{code}-AUTOSCORE"),
            format!("AS{code}"),
        ]
    }

    fn column_details(&self, cells: &[&str], matches: &[Vec<usize>; Scorer::COUNT]) -> String {
        Scorer::ALL
            .iter()
            .map(|scorer| {
                let hits: Vec<&str> = matches[scorer.index()]
                    .iter()
                    .map(|&column| cells[column])
                    .collect();
                format!("{}={:?}", self.codes[scorer.index()], hits)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
