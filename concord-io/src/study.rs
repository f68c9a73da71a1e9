//! Study discovery and per-study source loading.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use concord_core::config::ConcordConfig;
use concord_core::errors::{EpochError, ParseError};
use concord_core::types::{Scorer, ScoringMode, StudyAnnotations, StudyWarning};

use crate::parse;

/// One discovered study directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDir {
    pub id: String,
    pub path: PathBuf,
}

/// List the study directories under the data dir, sorted by id.
pub fn discover_studies(data_dir: &Path) -> Result<Vec<StudyDir>, ParseError> {
    let entries = fs::read_dir(data_dir).map_err(|e| ParseError::Io {
        path: data_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut studies = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            studies.push(StudyDir {
                id: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }
    }
    studies.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(studies)
}

/// Assemble one study's interval annotations for a mode.
///
/// A missing scorer file, or one parsing to zero events, degrades that
/// scorer to never-occupied and records a warning. Only unreadable or
/// malformed files fail the study.
pub fn load_study(
    study: &StudyDir,
    mode: ScoringMode,
    config: &ConcordConfig,
) -> Result<StudyAnnotations, ParseError> {
    let file_name = config.input.effective_event_file(mode);
    let mut annotations = StudyAnnotations::new(&study.id);

    for scorer in Scorer::ALL {
        let path = study.path.join(config.roster.name(scorer)).join(&file_name);
        if !path.exists() {
            tracing::warn!(
                study = %study.id,
                scorer = %scorer,
                path = %path.display(),
                "scorer source missing"
            );
            annotations.warnings.push(StudyWarning::MissingRaterSource {
                scorer,
                path: path.display().to_string(),
            });
            continue;
        }

        let parsed = parse::parse_event_file(&path, scorer)?;
        if parsed.intervals.is_empty() {
            tracing::warn!(
                study = %study.id,
                scorer = %scorer,
                path = %path.display(),
                "scorer source has no events"
            );
            annotations.warnings.push(StudyWarning::EmptyRaterSource {
                scorer,
                path: path.display().to_string(),
            });
            continue;
        }

        annotations.add_source(scorer, parsed.start_time, parsed.intervals);
    }

    Ok(annotations)
}

/// Locate the stage-grid CSV inside a study directory.
///
/// When several files match the stem pattern, the lexicographically first
/// wins; the grid file stem becomes the staging output's study id.
pub fn find_stage_grid(study: &StudyDir, pattern: &Regex) -> Result<PathBuf, EpochError> {
    let entries = fs::read_dir(&study.path).map_err(|e| EpochError::Io {
        path: study.path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
                && path
                    .file_stem()
                    .is_some_and(|stem| pattern.is_match(&stem.to_string_lossy()))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| EpochError::GridNotFound {
            study_id: study.id.clone(),
        })
}
