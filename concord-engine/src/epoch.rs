//! Epoch consensus resolver for sleep staging.

use std::fmt;

use serde::Serialize;

use concord_core::config::{EpochConfig, OutputConfig};
use concord_core::types::{Annotation, Onset, Scorer, StageGrid};

/// Majority vote over fixed-duration scoring epochs.
///
/// No discretization, no segments, no fringes: each epoch is independent
/// and emitted one-to-one. Onsets stay relative (seconds from the staging
/// anchor) until the merge step resolves them.
pub struct EpochResolver {
    epoch_secs: u64,
    require_full_agreement: bool,
    sentinel: String,
    stage_prefix: String,
}

/// Agreement tally over one study's epochs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EpochStats {
    pub epochs: usize,
    /// All three scorers asserted the same label.
    pub unanimous: usize,
    /// Exactly two scorers agreed.
    pub partial_agreement: usize,
    /// All three disagreed.
    pub disagreement: usize,
    /// Epochs emitted with the sentinel label. Equals `disagreement`
    /// unless full agreement is required, which adds the partials.
    pub flagged: usize,
}

impl EpochStats {
    /// Percentage of epochs flagged for review.
    pub fn review_rate(&self) -> f64 {
        if self.epochs == 0 {
            return 0.0;
        }
        self.flagged as f64 / self.epochs as f64 * 100.0
    }
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EpochStats {{ epochs={}, unanimous={}, partial={}, disagreement={}, flagged={} ({:.1}%) }}",
            self.epochs,
            self.unanimous,
            self.partial_agreement,
            self.disagreement,
            self.flagged,
            self.review_rate(),
        )
    }
}

impl EpochResolver {
    pub fn new(epoch: &EpochConfig, output: &OutputConfig) -> Self {
        Self {
            epoch_secs: epoch.effective_epoch_secs(),
            require_full_agreement: epoch.effective_require_full_agreement(),
            sentinel: epoch.effective_sentinel(),
            stage_prefix: output.effective_stage_prefix(),
        }
    }

    /// Vote every epoch of the grid.
    ///
    /// Unanimous epochs emit their label. Two-agreeing epochs emit the
    /// majority label, or the sentinel when full agreement is required.
    /// Fully-disagreeing epochs always emit the sentinel.
    pub fn resolve(&self, grid: &StageGrid) -> (Vec<Annotation>, EpochStats) {
        let mut annotations = Vec::with_capacity(grid.epoch_count());
        let mut stats = EpochStats::default();

        for (index, row) in grid.rows.iter().enumerate() {
            stats.epochs += 1;
            let label = match self.vote(row) {
                Vote::Unanimous(label) => {
                    stats.unanimous += 1;
                    label
                }
                Vote::Majority(label) => {
                    stats.partial_agreement += 1;
                    if self.require_full_agreement {
                        stats.flagged += 1;
                        self.sentinel.as_str()
                    } else {
                        label
                    }
                }
                Vote::None => {
                    stats.disagreement += 1;
                    stats.flagged += 1;
                    self.sentinel.as_str()
                }
            };

            annotations.push(Annotation::new(
                Onset::Relative(index as u64 * self.epoch_secs),
                self.epoch_secs as f64,
                format!("{}: {label}", self.stage_prefix),
            ));
        }

        tracing::debug!(
            study = %grid.study_id,
            epochs = stats.epochs,
            flagged = stats.flagged,
            "resolved stage epochs"
        );

        (annotations, stats)
    }

    fn vote<'a>(&self, row: &'a [String; Scorer::COUNT]) -> Vote<'a> {
        let [a, b, c] = row;
        if a == b && b == c {
            Vote::Unanimous(a.as_str())
        } else if a == b || a == c {
            Vote::Majority(a.as_str())
        } else if b == c {
            Vote::Majority(b.as_str())
        } else {
            Vote::None
        }
    }
}

enum Vote<'a> {
    Unanimous(&'a str),
    Majority(&'a str),
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::config::{EpochConfig, OutputConfig};

    fn resolver(strict: bool) -> EpochResolver {
        let epoch = EpochConfig {
            require_full_agreement: Some(strict),
            ..Default::default()
        };
        EpochResolver::new(&epoch, &OutputConfig::default())
    }

    fn grid(rows: &[[&str; 3]]) -> StageGrid {
        let mut grid = StageGrid::new("AWV001");
        grid.rows = rows
            .iter()
            .map(|row| row.map(str::to_string))
            .collect();
        grid
    }

    #[test]
    fn test_unanimous_epoch_emits_label() {
        let (annotations, stats) = resolver(false).resolve(&grid(&[["W", "W", "W"]]));
        assert_eq!(annotations[0].description, "Stage: W");
        assert_eq!(annotations[0].onset, Onset::Relative(0));
        assert_eq!(annotations[0].duration_secs, 30.0);
        assert_eq!(stats.unanimous, 1);
        assert_eq!(stats.flagged, 0);
    }

    #[test]
    fn test_majority_epoch_emits_majority_label() {
        let (annotations, stats) = resolver(false).resolve(&grid(&[
            ["N2", "N2", "N3"],
            ["N1", "R", "R"],
        ]));
        assert_eq!(annotations[0].description, "Stage: N2");
        assert_eq!(annotations[1].description, "Stage: R");
        assert_eq!(stats.partial_agreement, 2);
        assert_eq!(stats.flagged, 0);
    }

    #[test]
    fn test_strict_mode_downgrades_majority() {
        let (annotations, stats) = resolver(true).resolve(&grid(&[["N2", "N2", "N3"]]));
        assert_eq!(annotations[0].description, "Stage: -");
        assert_eq!(stats.partial_agreement, 1);
        assert_eq!(stats.flagged, 1);
    }

    #[test]
    fn test_full_disagreement_emits_sentinel() {
        let (annotations, stats) = resolver(false).resolve(&grid(&[["W", "N1", "R"]]));
        assert_eq!(annotations[0].description, "Stage: -");
        assert_eq!(stats.disagreement, 1);
        assert_eq!(stats.flagged, 1);
    }

    #[test]
    fn test_onsets_step_by_epoch_length() {
        let (annotations, _) = resolver(false).resolve(&grid(&[
            ["W", "W", "W"],
            ["W", "W", "W"],
            ["N1", "N1", "N1"],
        ]));
        assert_eq!(annotations[0].onset, Onset::Relative(0));
        assert_eq!(annotations[1].onset, Onset::Relative(30));
        assert_eq!(annotations[2].onset, Onset::Relative(60));
    }
}
