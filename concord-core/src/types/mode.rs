//! Scoring modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which annotation stream a run reconciles.
///
/// Flow and arousal are interval modes and go through the full
/// discretize/segment/resolve pipeline; staging is the epoch mode and
/// votes per fixed 30 s epoch with no discretization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Flow,
    Arousal,
    Staging,
}

impl ScoringMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringMode::Flow => "flow",
            ScoringMode::Arousal => "arousal",
            ScoringMode::Staging => "staging",
        }
    }

    /// True for the modes that reconcile labeled time intervals.
    pub fn is_interval(self) -> bool {
        !matches!(self, ScoringMode::Staging)
    }

    /// Fixed event-type label for descriptions that ignore scorer labels.
    pub fn event_label(self) -> &'static str {
        match self {
            ScoringMode::Flow => "Flow Event",
            ScoringMode::Arousal => "Arousal",
            ScoringMode::Staging => "Stage",
        }
    }

    /// Suffix of the per-study output file, appended to the study id.
    pub fn output_suffix(self) -> &'static str {
        match self {
            ScoringMode::Flow => "_flow_reconciliation",
            ScoringMode::Arousal => "_arousal_reconciliation",
            ScoringMode::Staging => "_stage_annotations",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
