//! Input discovery configuration.

use serde::{Deserialize, Serialize};

use crate::types::ScoringMode;

/// Where each mode's source files live inside a study directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Per-scorer flow export file name. Default: "Flow Events.txt".
    pub flow_file: Option<String>,
    /// Per-scorer arousal export file name. Default: "Classification Arousals.txt".
    pub arousal_file: Option<String>,
    /// Per-scorer markers file name (merge anchor). Default: "Markers.txt".
    pub markers_file: Option<String>,
    /// Regex a stage-grid file stem must match. Default: `^[A-Za-z]{3}\d{2,3}`.
    pub stage_grid_pattern: Option<String>,
}

impl InputConfig {
    /// Source file name for an interval mode. Panics on staging, which has
    /// no per-scorer event file.
    pub fn effective_event_file(&self, mode: ScoringMode) -> String {
        match mode {
            ScoringMode::Flow => self
                .flow_file
                .clone()
                .unwrap_or_else(|| "Flow Events.txt".to_string()),
            ScoringMode::Arousal => self
                .arousal_file
                .clone()
                .unwrap_or_else(|| "Classification Arousals.txt".to_string()),
            ScoringMode::Staging => unreachable!("staging mode has no per-scorer event file"),
        }
    }

    /// Returns the effective markers file name.
    pub fn effective_markers_file(&self) -> String {
        self.markers_file
            .clone()
            .unwrap_or_else(|| "Markers.txt".to_string())
    }

    /// Returns the effective stage-grid file-stem pattern.
    pub fn effective_stage_grid_pattern(&self) -> String {
        self.stage_grid_pattern
            .clone()
            .unwrap_or_else(|| r"^[A-Za-z]{3}\d{2,3}".to_string())
    }
}
