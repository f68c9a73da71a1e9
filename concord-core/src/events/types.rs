//! Event payload types for the run lifecycle.

use std::path::PathBuf;

use crate::types::{Scorer, ScoringMode};

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub root: PathBuf,
    pub mode: ScoringMode,
    pub study_count: usize,
}

/// Payload for `on_study_started`.
#[derive(Debug, Clone)]
pub struct StudyStartedEvent {
    pub study_id: String,
}

/// Payload for `on_study_reconciled`.
#[derive(Debug, Clone)]
pub struct StudyReconciledEvent {
    pub study_id: String,
    pub confirmed: usize,
    pub review: usize,
    pub duration_ms: u64,
}

/// Payload for `on_study_failed`.
#[derive(Debug, Clone)]
pub struct StudyFailedEvent {
    pub study_id: String,
    pub message: String,
}

/// Payload for `on_rater_source_missing`.
#[derive(Debug, Clone)]
pub struct RaterSourceMissingEvent {
    pub study_id: String,
    pub scorer: Scorer,
    pub path: PathBuf,
}

/// Payload for `on_run_completed`.
#[derive(Debug, Clone)]
pub struct RunCompletedEvent {
    pub reconciled: usize,
    pub failed: usize,
    pub duration_ms: u64,
}
