//! Epoch-mode (stage grid) errors.

use super::error_code::{self, ConcordErrorCode};

/// Errors raised while resolving a stage-grid file.
///
/// Fatal for that file only; the run continues with the next study.
#[derive(Debug, thiserror::Error)]
pub enum EpochError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// More than one header column matched a scorer code even after the
    /// preferred-alias pass.
    #[error("Multiple columns match scorer codes in {path}: {details}")]
    AmbiguousColumns { path: String, details: String },

    /// At least one scorer code matched no header column.
    #[error("Missing scorer columns in {path}: {details}")]
    MissingColumns { path: String, details: String },

    #[error("No stage grid file found for study {study_id}")]
    GridNotFound { study_id: String },
}

impl ConcordErrorCode for EpochError {
    fn error_code(&self) -> &'static str {
        error_code::EPOCH_COLUMNS
    }
}
