//! Per-study error aggregation.

use super::error_code::ConcordErrorCode;
use super::{ConfigError, EpochError, OutputError, ParseError, ReconcileError};

/// Everything that can terminally fail one study.
/// Aggregates subsystem errors via `From` conversions.
///
/// Failures are isolated at study granularity: the batch runner records
/// the error, writes no partial output for that study, and moves on.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("Epoch error: {0}")]
    Epoch(#[from] EpochError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ConcordErrorCode for StudyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Reconcile(e) => e.error_code(),
            Self::Epoch(e) => e.error_code(),
            Self::Output(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
