//! Interval-mode reconciliation errors.

use chrono::NaiveDateTime;

use super::error_code::{self, ConcordErrorCode};

/// Terminal errors from the interval-mode consensus engine.
///
/// Both variants fail the study as a whole; processing continues with the
/// next study.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// No scorer contributed a single interval.
    #[error("Study {study_id}: no events found in any scorer source")]
    EmptyStudy { study_id: String },

    /// The grid would span more than the sanity bound. Almost always a
    /// date-normalization defect upstream, not a real multi-day recording.
    #[error(
        "Study {study_id}: span from {origin} to {last_end} exceeds {max_span_days} days"
    )]
    ImplausibleSpan {
        study_id: String,
        origin: NaiveDateTime,
        last_end: NaiveDateTime,
        max_span_days: i64,
    },
}

impl ConcordErrorCode for ReconcileError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyStudy { .. } => error_code::EMPTY_STUDY,
            Self::ImplausibleSpan { .. } => error_code::IMPLAUSIBLE_SPAN,
        }
    }
}
