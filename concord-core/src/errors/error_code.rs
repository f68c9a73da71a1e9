//! Stable error codes for machine-readable reporting.

/// Trait mapping every error to a stable, grep-able code.
///
/// Codes end up in the run summary and in `StudyFailedEvent` payloads, so
/// they must never change once shipped.
pub trait ConcordErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_ERROR: &str = "CONCORD_CONFIG";
pub const PARSE_ERROR: &str = "CONCORD_PARSE";
pub const EMPTY_STUDY: &str = "CONCORD_EMPTY_STUDY";
pub const IMPLAUSIBLE_SPAN: &str = "CONCORD_IMPLAUSIBLE_SPAN";
pub const EPOCH_COLUMNS: &str = "CONCORD_EPOCH_COLUMNS";
pub const OUTPUT_ERROR: &str = "CONCORD_OUTPUT";
