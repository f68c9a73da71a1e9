//! Annotation-source parse errors.

use super::error_code::{self, ConcordErrorCode};

/// Errors raised while reading annotation exports.
///
/// A *missing* scorer source is not an error: the study degrades to a
/// never-occupied scorer and records a [`crate::types::StudyWarning`].
/// These variants cover files that exist but cannot be understood.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Start Time header not found in {path}")]
    MissingStartTime { path: String },

    #[error("Unparseable timestamp {value:?} in {path}")]
    InvalidTimestamp { path: String, value: String },

    #[error("Malformed annotation row in {path}: {message}")]
    MalformedRow { path: String, message: String },
}

impl ConcordErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
