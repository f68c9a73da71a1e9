//! Output writing errors.

use super::error_code::{self, ConcordErrorCode};

/// Errors raised while rendering or writing per-study output files.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Unknown output format: {format}")]
    UnknownFormat { format: String },

    #[error("Failed to render {format} output: {message}")]
    RenderFailed { format: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Io { path: String, message: String },
}

impl ConcordErrorCode for OutputError {
    fn error_code(&self) -> &'static str {
        error_code::OUTPUT_ERROR
    }
}
