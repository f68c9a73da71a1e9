//! Error handling for Concord.
//! One `thiserror` enum per subsystem; no `anyhow` in library code.

pub mod config_error;
pub mod epoch_error;
pub mod error_code;
pub mod output_error;
pub mod parse_error;
pub mod reconcile_error;
pub mod study_error;

pub use config_error::ConfigError;
pub use epoch_error::EpochError;
pub use error_code::ConcordErrorCode;
pub use output_error::OutputError;
pub use parse_error::ParseError;
pub use reconcile_error::ReconcileError;
pub use study_error::StudyError;
