//! File I/O for Concord: annotation-export parsers, per-study output
//! writers, study discovery, the batch runner, and the per-subject
//! combine/merge passes.
//!
//! Everything here moves data between disk and the engine. The consensus
//! rules themselves live in `concord-engine`; this crate only knows file
//! formats and directory layout.

pub mod combine;
pub mod parse;
pub mod runner;
pub mod study;
pub mod summary;
pub mod write;

pub use runner::{BatchRunner, RunOptions};
pub use summary::{RateStats, RunSummary, StudyFailure, StudyReport};
