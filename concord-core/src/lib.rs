//! Core types, configuration, errors, and run events for Concord.
//!
//! Concord reconciles independent sleep-study annotations from three
//! scorers into a single consensus timeline. This crate holds everything
//! the engine, I/O, and CLI crates share: the interval/event data model,
//! the TOML configuration system, the per-subsystem error taxonomy, and
//! the synchronous run-event dispatcher.

pub mod config;
pub mod errors;
pub mod events;
pub mod types;
