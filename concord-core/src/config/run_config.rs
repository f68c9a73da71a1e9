//! Batch-run configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads for the per-study fan-out. Default: 1 (sequential).
    /// 0 means one worker per logical core.
    pub threads: Option<usize>,
}

impl RunConfig {
    /// Returns the effective worker count, defaulting to 1.
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(1)
    }
}
