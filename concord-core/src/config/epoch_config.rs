//! Epoch-mode (sleep staging) configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the epoch consensus resolver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EpochConfig {
    /// Epoch duration in seconds. Default: 30.
    pub epoch_secs: Option<u64>,
    /// When true, a two-scorer majority is not acceptable consensus and is
    /// downgraded to the sentinel label. Default: false.
    pub require_full_agreement: Option<bool>,
    /// Label emitted for epochs without consensus. Default: "-".
    pub sentinel: Option<String>,
}

impl EpochConfig {
    /// Returns the effective epoch length, defaulting to 30 seconds.
    pub fn effective_epoch_secs(&self) -> u64 {
        self.epoch_secs.unwrap_or(30)
    }

    /// Returns whether full agreement is required, defaulting to false.
    pub fn effective_require_full_agreement(&self) -> bool {
        self.require_full_agreement.unwrap_or(false)
    }

    /// Returns the effective no-consensus sentinel, defaulting to "-".
    pub fn effective_sentinel(&self) -> String {
        self.sentinel.clone().unwrap_or_else(|| "-".to_string())
    }
}
