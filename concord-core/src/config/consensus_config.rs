//! Interval-mode consensus configuration.

use serde::{Deserialize, Serialize};

/// Which instants of the grid an interval `[start, end]` occupies.
///
/// Annotation exports disagree on whether the end instant belongs to the
/// event, so the convention is explicit configuration rather than a
/// constant. Attribution of the boundary bin shifts by one bin between the
/// two conventions when `end` falls exactly on a grid instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Coverage {
    /// Bin at `t` is occupied iff `start <= t <= end`.
    #[default]
    Closed,
    /// Bin at `t` is occupied iff `start <= t < end`.
    HalfOpen,
}

/// Configuration for the interval-mode consensus engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Grid resolution in seconds. Default: 1 (legacy exports used 3).
    pub resolution_secs: Option<u64>,
    /// Scorers that must agree on a bin to open a core span. Default: 2.
    pub min_agreement: Option<u32>,
    /// Require at least one fully-unanimous bin in a segment before the
    /// core span confirms. Default: true. Two-scorer agreement alone,
    /// without unanimous confirmation anywhere in the segment, sends the
    /// segment to review.
    pub require_unanimous_anchor: Option<bool>,
    /// Fringe runs of at most this many bins are absorbed silently; longer
    /// runs become review events. Default: 5.
    pub fringe_threshold: Option<u32>,
    /// Interval coverage convention. Default: closed.
    pub coverage: Option<Coverage>,
    /// Maximum plausible study span in days. Default: 2.
    pub max_span_days: Option<i64>,
}

impl ConsensusConfig {
    /// Returns the effective grid resolution, defaulting to 1 second.
    pub fn effective_resolution_secs(&self) -> u64 {
        self.resolution_secs.unwrap_or(1)
    }

    /// Returns the effective minimum agreement, defaulting to 2.
    pub fn effective_min_agreement(&self) -> u32 {
        self.min_agreement.unwrap_or(2)
    }

    /// Returns whether a unanimous anchor bin is required, defaulting to true.
    pub fn effective_require_unanimous_anchor(&self) -> bool {
        self.require_unanimous_anchor.unwrap_or(true)
    }

    /// Returns the effective fringe threshold in bins, defaulting to 5.
    pub fn effective_fringe_threshold(&self) -> u32 {
        self.fringe_threshold.unwrap_or(5)
    }

    /// Returns the effective coverage convention, defaulting to closed.
    pub fn effective_coverage(&self) -> Coverage {
        self.coverage.unwrap_or_default()
    }

    /// Returns the effective span sanity bound, defaulting to 2 days.
    pub fn effective_max_span_days(&self) -> i64 {
        self.max_span_days.unwrap_or(2)
    }
}
