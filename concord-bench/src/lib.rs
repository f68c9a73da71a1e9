//! # concord-bench
//!
//! Benchmarks for the Concord reconciliation engine.
//!
//! Three tiers, all driven by the synthetic studies in [`fixtures`]:
//! - **Stage**: one pipeline stage (discretize, segment, resolve) over
//!   in-memory annotations.
//! - **Study**: a full `reconcile` call per iteration.
//! - **Batch**: the batch runner end to end over a generated study tree.
//!
//! Criterion harnesses live under `benches/`. Alongside criterion's own
//! output, CI persists a [`BenchRecord`] per benchmark and compares new
//! runs against the stored baseline with per-tier tolerances.

use std::path::Path;

pub mod fixtures;

/// Benchmark tier. Picks the tolerance applied when a run is compared
/// against the stored baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchTier {
    /// Single pipeline stage over in-memory annotations.
    Stage,
    /// One full reconcile per iteration.
    Study,
    /// Batch runner over a study tree on disk.
    Batch,
}

impl BenchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::Study => "study",
            Self::Batch => "batch",
        }
    }

    /// Slowdown tolerated before a run counts as a regression.
    ///
    /// Stage timings are steady enough for a tight bound; batch runs touch
    /// the filesystem and need more slack.
    pub fn tolerance(self) -> f64 {
        match self {
            Self::Stage => 0.15,
            Self::Study => 0.25,
            Self::Batch => 0.60,
        }
    }
}

/// One benchmark outcome, persisted as part of the CI baseline.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchRecord {
    pub name: String,
    pub tier: BenchTier,
    pub mean_ms: f64,
    /// Studies reconciled per timed iteration.
    pub studies: u64,
    /// Reconciled events per second, when the harness measured one.
    pub events_per_sec: Option<f64>,
}

impl BenchRecord {
    /// Mean slowdown relative to `baseline`; 1.0 means unchanged.
    /// `None` when the baseline carries no usable timing.
    pub fn slowdown_vs(&self, baseline: &BenchRecord) -> Option<f64> {
        (baseline.mean_ms > 0.0).then(|| self.mean_ms / baseline.mean_ms)
    }

    /// True when this run exceeds the baseline by more than the tier's
    /// tolerance.
    pub fn regresses_vs(&self, baseline: &BenchRecord) -> bool {
        self.slowdown_vs(baseline)
            .is_some_and(|ratio| ratio > 1.0 + self.tier.tolerance())
    }
}

/// Write records as a pretty-printed JSON baseline file.
pub fn write_baseline(path: &Path, records: &[BenchRecord]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

/// Load a baseline written by [`write_baseline`].
pub fn read_baseline(path: &Path) -> std::io::Result<Vec<BenchRecord>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
