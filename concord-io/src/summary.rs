//! Run outcome aggregation: per-study reports and the run-level summary.

use serde::Serialize;
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

use concord_core::types::collections::FxHashMap;
use concord_core::types::{ScoringMode, StudyWarning};

/// Outcome of one successfully reconciled study.
#[derive(Debug, Clone, Serialize)]
pub struct StudyReport {
    pub study_id: String,
    /// Where the annotation file was written.
    pub output_path: String,
    pub confirmed: usize,
    pub review: usize,
    pub warnings: Vec<StudyWarning>,
    pub duration_ms: u64,
}

impl StudyReport {
    /// Share of emitted annotations flagged for manual review, in percent.
    pub fn review_rate(&self) -> f64 {
        let total = self.confirmed + self.review;
        if total == 0 {
            0.0
        } else {
            self.review as f64 * 100.0 / total as f64
        }
    }
}

/// A study the run had to skip. Failures never abort the run.
#[derive(Debug, Clone, Serialize)]
pub struct StudyFailure {
    pub study_id: String,
    pub error: String,
    pub code: &'static str,
}

/// Distribution of per-study review rates across one run, in percent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RateStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub lower_quartile: f64,
    pub upper_quartile: f64,
}

impl RateStats {
    fn from_rates(rates: Vec<f64>) -> Option<Self> {
        if rates.is_empty() {
            return None;
        }
        let mut data = Data::new(rates);
        Some(Self {
            mean: data.mean().unwrap_or(0.0),
            min: data.min(),
            max: data.max(),
            median: data.median(),
            lower_quartile: data.lower_quartile(),
            upper_quartile: data.upper_quartile(),
        })
    }
}

/// Aggregated outcome of one batch run over a data directory.
///
/// Reports and failures are kept sorted by study id so renders are stable
/// regardless of worker scheduling.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: ScoringMode,
    pub reports: Vec<StudyReport>,
    pub failures: Vec<StudyFailure>,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.reports.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total_confirmed(&self) -> usize {
        self.reports.iter().map(|r| r.confirmed).sum()
    }

    pub fn total_review(&self) -> usize {
        self.reports.iter().map(|r| r.review).sum()
    }

    /// Review rate pooled over all studies, in percent.
    pub fn overall_review_rate(&self) -> f64 {
        let total = self.total_confirmed() + self.total_review();
        if total == 0 {
            0.0
        } else {
            self.total_review() as f64 * 100.0 / total as f64
        }
    }

    /// Per-study review rate distribution. `None` for a run with no
    /// successful studies.
    pub fn review_rate_stats(&self) -> Option<RateStats> {
        RateStats::from_rates(self.reports.iter().map(StudyReport::review_rate).collect())
    }

    /// Failure counts grouped by error code.
    pub fn failure_breakdown(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for failure in &self.failures {
            *counts.entry(failure.code).or_insert(0) += 1;
        }
        counts
    }

    /// Human-readable terminal report.
    pub fn render_console(&self) -> String {
        let mut output = String::new();

        output.push_str("╔══════════════════════════════════════════╗\n");
        output.push_str("║      Concord Reconciliation Summary      ║\n");
        output.push_str("╚══════════════════════════════════════════╝\n\n");
        output.push_str(&format!("Mode: {}\n\n", self.mode));

        for report in &self.reports {
            output.push_str(&format!(
                "✓ {}  {} confirmed, {} review ({:.1}%)  {}\n",
                report.study_id,
                report.confirmed,
                report.review,
                report.review_rate(),
                report.output_path,
            ));
            for warning in &report.warnings {
                output.push_str(&format!("  ⚠ {warning}\n"));
            }
        }
        for failure in &self.failures {
            output.push_str(&format!("✗ {}  {}\n", failure.study_id, failure.error));
        }

        let processed = self.processed();
        let total = processed + self.failed();
        output.push_str(&format!(
            "\n─── Summary: {processed}/{total} studies reconciled, {} confirmed, {} review ───\n",
            self.total_confirmed(),
            self.total_review(),
        ));
        if let Some(stats) = self.review_rate_stats() {
            output.push_str(&format!(
                "Review rate: mean {:.1}%, median {:.1}%, range {:.1}%-{:.1}%\n",
                stats.mean, stats.median, stats.min, stats.max,
            ));
        }
        if !self.failures.is_empty() {
            let mut codes: Vec<(&str, usize)> = self.failure_breakdown().into_iter().collect();
            codes.sort();
            let parts: Vec<String> = codes
                .iter()
                .map(|(code, count)| format!("{code} x{count}"))
                .collect();
            output.push_str(&format!("Failures by code: {}\n", parts.join(", ")));
        }

        if self.failures.is_empty() {
            output.push_str("Result: COMPLETED ✓\n");
        } else {
            output.push_str("Result: COMPLETED WITH FAILURES ✗\n");
        }

        output
    }

    /// Machine-readable report for downstream tooling.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
