//! Output format configuration.

use serde::{Deserialize, Serialize};

/// How review-event descriptions are rendered in interval modes.
///
/// `None` in [`OutputConfig::review_style`] keeps the per-mode default:
/// truncated-label for flow, fixed for arousal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStyleKind {
    /// Review marker plus the first asserted label, truncated.
    Truncated,
    /// Review marker plus the mode's fixed event label.
    Fixed,
    /// Review marker plus a per-scorer breakdown of asserted labels.
    PerRater,
}

/// Configuration for output records and descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Output record format. Default: "tsv". Also: "csv", "json".
    pub format: Option<String>,
    /// Marker prefixing every review description. Default: "Review".
    pub review_marker: Option<String>,
    /// Prefix for epoch-mode stage descriptions. Default: "Stage".
    pub stage_prefix: Option<String>,
    /// Character budget for truncated-label review descriptions. Default: 5.
    pub label_truncate: Option<usize>,
    /// Review description style override for interval modes.
    pub review_style: Option<ReviewStyleKind>,
}

impl OutputConfig {
    /// Returns the effective output format, defaulting to "tsv".
    pub fn effective_format(&self) -> String {
        self.format.clone().unwrap_or_else(|| "tsv".to_string())
    }

    /// Returns the effective review marker, defaulting to "Review".
    pub fn effective_review_marker(&self) -> String {
        self.review_marker
            .clone()
            .unwrap_or_else(|| "Review".to_string())
    }

    /// Returns the effective stage prefix, defaulting to "Stage".
    pub fn effective_stage_prefix(&self) -> String {
        self.stage_prefix
            .clone()
            .unwrap_or_else(|| "Stage".to_string())
    }

    /// Returns the effective label truncation budget, defaulting to 5.
    pub fn effective_label_truncate(&self) -> usize {
        self.label_truncate.unwrap_or(5)
    }
}
