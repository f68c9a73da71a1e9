//! Consensus policy: one parameterized strategy for both interval modes.

use concord_core::config::{ConcordConfig, ReviewStyleKind};
use concord_core::types::ScoringMode;

use super::description::DescriptionStyle;

/// Everything the resolver needs to classify a segment.
///
/// Flow and arousal differ only in these knobs: flow agreement is
/// label-aware with truncated-label review descriptions, arousal agreement
/// is plain occupancy with a fixed event label. Both share the same core
/// span and fringe rules.
#[derive(Debug, Clone)]
pub struct ConsensusPolicy {
    /// Scorers that must agree on a bin to open the core span.
    pub min_agreement: u32,
    /// Whether a segment confirms only after at least one unanimous bin.
    pub require_unanimous_anchor: bool,
    /// Fringe runs of at most this many bins are absorbed silently.
    pub fringe_threshold: u32,
    /// Whether agreement requires matching labels or mere occupancy.
    pub label_aware: bool,
    /// Rendering of confirmed and review descriptions.
    pub style: DescriptionStyle,
}

impl ConsensusPolicy {
    /// Policy for an interval scoring mode under the given configuration.
    ///
    /// `output.review_style` overrides the per-mode default style:
    /// truncated-label for flow, fixed for arousal.
    pub fn for_mode(mode: ScoringMode, config: &ConcordConfig) -> Self {
        debug_assert!(mode.is_interval());

        let marker = config.output.effective_review_marker();
        let style = match (config.output.review_style, mode) {
            (Some(ReviewStyleKind::PerRater), _) => DescriptionStyle::PerRater {
                marker,
                names: config.roster.effective_scorers(),
            },
            (Some(ReviewStyleKind::Fixed), _) | (None, ScoringMode::Arousal) => {
                DescriptionStyle::Fixed {
                    marker,
                    label: mode.event_label().to_string(),
                }
            }
            _ => DescriptionStyle::TruncatedLabel {
                marker,
                max_len: config.output.effective_label_truncate(),
            },
        };

        Self {
            min_agreement: config.consensus.effective_min_agreement(),
            require_unanimous_anchor: config.consensus.effective_require_unanimous_anchor(),
            fringe_threshold: config.consensus.effective_fringe_threshold(),
            label_aware: mode == ScoringMode::Flow,
            style,
        }
    }
}
