//! Segment classification: confirmed core plus review fringes.

use lasso::Spur;

use concord_core::types::Scorer;

use crate::segment::Segment;
use crate::timeline::Timeline;

use super::agreement;
use super::description::ReviewContext;
use super::policy::ConsensusPolicy;

/// What a resolved span represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Core span with sufficient agreement; both ends get refined.
    Confirmed,
    /// Fringe run outside the core, long enough to surface for review;
    /// only the onset gets refined.
    FringeReview,
    /// Whole segment without a confirmed core; both ends get refined.
    SegmentReview,
}

/// One bin-granular span classified by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub kind: SpanKind,
    pub start_bin: usize,
    pub end_bin: usize,
    pub description: String,
}

impl ResolvedSpan {
    pub fn is_confirmed(&self) -> bool {
        self.kind == SpanKind::Confirmed
    }
}

/// Outcome of resolving one segment, in emission order: the confirmed core
/// first, then the pre-core fringe, then the post-core fringe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResolution {
    pub spans: Vec<ResolvedSpan>,
    /// Fringe runs absorbed for being at or under the threshold.
    pub dropped_fringes: usize,
}

/// Classifies segments under one [`ConsensusPolicy`].
pub struct ConsensusResolver<'a> {
    policy: &'a ConsensusPolicy,
}

impl<'a> ConsensusResolver<'a> {
    pub fn new(policy: &'a ConsensusPolicy) -> Self {
        Self { policy }
    }

    /// Resolve one segment into a confirmed core plus review fringes, or a
    /// whole-segment review when no core confirms.
    ///
    /// The core span runs from the first to the last bin meeting
    /// `min_agreement`; interior bins below the threshold stay inside the
    /// core. Confirmation additionally requires a unanimous bin somewhere
    /// in the segment unless `require_unanimous_anchor` is off.
    pub fn resolve(&self, timeline: &Timeline, segment: &Segment) -> SegmentResolution {
        let mut core: Option<(usize, usize)> = None;
        let mut core_label: Option<Spur> = None;
        let mut unanimous_seen = false;

        for bin in segment.start_bin..=segment.end_bin {
            let agreement = agreement::evaluate(timeline.state(bin), self.policy.label_aware);
            if agreement.count >= self.policy.min_agreement {
                match core.as_mut() {
                    None => {
                        core = Some((bin, bin));
                        core_label = agreement.label;
                    }
                    Some((_, end)) => *end = bin,
                }
            }
            unanimous_seen |= agreement.unanimous;
        }

        let anchored = unanimous_seen || !self.policy.require_unanimous_anchor;
        let confirmed_core = match core {
            Some(span) if anchored => Some(span),
            _ => None,
        };

        let Some((core_start, core_end)) = confirmed_core else {
            return SegmentResolution {
                spans: vec![ResolvedSpan {
                    kind: SpanKind::SegmentReview,
                    start_bin: segment.start_bin,
                    end_bin: segment.end_bin,
                    description: self.review_at(timeline, segment.start_bin),
                }],
                dropped_fringes: 0,
            };
        };

        let consensus_label = core_label
            .map(|label| timeline.resolve(label))
            .unwrap_or_default();

        let mut spans = Vec::with_capacity(3);
        let mut dropped_fringes = 0;

        spans.push(ResolvedSpan {
            kind: SpanKind::Confirmed,
            start_bin: core_start,
            end_bin: core_end,
            description: self.policy.style.confirmed(consensus_label),
        });

        if core_start > segment.start_bin {
            let len = core_start - segment.start_bin;
            if len > self.policy.fringe_threshold as usize {
                spans.push(ResolvedSpan {
                    kind: SpanKind::FringeReview,
                    start_bin: segment.start_bin,
                    end_bin: core_start - 1,
                    description: self.review_at(timeline, segment.start_bin),
                });
            } else {
                dropped_fringes += 1;
            }
        }

        if core_end < segment.end_bin {
            let len = segment.end_bin - core_end;
            if len > self.policy.fringe_threshold as usize {
                spans.push(ResolvedSpan {
                    kind: SpanKind::FringeReview,
                    start_bin: core_end + 1,
                    end_bin: segment.end_bin,
                    description: self.review_at(timeline, core_end + 1),
                });
            } else {
                dropped_fringes += 1;
            }
        }

        SegmentResolution {
            spans,
            dropped_fringes,
        }
    }

    /// Render a review description from the state at one bin.
    fn review_at(&self, timeline: &Timeline, bin: usize) -> String {
        let mut labels = [None; Scorer::COUNT];
        for (slot, spur) in labels.iter_mut().zip(timeline.state(bin).iter()) {
            *slot = spur.map(|label| timeline.resolve(label));
        }
        self.policy.style.review(&ReviewContext { labels })
    }
}
