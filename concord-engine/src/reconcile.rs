//! Per-study reconciliation orchestrator.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use concord_core::config::ConcordConfig;
use concord_core::errors::ReconcileError;
use concord_core::types::{
    Annotation, ReconciledEvent, ScoringMode, StageGrid, StudyAnnotations,
};

use crate::consensus::{ConsensusPolicy, ConsensusResolver, SpanKind};
use crate::epoch::{EpochResolver, EpochStats};
use crate::refine::BoundaryRefiner;
use crate::segment;
use crate::timeline::Discretizer;

/// The consensus engine for one configuration.
///
/// Holds no per-study state: every call is a deterministic pure function of
/// its input, so studies can fan out across workers freely.
pub struct ReconcileEngine {
    config: ConcordConfig,
}

/// Reconciled output of one study in an interval mode.
#[derive(Debug, Clone)]
pub struct StudyReconciliation {
    pub study_id: String,
    /// Events in emission order: per segment, the confirmed core first,
    /// then the pre-core fringe, then the post-core fringe.
    pub events: Vec<ReconciledEvent>,
    pub diagnostics: StudyDiagnostics,
}

impl StudyReconciliation {
    /// Flat output rows for the writers.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.events.iter().map(ReconciledEvent::annotation).collect()
    }
}

/// Per-study tallies from the interval pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudyDiagnostics {
    pub bins: usize,
    pub segments: usize,
    pub confirmed: usize,
    pub fringe_reviews: usize,
    pub segment_reviews: usize,
    pub dropped_fringes: usize,
}

impl StudyDiagnostics {
    pub fn review_events(&self) -> usize {
        self.fringe_reviews + self.segment_reviews
    }

    pub fn total_events(&self) -> usize {
        self.confirmed + self.review_events()
    }

    /// Percentage of emitted events flagged for review.
    pub fn review_rate(&self) -> f64 {
        if self.total_events() == 0 {
            return 0.0;
        }
        self.review_events() as f64 / self.total_events() as f64 * 100.0
    }
}

impl fmt::Display for StudyDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StudyDiagnostics {{ bins={}, segments={}, confirmed={}, fringe_reviews={}, segment_reviews={}, dropped_fringes={}, review_rate={:.1}% }}",
            self.bins,
            self.segments,
            self.confirmed,
            self.fringe_reviews,
            self.segment_reviews,
            self.dropped_fringes,
            self.review_rate(),
        )
    }
}

impl ReconcileEngine {
    pub fn new(config: ConcordConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConcordConfig {
        &self.config
    }

    /// Run the interval pipeline on one study: discretize, segment,
    /// resolve, refine.
    pub fn reconcile(
        &self,
        mode: ScoringMode,
        annotations: &StudyAnnotations,
    ) -> Result<StudyReconciliation, ReconcileError> {
        let timeline = Discretizer::new(&self.config.consensus).discretize(annotations)?;
        let segments = segment::split(&timeline);

        let policy = ConsensusPolicy::for_mode(mode, &self.config);
        let resolver = ConsensusResolver::new(&policy);
        let refiner = BoundaryRefiner::new(
            timeline.grid(),
            annotations,
            self.config.consensus.effective_coverage(),
        );

        let mut events = Vec::new();
        let mut diagnostics = StudyDiagnostics {
            bins: timeline.len(),
            segments: segments.len(),
            ..Default::default()
        };

        for seg in &segments {
            let resolution = resolver.resolve(&timeline, seg);
            diagnostics.dropped_fringes += resolution.dropped_fringes;

            let mut core: Option<(usize, NaiveDateTime)> = None;
            for span in resolution.spans {
                let (onset, end) = match span.kind {
                    SpanKind::Confirmed => {
                        diagnostics.confirmed += 1;
                        let onset = refiner.refine_onset(span.start_bin);
                        let end = refiner.refine_end(span.end_bin);
                        core = Some((span.end_bin, end));
                        (onset, end)
                    }
                    SpanKind::FringeReview => {
                        diagnostics.fringe_reviews += 1;
                        let mut onset = refiner.refine_onset(span.start_bin);
                        // Post-fringe onsets never precede the refined core end.
                        if let Some((core_end_bin, core_end)) = core {
                            if span.start_bin > core_end_bin && onset < core_end {
                                onset = core_end;
                            }
                        }
                        (onset, timeline.grid().timestamp(span.end_bin))
                    }
                    SpanKind::SegmentReview => {
                        diagnostics.segment_reviews += 1;
                        (
                            refiner.refine_onset(span.start_bin),
                            refiner.refine_end(span.end_bin),
                        )
                    }
                };

                events.push(ReconciledEvent {
                    onset,
                    duration_secs: (end - onset).num_milliseconds() as f64 / 1000.0,
                    confirmed: span.is_confirmed(),
                    description: span.description,
                });
            }
        }

        tracing::debug!(
            study = %annotations.study_id,
            mode = %mode,
            %diagnostics,
            "study reconciled"
        );

        Ok(StudyReconciliation {
            study_id: annotations.study_id.clone(),
            events,
            diagnostics,
        })
    }

    /// Run the epoch resolver on one study's stage grid.
    pub fn resolve_epochs(&self, grid: &StageGrid) -> (Vec<Annotation>, EpochStats) {
        EpochResolver::new(&self.config.epoch, &self.config.output).resolve(grid)
    }
}
