//! Discretizer: maps per-scorer intervals onto a shared grid.

use concord_core::config::{ConsensusConfig, Coverage};
use concord_core::errors::ReconcileError;
use concord_core::types::{Scorer, StudyAnnotations};

use super::grid::TimeGrid;
use super::occupancy::Timeline;

/// Builds the discretized timeline for one study.
///
/// The grid spans from the study anchor (earliest header start time, falling
/// back to the earliest interval start) to the latest interval end,
/// inclusive. Marking is interval-driven: each interval walks only the bins
/// it covers, so a sparse night stays cheap regardless of grid length.
pub struct Discretizer {
    resolution_secs: u64,
    coverage: Coverage,
    max_span_days: i64,
}

impl Discretizer {
    pub fn new(config: &ConsensusConfig) -> Self {
        Self {
            resolution_secs: config.effective_resolution_secs(),
            coverage: config.effective_coverage(),
            max_span_days: config.effective_max_span_days(),
        }
    }

    /// Discretize a study onto the shared grid.
    ///
    /// Fails with [`ReconcileError::EmptyStudy`] when no scorer contributed
    /// an interval, and with [`ReconcileError::ImplausibleSpan`] when the
    /// grid would span more than the sanity bound (a date-normalization
    /// defect upstream, not a real recording).
    pub fn discretize(&self, annotations: &StudyAnnotations) -> Result<Timeline, ReconcileError> {
        let all = || Scorer::ALL.iter().flat_map(|s| annotations.for_scorer(*s));

        let earliest_start = all().map(|iv| iv.start).min();
        let last_end = all().map(|iv| iv.end).max();
        let (Some(earliest_start), Some(last_end)) = (earliest_start, last_end) else {
            return Err(ReconcileError::EmptyStudy {
                study_id: annotations.study_id.clone(),
            });
        };

        let origin = annotations.anchor.unwrap_or(earliest_start).min(earliest_start);

        if (last_end - origin).num_days() > self.max_span_days {
            return Err(ReconcileError::ImplausibleSpan {
                study_id: annotations.study_id.clone(),
                origin,
                last_end,
                max_span_days: self.max_span_days,
            });
        }

        let grid = TimeGrid::span(origin, last_end, self.resolution_secs);
        if grid.is_empty() {
            return Err(ReconcileError::EmptyStudy {
                study_id: annotations.study_id.clone(),
            });
        }

        let mut timeline = Timeline::new(grid);
        for scorer in Scorer::ALL {
            for interval in annotations.for_scorer(scorer) {
                let Some((first, last)) =
                    timeline
                        .grid()
                        .covered_range(interval.start, interval.end, self.coverage)
                else {
                    continue;
                };
                let label = timeline.intern(&interval.label);
                for index in first..=last {
                    timeline.mark(index, scorer, label);
                }
            }
        }

        tracing::debug!(
            study = %annotations.study_id,
            bins = timeline.len(),
            intervals = annotations.interval_count(),
            "discretized study onto grid"
        );

        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use concord_core::types::Interval;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 8, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn discretizer() -> Discretizer {
        Discretizer::new(&ConsensusConfig::default())
    }

    #[test]
    fn test_empty_study_is_an_error() {
        let annotations = StudyAnnotations::new("AWV001");
        let err = discretizer().discretize(&annotations).unwrap_err();
        assert!(matches!(err, ReconcileError::EmptyStudy { .. }));
    }

    #[test]
    fn test_implausible_span_is_an_error() {
        let mut annotations = StudyAnnotations::new("AWV001");
        let far_end = ts(22, 0, 0) + chrono::Duration::days(3);
        annotations.add_source(
            Scorer::A,
            ts(22, 0, 0),
            vec![Interval::new(Scorer::A, ts(22, 0, 0), far_end, "X")],
        );
        let err = discretizer().discretize(&annotations).unwrap_err();
        assert!(matches!(err, ReconcileError::ImplausibleSpan { .. }));
    }

    #[test]
    fn test_grid_anchored_at_earliest_header_start() {
        let mut annotations = StudyAnnotations::new("AWV001");
        annotations.add_source(
            Scorer::A,
            ts(22, 0, 0),
            vec![Interval::new(Scorer::A, ts(22, 0, 30), ts(22, 0, 40), "X")],
        );
        let timeline = discretizer().discretize(&annotations).unwrap();

        assert_eq!(timeline.grid().origin(), ts(22, 0, 0));
        // 22:00:00 ..= 22:00:40 at 1 s
        assert_eq!(timeline.len(), 41);
        assert_eq!(timeline.score(29), 0);
        assert_eq!(timeline.score(30), 1);
        assert_eq!(timeline.score(40), 1);
    }

    #[test]
    fn test_missing_scorer_degrades_to_unoccupied() {
        let mut annotations = StudyAnnotations::new("AWV001");
        annotations.add_source(
            Scorer::A,
            ts(22, 0, 0),
            vec![Interval::new(Scorer::A, ts(22, 0, 0), ts(22, 0, 5), "X")],
        );
        annotations.add_source(
            Scorer::C,
            ts(22, 0, 0),
            vec![Interval::new(Scorer::C, ts(22, 0, 0), ts(22, 0, 5), "X")],
        );
        // Scorer B contributed nothing.
        let timeline = discretizer().discretize(&annotations).unwrap();
        for index in 0..=5 {
            assert_eq!(timeline.score(index), 2);
            assert_eq!(timeline.label_at(index, Scorer::B), None);
        }
    }

    #[test]
    fn test_interval_before_anchor_extends_origin() {
        // An event starting before the header start time still lands on the
        // grid: the origin takes the earlier of the two.
        let mut annotations = StudyAnnotations::new("AWV001");
        annotations.add_source(
            Scorer::A,
            ts(22, 0, 10),
            vec![Interval::new(Scorer::A, ts(22, 0, 0), ts(22, 0, 5), "X")],
        );
        let timeline = discretizer().discretize(&annotations).unwrap();
        assert_eq!(timeline.grid().origin(), ts(22, 0, 0));
        assert_eq!(timeline.score(0), 1);
    }
}
