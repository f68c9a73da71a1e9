//! Boundary refinement: restores sub-grid precision to span edges.

use chrono::NaiveDateTime;

use concord_core::config::Coverage;
use concord_core::types::{Interval, Scorer, StudyAnnotations};

use crate::timeline::TimeGrid;

/// Recovers original sub-second timestamps for bin-granular boundaries.
///
/// A span edge at bin `b` was put there by some interval whose first (or
/// last) covered bin is `b`. The refiner searches the study's intervals for
/// those contributors and takes the earliest start (latest end) among them,
/// compared by time-of-day only, which tolerates residual date-normalization
/// artifacts near midnight. When nothing matches, the bin's own instant is
/// the boundary.
pub struct BoundaryRefiner<'a> {
    grid: &'a TimeGrid,
    annotations: &'a StudyAnnotations,
    coverage: Coverage,
}

impl<'a> BoundaryRefiner<'a> {
    pub fn new(grid: &'a TimeGrid, annotations: &'a StudyAnnotations, coverage: Coverage) -> Self {
        Self {
            grid,
            annotations,
            coverage,
        }
    }

    /// Earliest original start among intervals whose first covered bin is
    /// `bin`; the bin instant when no interval matches.
    pub fn refine_onset(&self, bin: usize) -> NaiveDateTime {
        self.contributors()
            .filter(|&(first, _, _)| first == bin)
            .map(|(_, _, interval)| interval.start)
            .min_by_key(|start| start.time())
            .unwrap_or_else(|| self.grid.timestamp(bin))
    }

    /// Latest original end among intervals whose last covered bin is
    /// `bin`; the bin instant when no interval matches.
    pub fn refine_end(&self, bin: usize) -> NaiveDateTime {
        self.contributors()
            .filter(|&(_, last, _)| last == bin)
            .map(|(_, _, interval)| interval.end)
            .max_by_key(|end| end.time())
            .unwrap_or_else(|| self.grid.timestamp(bin))
    }

    /// All intervals with their covered bin ranges.
    fn contributors(&self) -> impl Iterator<Item = (usize, usize, &Interval)> + '_ {
        Scorer::ALL
            .iter()
            .flat_map(|scorer| self.annotations.for_scorer(*scorer))
            .filter_map(|interval| {
                self.grid
                    .covered_range(interval.start, interval.end, self.coverage)
                    .map(|(first, last)| (first, last, interval))
            })
    }
}
