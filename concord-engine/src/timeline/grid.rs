//! Fixed-resolution time grid shared by all scorers of a study.

use chrono::NaiveDateTime;
use concord_core::config::Coverage;

/// An ordered sequence of bin instants at a fixed resolution.
///
/// Bin `i` sits at `origin + i * resolution`. The grid is inclusive of its
/// end instant: `span` produces every bin `<= last_end`. Timestamps carry
/// millisecond precision, so all index math is done in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    origin: NaiveDateTime,
    resolution_secs: u64,
    len: usize,
}

impl TimeGrid {
    /// Grid covering `[origin, last_end]` inclusive at `resolution_secs`.
    ///
    /// `last_end` before `origin` yields an empty grid.
    pub fn span(origin: NaiveDateTime, last_end: NaiveDateTime, resolution_secs: u64) -> Self {
        let res_ms = (resolution_secs * 1000) as i64;
        let delta_ms = (last_end - origin).num_milliseconds();
        let len = if delta_ms < 0 {
            0
        } else {
            (delta_ms / res_ms) as usize + 1
        };
        Self {
            origin,
            resolution_secs,
            len,
        }
    }

    pub fn origin(&self) -> NaiveDateTime {
        self.origin
    }

    pub fn resolution_secs(&self) -> u64 {
        self.resolution_secs
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Instant of bin `index`.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.origin + chrono::Duration::seconds((index as u64 * self.resolution_secs) as i64)
    }

    /// First bin index at or after `t`, clamped to the grid start.
    /// `None` when `t` lies past the last bin.
    pub fn first_index_at_or_after(&self, t: NaiveDateTime) -> Option<usize> {
        let res_ms = (self.resolution_secs * 1000) as i64;
        let delta_ms = (t - self.origin).num_milliseconds();
        let index = if delta_ms <= 0 {
            0
        } else {
            ((delta_ms + res_ms - 1) / res_ms) as usize
        };
        (index < self.len).then_some(index)
    }

    /// Last bin index at or before `t`, clamped to the grid end.
    /// `None` when `t` precedes the origin.
    pub fn last_index_at_or_before(&self, t: NaiveDateTime) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let res_ms = (self.resolution_secs * 1000) as i64;
        let delta_ms = (t - self.origin).num_milliseconds();
        if delta_ms < 0 {
            return None;
        }
        Some(((delta_ms / res_ms) as usize).min(self.len - 1))
    }

    /// Inclusive range of bin indexes an interval `[start, end]` occupies
    /// under the given coverage convention. `None` when no grid instant is
    /// covered; parts outside the grid contribute nothing.
    pub fn covered_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        coverage: Coverage,
    ) -> Option<(usize, usize)> {
        let first = self.first_index_at_or_after(start)?;
        let mut last = self.last_index_at_or_before(end)?;
        if coverage == Coverage::HalfOpen && self.timestamp(last) == end {
            if last == 0 {
                return None;
            }
            last -= 1;
        }
        (first <= last).then_some((first, last))
    }
}
