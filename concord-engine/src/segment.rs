//! Segmenter: splits the timeline into maximal active runs.

use crate::timeline::Timeline;

/// A maximal contiguous run of bins with at least one scorer active.
///
/// Bounds are inclusive bin indexes. Segments never touch: a zero-score
/// bin always separates two of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start_bin: usize,
    pub end_bin: usize,
}

impl Segment {
    /// Number of bins in the segment, at least 1.
    pub fn len(&self) -> usize {
        self.end_bin - self.start_bin + 1
    }
}

/// Walk the grid once and collect maximal runs of `score > 0` bins.
pub fn split(timeline: &Timeline) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut open: Option<usize> = None;

    for index in 0..timeline.len() {
        let occupied = timeline.score(index) > 0;
        match (open, occupied) {
            (None, true) => open = Some(index),
            (Some(start), false) => {
                segments.push(Segment {
                    start_bin: start,
                    end_bin: index - 1,
                });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        segments.push(Segment {
            start_bin: start,
            end_bin: timeline.len() - 1,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{TimeGrid, Timeline};
    use chrono::NaiveDate;
    use concord_core::types::Scorer;

    fn timeline_with(occupied: &[usize], len_secs: u32) -> Timeline {
        let origin = NaiveDate::from_ymd_opt(2019, 8, 5)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let grid = TimeGrid::span(
            origin,
            origin + chrono::Duration::seconds(len_secs as i64),
            1,
        );
        let mut timeline = Timeline::new(grid);
        let label = timeline.intern("X");
        for &index in occupied {
            timeline.mark(index, Scorer::A, label);
        }
        timeline
    }

    #[test]
    fn test_split_finds_maximal_runs() {
        let timeline = timeline_with(&[1, 2, 3, 7, 10, 11], 12);
        let segments = split(&timeline);
        assert_eq!(
            segments,
            vec![
                Segment { start_bin: 1, end_bin: 3 },
                Segment { start_bin: 7, end_bin: 7 },
                Segment { start_bin: 10, end_bin: 11 },
            ]
        );
    }

    #[test]
    fn test_split_run_touching_grid_edges() {
        let timeline = timeline_with(&[0, 1, 4, 5], 5);
        let segments = split(&timeline);
        assert_eq!(
            segments,
            vec![
                Segment { start_bin: 0, end_bin: 1 },
                Segment { start_bin: 4, end_bin: 5 },
            ]
        );
    }

    #[test]
    fn test_split_partitions_every_occupied_bin() {
        let occupied = [0, 1, 5, 6, 7, 9, 15, 16];
        let timeline = timeline_with(&occupied, 20);
        let segments = split(&timeline);

        // Every occupied bin is in exactly one segment; no segment holds an
        // unoccupied bin; consecutive segments are separated by a gap.
        let mut covered = Vec::new();
        for segment in &segments {
            for bin in segment.start_bin..=segment.end_bin {
                assert!(timeline.score(bin) > 0);
                covered.push(bin);
            }
        }
        assert_eq!(covered, occupied);
        for pair in segments.windows(2) {
            assert!(pair[1].start_bin > pair[0].end_bin + 1);
        }
    }

    #[test]
    fn test_split_empty_timeline() {
        let timeline = timeline_with(&[], 5);
        assert!(split(&timeline).is_empty());
    }
}
