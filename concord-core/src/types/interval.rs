//! Annotated time intervals as delivered by the parsers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::scorer::Scorer;

/// A single labeled time interval asserted by one scorer.
///
/// Timestamps are timezone-naive absolute date-times. The parser is
/// responsible for date normalization: intervals that cross midnight arrive
/// here with date components already adjusted so `start <= end` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub scorer: Scorer,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Event label as written by the scorer ("Hypopnea", "Arousal", ...).
    pub label: String,
}

impl Interval {
    pub fn new(
        scorer: Scorer,
        start: NaiveDateTime,
        end: NaiveDateTime,
        label: impl Into<String>,
    ) -> Self {
        Self {
            scorer,
            start,
            end,
            label: label.into(),
        }
    }

    /// Interval length in seconds, fractional.
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }
}

/// Everything one study contributes to interval-mode reconciliation.
#[derive(Debug, Clone, Default)]
pub struct StudyAnnotations {
    /// Study identifier (directory name, e.g. "AWV012").
    pub study_id: String,
    /// Earliest header start time among scorers that contributed intervals.
    /// `None` when no scorer contributed anything.
    pub anchor: Option<NaiveDateTime>,
    /// Intervals per scorer, indexed by [`Scorer::index`]. A scorer whose
    /// source file is missing or empty simply has an empty list here.
    pub intervals: [Vec<Interval>; Scorer::COUNT],
    /// Non-fatal degradations observed while assembling the study.
    pub warnings: Vec<StudyWarning>,
}

impl StudyAnnotations {
    pub fn new(study_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            ..Default::default()
        }
    }

    /// Total interval count across all scorers.
    pub fn interval_count(&self) -> usize {
        self.intervals.iter().map(Vec::len).sum()
    }

    /// True when no scorer contributed a single interval.
    pub fn is_empty(&self) -> bool {
        self.interval_count() == 0
    }

    /// Intervals of one scorer.
    pub fn for_scorer(&self, scorer: Scorer) -> &[Interval] {
        &self.intervals[scorer.index()]
    }

    /// Record intervals for a scorer and fold the header start time into
    /// the study anchor (earliest wins).
    pub fn add_source(&mut self, scorer: Scorer, start_time: NaiveDateTime, intervals: Vec<Interval>) {
        if intervals.is_empty() {
            return;
        }
        self.intervals[scorer.index()] = intervals;
        self.anchor = Some(match self.anchor {
            Some(existing) if existing <= start_time => existing,
            _ => start_time,
        });
    }
}

/// Non-fatal per-study degradations. A missing or empty scorer source does
/// not fail the study: that scorer is treated as never-occupied instead,
/// and the degradation is logged and reported alongside the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyWarning {
    /// The scorer's source file does not exist.
    MissingRaterSource { scorer: Scorer, path: String },
    /// The scorer's source file exists but contains zero events.
    EmptyRaterSource { scorer: Scorer, path: String },
}

impl std::fmt::Display for StudyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRaterSource { scorer, path } => {
                write!(f, "no source file for scorer {scorer}: {path}")
            }
            Self::EmptyRaterSource { scorer, path } => {
                write!(f, "no events found for scorer {scorer} in {path}")
            }
        }
    }
}
