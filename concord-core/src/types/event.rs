//! Reconciled events and the flat annotation records written to disk.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

/// Onset of an annotation row.
///
/// Interval modes report absolute timestamps with millisecond precision.
/// Epoch mode reports whole seconds relative to the staging anchor; those
/// stay relative until the merge step resolves them against the markers
/// start time. The derived ordering sorts absolute onsets before
/// unanchored relative ones, which is what the combiner relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Onset {
    Absolute(NaiveDateTime),
    Relative(u64),
}

impl Onset {
    /// Parse an onset cell as written by [`fmt::Display`]: an ISO timestamp
    /// for absolute onsets, a bare integer for relative ones.
    pub fn parse(text: &str) -> Option<Onset> {
        let text = text.trim();
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Onset::Absolute(ts));
        }
        text.parse::<u64>().ok().map(Onset::Relative)
    }

    /// Resolve a relative onset against an absolute anchor. Absolute onsets
    /// pass through unchanged.
    pub fn anchored(self, anchor: NaiveDateTime) -> Onset {
        match self {
            Onset::Absolute(ts) => Onset::Absolute(ts),
            Onset::Relative(secs) => Onset::Absolute(anchor + Duration::seconds(secs as i64)),
        }
    }

    pub fn as_absolute(self) -> Option<NaiveDateTime> {
        match self {
            Onset::Absolute(ts) => Some(ts),
            Onset::Relative(_) => None,
        }
    }
}

impl fmt::Display for Onset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Onset::Absolute(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.3f")),
            Onset::Relative(secs) => write!(f, "{secs}"),
        }
    }
}

/// One output row: `Onset`, `Duration`, `Description`.
///
/// This is the unit the writers serialize and the combiner reads back.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub onset: Onset,
    /// Duration in seconds, fractional. Rendered with two decimals.
    pub duration_secs: f64,
    pub description: String,
}

impl Annotation {
    pub fn new(onset: Onset, duration_secs: f64, description: impl Into<String>) -> Self {
        Self {
            onset,
            duration_secs,
            description: description.into(),
        }
    }
}

/// A single reconciled event produced by the consensus engine.
///
/// Confirmed events carry the consensus label as their description; review
/// events carry a review-marker description and must be inspected manually.
/// Events are created once per segment resolution and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledEvent {
    pub onset: NaiveDateTime,
    pub duration_secs: f64,
    pub description: String,
    pub confirmed: bool,
}

impl ReconciledEvent {
    /// The flat output record for this event.
    pub fn annotation(&self) -> Annotation {
        Annotation {
            onset: Onset::Absolute(self.onset),
            duration_secs: self.duration_secs,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 8, 5)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_onset_display_millisecond_precision() {
        assert_eq!(
            Onset::Absolute(ts(22, 31, 18, 160)).to_string(),
            "2019-08-05T22:31:18.160"
        );
        assert_eq!(Onset::Relative(930).to_string(), "930");
    }

    #[test]
    fn test_onset_parse_round_trip() {
        let abs = Onset::Absolute(ts(23, 59, 59, 999));
        assert_eq!(Onset::parse(&abs.to_string()), Some(abs));
        assert_eq!(Onset::parse("930"), Some(Onset::Relative(930)));
        assert_eq!(Onset::parse("not an onset"), None);
    }

    #[test]
    fn test_onset_ordering_absolute_first() {
        let abs = Onset::Absolute(ts(22, 0, 0, 0));
        assert!(abs < Onset::Relative(0));
        assert!(Onset::Absolute(ts(21, 0, 0, 0)) < abs);
        assert!(Onset::Relative(30) < Onset::Relative(60));
    }

    #[test]
    fn test_anchoring_relative_onset() {
        let anchor = ts(22, 5, 0, 0);
        assert_eq!(
            Onset::Relative(90).anchored(anchor),
            Onset::Absolute(ts(22, 6, 30, 0))
        );
        let abs = Onset::Absolute(ts(23, 0, 0, 0));
        assert_eq!(abs.anchored(anchor), abs);
    }
}
