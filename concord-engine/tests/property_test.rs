//! Property tests over randomized rater input.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use concord_core::config::{ConcordConfig, Coverage};
use concord_core::types::{Interval, Scorer, ScoringMode, StudyAnnotations};
use concord_engine::timeline::Discretizer;
use concord_engine::{segment, ReconcileEngine};

const LABELS: [&str; 3] = ["Obstructive Apnea", "Hypopnea", "Central Apnea"];

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 8, 5)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap()
}

/// Up to 32 intervals spread over ten minutes, any scorer, any label,
/// millisecond-ragged durations up to a minute.
fn arb_study() -> impl Strategy<Value = StudyAnnotations> {
    prop::collection::vec(
        (
            0..Scorer::COUNT,
            0u32..600,
            1u32..60_000,
            0..LABELS.len(),
        ),
        1..32,
    )
    .prop_map(|raw| {
        let mut annotations = StudyAnnotations::new("PRP001");
        for (scorer_index, start_secs, dur_ms, label_index) in raw {
            let scorer = Scorer::ALL[scorer_index];
            let start = base() + Duration::seconds(start_secs as i64);
            let end = start + Duration::milliseconds(dur_ms as i64);
            annotations.intervals[scorer.index()].push(Interval::new(
                scorer,
                start,
                end,
                LABELS[label_index],
            ));
        }
        annotations.anchor = annotations
            .intervals
            .iter()
            .flatten()
            .map(|interval| interval.start)
            .min();
        annotations
    })
}

proptest! {
    #[test]
    fn prop_segments_partition_occupied_bins(study in arb_study()) {
        let config = ConcordConfig::default();
        let timeline = Discretizer::new(&config.consensus)
            .discretize(&study)
            .unwrap();
        let segments = segment::split(&timeline);

        let mut segmented = vec![false; timeline.len()];
        for seg in &segments {
            for bin in seg.start_bin..=seg.end_bin {
                prop_assert!(!segmented[bin], "bin {} in two segments", bin);
                segmented[bin] = true;
            }
        }
        for bin in 0..timeline.len() {
            prop_assert!(timeline.score(bin) <= Scorer::COUNT as u32);
            prop_assert_eq!(segmented[bin], timeline.score(bin) > 0);
        }
    }

    #[test]
    fn prop_events_stay_ordered_and_in_bounds(
        study in arb_study(),
        half_open in any::<bool>(),
        anchored in any::<bool>(),
    ) {
        let mut config = ConcordConfig::default();
        config.consensus.require_unanimous_anchor = Some(anchored);
        if half_open {
            config.consensus.coverage = Some(Coverage::HalfOpen);
        }
        let engine = ReconcileEngine::new(config);
        let result = engine.reconcile(ScoringMode::Flow, &study).unwrap();

        let earliest = study.anchor.unwrap();
        let latest = study
            .intervals
            .iter()
            .flatten()
            .map(|interval| interval.end)
            .max()
            .unwrap();

        let mut spans = Vec::new();
        for event in &result.events {
            let end = event.onset
                + Duration::milliseconds((event.duration_secs * 1000.0).round() as i64);
            prop_assert!(event.onset >= earliest);
            prop_assert!(end <= latest);
            prop_assert!(end >= event.onset);
            if event.confirmed {
                prop_assert!(LABELS.contains(&event.description.as_str()));
            } else {
                prop_assert!(event.description.starts_with("Review"));
            }
            spans.push((event.onset, end));
        }

        spans.sort();
        for pair in spans.windows(2) {
            prop_assert!(pair[1].0 >= pair[0].1, "events overlap: {:?}", pair);
        }

        prop_assert_eq!(
            result.diagnostics.total_events(),
            result.events.len()
        );
    }

    #[test]
    fn prop_reconciliation_is_deterministic(study in arb_study()) {
        let engine = ReconcileEngine::new(ConcordConfig::default());
        let first = engine.reconcile(ScoringMode::Flow, &study).unwrap();
        let second = engine.reconcile(ScoringMode::Flow, &study).unwrap();
        prop_assert_eq!(first.events, second.events);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
    }
}
