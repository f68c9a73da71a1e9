//! Tests for concord-bench: fixture generation and baseline comparison.

use std::fs;

use chrono::NaiveDate;

use concord_bench::fixtures::{
    generate_fixture, synthetic_annotations, synthetic_grid, FixtureSize, SimpleRng,
};
use concord_bench::{read_baseline, write_baseline, BenchRecord, BenchTier};
use concord_core::config::{ConcordConfig, RosterConfig};
use concord_core::types::{Scorer, ScoringMode};
use concord_engine::ReconcileEngine;
use concord_io::parse::{parse_event_file, StageGridParser};

#[test]
fn fixture_micro_creates_2_studies() {
    let tmp = tempfile::tempdir().unwrap();
    let fixture = generate_fixture(tmp.path(), FixtureSize::Micro, 42);

    assert_eq!(fixture.studies.len(), 2);
    assert!(fixture.total_events > 0);
    assert!(fixture.total_bytes > 0);

    for study in &fixture.studies {
        for code in RosterConfig::DEFAULT_SCORERS {
            let path = study.dir.join(code).join("Flow Events.txt");
            assert!(path.exists(), "Export should exist: {:?}", path);
            let content = fs::read_to_string(&path).unwrap();
            assert!(!content.is_empty());
        }
        assert!(study.dir.join(format!("{}.csv", study.id)).exists());
    }
}

#[test]
fn fixture_small_creates_10_studies() {
    let tmp = tempfile::tempdir().unwrap();
    let fixture = generate_fixture(tmp.path(), FixtureSize::Small, 1);
    assert_eq!(fixture.studies.len(), 10);
}

#[test]
fn fixture_deterministic_same_seed() {
    let tmp1 = tempfile::tempdir().unwrap();
    let tmp2 = tempfile::tempdir().unwrap();

    let f1 = generate_fixture(tmp1.path(), FixtureSize::Micro, 42);
    let f2 = generate_fixture(tmp2.path(), FixtureSize::Micro, 42);

    assert_eq!(f1.studies.len(), f2.studies.len());
    assert_eq!(f1.total_events, f2.total_events);
    assert_eq!(f1.total_bytes, f2.total_bytes);

    for (a, b) in f1.studies.iter().zip(f2.studies.iter()) {
        for code in RosterConfig::DEFAULT_SCORERS {
            let ca = fs::read_to_string(a.dir.join(code).join("Flow Events.txt")).unwrap();
            let cb = fs::read_to_string(b.dir.join(code).join("Flow Events.txt")).unwrap();
            assert_eq!(ca, cb, "Same seed should produce identical exports");
        }
    }
}

#[test]
fn fixture_different_seeds_differ() {
    let tmp1 = tempfile::tempdir().unwrap();
    let tmp2 = tempfile::tempdir().unwrap();

    let f1 = generate_fixture(tmp1.path(), FixtureSize::Micro, 42);
    let f2 = generate_fixture(tmp2.path(), FixtureSize::Micro, 99);

    let c1 = fs::read_to_string(f1.studies[0].dir.join("LS").join("Flow Events.txt")).unwrap();
    let c2 = fs::read_to_string(f2.studies[0].dir.join("LS").join("Flow Events.txt")).unwrap();
    assert_ne!(c1, c2);
}

#[test]
fn generated_export_parses_back() {
    let tmp = tempfile::tempdir().unwrap();
    let fixture = generate_fixture(tmp.path(), FixtureSize::Micro, 42);
    let study = &fixture.studies[0];

    let expected_start = NaiveDate::from_ymd_opt(2019, 8, 5)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap();

    for scorer in Scorer::ALL {
        let path = study
            .dir
            .join(RosterConfig::DEFAULT_SCORERS[scorer.index()])
            .join("Flow Events.txt");
        let parsed = parse_event_file(&path, scorer).unwrap();
        assert_eq!(parsed.start_time, expected_start);
        assert_eq!(parsed.intervals.len(), study.events_per_scorer);
        for interval in &parsed.intervals {
            assert!(interval.start < interval.end);
        }
    }
}

#[test]
fn generated_grid_parses_back() {
    let tmp = tempfile::tempdir().unwrap();
    let fixture = generate_fixture(tmp.path(), FixtureSize::Micro, 42);
    let study = &fixture.studies[0];

    let parser = StageGridParser::new(&RosterConfig::default());
    let grid = parser
        .parse(&study.dir.join(format!("{}.csv", study.id)))
        .unwrap();
    assert_eq!(grid.study_id, study.id);
    assert_eq!(grid.epoch_count(), study.epochs);
}

#[test]
fn synthetic_annotations_deterministic() {
    let a = synthetic_annotations("SYN001", 50, 42);
    let b = synthetic_annotations("SYN001", 50, 42);
    let c = synthetic_annotations("SYN001", 50, 99);

    assert_eq!(a.anchor, b.anchor);
    for scorer in Scorer::ALL {
        assert_eq!(a.for_scorer(scorer), b.for_scorer(scorer));
        assert_eq!(a.for_scorer(scorer).len(), 50);
    }
    assert_ne!(a.for_scorer(Scorer::A), c.for_scorer(Scorer::A));
}

#[test]
fn synthetic_annotations_feed_the_engine() {
    let annotations = synthetic_annotations("SYN001", 40, 42);
    let engine = ReconcileEngine::new(ConcordConfig::default());

    let reconciliation = engine
        .reconcile(ScoringMode::Flow, &annotations)
        .unwrap();
    assert_eq!(reconciliation.study_id, "SYN001");
    assert!(!reconciliation.events.is_empty());
}

#[test]
fn synthetic_grid_labels_are_stages() {
    let grid = synthetic_grid("SYN001", 120, 42);
    assert_eq!(grid.epoch_count(), 120);

    for row in &grid.rows {
        for label in row {
            assert!(
                ["W", "N1", "N2", "N3", "R"].contains(&label.as_str()),
                "unexpected stage label {label}"
            );
        }
    }
}

fn record(name: &str, tier: BenchTier, mean_ms: f64) -> BenchRecord {
    BenchRecord {
        name: name.to_string(),
        tier,
        mean_ms,
        studies: 10,
        events_per_sec: None,
    }
}

#[test]
fn tier_tolerances_widen_with_scope() {
    assert_eq!(BenchTier::Stage.as_str(), "stage");
    assert_eq!(BenchTier::Study.as_str(), "study");
    assert_eq!(BenchTier::Batch.as_str(), "batch");

    assert!(BenchTier::Stage.tolerance() < BenchTier::Study.tolerance());
    assert!(BenchTier::Study.tolerance() < BenchTier::Batch.tolerance());
}

#[test]
fn stage_regression_detected_past_tolerance() {
    let baseline = record("discretize_400", BenchTier::Stage, 200.0);

    let slower_within = record("discretize_400", BenchTier::Stage, 220.0);
    assert!(!slower_within.regresses_vs(&baseline));

    let slower_past = record("discretize_400", BenchTier::Stage, 240.0);
    assert!(slower_past.regresses_vs(&baseline));
}

#[test]
fn batch_tier_gets_more_slack() {
    let baseline = record("run_micro_flow", BenchTier::Batch, 100.0);

    let half_again = record("run_micro_flow", BenchTier::Batch, 150.0);
    assert!(!half_again.regresses_vs(&baseline));

    let seventy_over = record("run_micro_flow", BenchTier::Batch, 170.0);
    assert!(seventy_over.regresses_vs(&baseline));
}

#[test]
fn faster_run_never_regresses() {
    let baseline = record("reconcile_1k", BenchTier::Study, 100.0);
    let faster = record("reconcile_1k", BenchTier::Study, 80.0);

    assert!(!faster.regresses_vs(&baseline));
    let ratio = faster.slowdown_vs(&baseline).unwrap();
    assert!(ratio < 1.0);
}

#[test]
fn zero_baseline_yields_no_comparison() {
    let baseline = record("reconcile_1k", BenchTier::Study, 0.0);
    let current = record("reconcile_1k", BenchTier::Study, 100.0);

    assert_eq!(current.slowdown_vs(&baseline), None);
    assert!(!current.regresses_vs(&baseline));
}

#[test]
fn baseline_round_trips_through_json() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("baseline.json");

    let records = vec![
        BenchRecord {
            name: "reconcile_1k".to_string(),
            tier: BenchTier::Study,
            mean_ms: 82.5,
            studies: 1,
            events_per_sec: Some(12_121.0),
        },
        record("run_micro_flow", BenchTier::Batch, 640.0),
    ];
    write_baseline(&path, &records).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"tier\": \"study\""));

    let loaded = read_baseline(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].name, "reconcile_1k");
    assert_eq!(loaded[0].tier, BenchTier::Study);
    assert_eq!(loaded[0].events_per_sec, Some(12_121.0));
    assert_eq!(loaded[1].mean_ms, 640.0);
}

#[test]
fn rng_deterministic() {
    let mut r1 = SimpleRng::new(42);
    let mut r2 = SimpleRng::new(42);
    for _ in 0..100 {
        assert_eq!(r1.next_u64(), r2.next_u64());
    }
}

#[test]
fn rng_zero_seed_handled() {
    let mut rng = SimpleRng::new(0);
    assert_ne!(rng.next_u64(), 0);
}
