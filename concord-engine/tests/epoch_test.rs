//! End-to-end tests for epoch-mode stage consensus.

use concord_core::config::ConcordConfig;
use concord_core::types::{Onset, StageGrid};
use concord_engine::ReconcileEngine;

/// 100 epochs: 80 unanimous N2, 15 with one dissenter, 5 fully split.
fn mixed_grid() -> StageGrid {
    let mut grid = StageGrid::new("AWV042");
    for _ in 0..80 {
        grid.rows.push(["N2".into(), "N2".into(), "N2".into()]);
    }
    for _ in 0..15 {
        grid.rows.push(["N2".into(), "N2".into(), "W".into()]);
    }
    for _ in 0..5 {
        grid.rows.push(["W".into(), "N1".into(), "R".into()]);
    }
    grid
}

fn count_described(annotations: &[concord_core::types::Annotation], description: &str) -> usize {
    annotations
        .iter()
        .filter(|a| a.description == description)
        .count()
}

#[test]
fn test_majority_mode_labels_partial_epochs() {
    let engine = ReconcileEngine::new(ConcordConfig::default());
    let (annotations, stats) = engine.resolve_epochs(&mixed_grid());

    assert_eq!(annotations.len(), 100);
    assert_eq!(count_described(&annotations, "Stage: N2"), 95);
    assert_eq!(count_described(&annotations, "Stage: -"), 5);

    assert_eq!(stats.epochs, 100);
    assert_eq!(stats.unanimous, 80);
    assert_eq!(stats.partial_agreement, 15);
    assert_eq!(stats.disagreement, 5);
    assert_eq!(stats.flagged, 5);
    assert!((stats.review_rate() - 5.0).abs() < 1e-9);
}

#[test]
fn test_strict_mode_flags_partial_epochs() {
    let mut config = ConcordConfig::default();
    config.epoch.require_full_agreement = Some(true);
    let engine = ReconcileEngine::new(config);
    let (annotations, stats) = engine.resolve_epochs(&mixed_grid());

    assert_eq!(count_described(&annotations, "Stage: N2"), 80);
    assert_eq!(count_described(&annotations, "Stage: -"), 20);

    assert_eq!(stats.unanimous, 80);
    assert_eq!(stats.partial_agreement, 15);
    assert_eq!(stats.disagreement, 5);
    assert_eq!(stats.flagged, 20);
    assert!((stats.review_rate() - 20.0).abs() < 1e-9);
}

#[test]
fn test_epoch_rows_map_one_to_one() {
    let engine = ReconcileEngine::new(ConcordConfig::default());
    let (annotations, _) = engine.resolve_epochs(&mixed_grid());

    for (index, annotation) in annotations.iter().enumerate() {
        assert_eq!(annotation.onset, Onset::Relative(index as u64 * 30));
        assert_eq!(annotation.duration_secs, 30.0);
        assert!(annotation.description.starts_with("Stage: "));
    }
}

#[test]
fn test_empty_grid_yields_no_annotations() {
    let engine = ReconcileEngine::new(ConcordConfig::default());
    let (annotations, stats) = engine.resolve_epochs(&StageGrid::new("AWV000"));

    assert!(annotations.is_empty());
    assert_eq!(stats.epochs, 0);
    assert_eq!(stats.review_rate(), 0.0);
}

#[test]
fn test_custom_epoch_length_scales_onsets() {
    let mut config = ConcordConfig::default();
    config.epoch.epoch_secs = Some(20);
    let engine = ReconcileEngine::new(config);

    let mut grid = StageGrid::new("AWV007");
    grid.rows.push(["W".into(), "W".into(), "W".into()]);
    grid.rows.push(["N1".into(), "N1".into(), "N1".into()]);

    let (annotations, _) = engine.resolve_epochs(&grid);
    assert_eq!(annotations[0].onset, Onset::Relative(0));
    assert_eq!(annotations[1].onset, Onset::Relative(20));
    assert_eq!(annotations[1].duration_secs, 20.0);
}
