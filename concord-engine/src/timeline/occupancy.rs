//! Per-bin per-scorer occupancy over the shared grid.

use lasso::{Rodeo, Spur};

use concord_core::types::Scorer;

use super::grid::TimeGrid;

/// Per-bin state: which scorers occupy the bin and with which label.
///
/// Labels are interned per study; a `Spur` comparison is enough for the
/// same-label agreement test, and the resolver only materializes strings
/// when it renders descriptions.
pub type BinState = [Option<Spur>; Scorer::COUNT];

/// The discretized study: grid plus per-bin occupancy for every scorer.
#[derive(Debug)]
pub struct Timeline {
    grid: TimeGrid,
    labels: Rodeo,
    bins: Vec<BinState>,
}

impl Timeline {
    pub fn new(grid: TimeGrid) -> Self {
        let bins = vec![[None; Scorer::COUNT]; grid.len()];
        Self {
            grid,
            labels: Rodeo::default(),
            bins,
        }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Intern a label for marking.
    pub fn intern(&mut self, label: &str) -> Spur {
        self.labels.get_or_intern(label)
    }

    /// Resolve an interned label.
    pub fn resolve(&self, label: Spur) -> &str {
        self.labels.resolve(&label)
    }

    /// Mark one bin as occupied by `scorer` with `label`. A later mark by
    /// the same scorer overwrites the earlier one.
    pub fn mark(&mut self, index: usize, scorer: Scorer, label: Spur) {
        self.bins[index][scorer.index()] = Some(label);
    }

    /// Per-scorer state at one bin.
    pub fn state(&self, index: usize) -> &BinState {
        &self.bins[index]
    }

    /// Number of scorers occupying the bin, `0..=3`.
    pub fn score(&self, index: usize) -> u32 {
        self.bins[index].iter().filter(|slot| slot.is_some()).count() as u32
    }

    /// Label a scorer asserts at a bin, resolved.
    pub fn label_at(&self, index: usize, scorer: Scorer) -> Option<&str> {
        self.bins[index][scorer.index()].map(|spur| self.resolve(spur))
    }
}
