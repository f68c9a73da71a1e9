//! Row-aligned sleep-stage labels for epoch-mode consensus.

use super::scorer::Scorer;

/// One study's stage grid: per-epoch labels for all three scorers,
/// row-aligned (row `i` is epoch `i`, onset `i * epoch_secs`).
///
/// No discretization happens in epoch mode, so this is a one-to-one
/// image of the source file's resolved scorer columns.
#[derive(Debug, Clone, Default)]
pub struct StageGrid {
    /// Study identifier the grid belongs to (source file stem).
    pub study_id: String,
    /// Per-epoch labels, indexed by [`Scorer::index`].
    pub rows: Vec<[String; Scorer::COUNT]>,
}

impl StageGrid {
    pub fn new(study_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            rows: Vec::new(),
        }
    }

    pub fn epoch_count(&self) -> usize {
        self.rows.len()
    }

    /// Label asserted by one scorer at one epoch.
    pub fn label(&self, epoch: usize, scorer: Scorer) -> &str {
        &self.rows[epoch][scorer.index()]
    }
}
