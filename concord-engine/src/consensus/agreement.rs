//! Per-bin agreement evaluation.

use lasso::Spur;
use smallvec::SmallVec;

use concord_core::types::Scorer;

use crate::timeline::BinState;

/// Agreement observed at one bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinAgreement {
    /// Size of the largest jointly-occupied scorer group. Label-aware mode
    /// counts only scorers asserting the same label; otherwise this is the
    /// plain occupancy count.
    pub count: u32,
    /// The winning label. Label-aware ties resolve to the label of the
    /// first scorer in precedence order whose label reached the maximum.
    pub label: Option<Spur>,
    /// Whether all three scorers agree (same label in label-aware mode).
    pub unanimous: bool,
}

/// Evaluate one bin's agreement.
pub fn evaluate(state: &BinState, label_aware: bool) -> BinAgreement {
    let occupied = || state.iter().filter_map(|slot| *slot);

    if !label_aware {
        let count = occupied().count() as u32;
        return BinAgreement {
            count,
            label: occupied().next(),
            unanimous: count == Scorer::COUNT as u32,
        };
    }

    let mut votes: SmallVec<[(Spur, u32); Scorer::COUNT]> = SmallVec::new();
    for label in occupied() {
        match votes.iter_mut().find(|(candidate, _)| *candidate == label) {
            Some((_, count)) => *count += 1,
            None => votes.push((label, 1)),
        }
    }

    let Some(max) = votes.iter().map(|&(_, count)| count).max() else {
        return BinAgreement {
            count: 0,
            label: None,
            unanimous: false,
        };
    };

    // Precedence-first tie-break: scan scorers in order, take the first
    // whose label is among the tied winners.
    let label = occupied().find(|label| {
        votes
            .iter()
            .any(|&(candidate, count)| candidate == *label && count == max)
    });

    BinAgreement {
        count: max,
        label,
        unanimous: max == Scorer::COUNT as u32,
    }
}
