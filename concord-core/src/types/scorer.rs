//! Scorer identity and precedence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three independent scorers whose annotations are reconciled.
///
/// The enum order is the fixed precedence order: `A < B < C`. Precedence is
/// used only for deterministic tie-breaks (label votes, refinement lookups)
/// and never implies one scorer's annotations are more trustworthy.
/// Site-specific scorer identifiers (directory names, initials) live in
/// [`crate::config::RosterConfig`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scorer {
    A,
    B,
    C,
}

impl Scorer {
    /// All scorers in precedence order.
    pub const ALL: [Scorer; 3] = [Scorer::A, Scorer::B, Scorer::C];

    /// Number of scorers. The consensus rules are written for exactly three.
    pub const COUNT: usize = 3;

    /// Zero-based position in precedence order.
    pub fn index(self) -> usize {
        match self {
            Scorer::A => 0,
            Scorer::B => 1,
            Scorer::C => 2,
        }
    }

    /// Scorer at the given precedence position.
    pub fn from_index(index: usize) -> Option<Scorer> {
        match index {
            0 => Some(Scorer::A),
            1 => Some(Scorer::B),
            2 => Some(Scorer::C),
            _ => None,
        }
    }

    /// Stable single-letter code, independent of the configured roster.
    pub fn code(self) -> &'static str {
        match self {
            Scorer::A => "A",
            Scorer::B => "B",
            Scorer::C => "C",
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
