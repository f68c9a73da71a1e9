//! Scorer roster configuration.

use serde::{Deserialize, Serialize};

use crate::types::Scorer;

/// Site-specific scorer identifiers, in precedence order.
///
/// The identifiers name the per-scorer subdirectories inside a study and
/// appear in log messages and review descriptions. Their order defines the
/// tie-break precedence: the first entry maps to [`Scorer::A`], the second
/// to [`Scorer::B`], the third to [`Scorer::C`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RosterConfig {
    /// Exactly three identifiers when set; empty means defaults.
    pub scorers: Vec<String>,
}

impl RosterConfig {
    pub const DEFAULT_SCORERS: [&'static str; Scorer::COUNT] = ["LS", "ES", "MS"];

    /// Returns the effective identifiers, defaulting to LS/ES/MS.
    pub fn effective_scorers(&self) -> [String; Scorer::COUNT] {
        if self.scorers.len() == Scorer::COUNT {
            [
                self.scorers[0].clone(),
                self.scorers[1].clone(),
                self.scorers[2].clone(),
            ]
        } else {
            Self::DEFAULT_SCORERS.map(str::to_string)
        }
    }

    /// Identifier of one scorer.
    pub fn name(&self, scorer: Scorer) -> String {
        if self.scorers.len() == Scorer::COUNT {
            self.scorers[scorer.index()].clone()
        } else {
            Self::DEFAULT_SCORERS[scorer.index()].to_string()
        }
    }

    /// Scorer whose identifier equals `name`, if any.
    pub fn scorer_named(&self, name: &str) -> Option<Scorer> {
        self.effective_scorers()
            .iter()
            .position(|s| s == name)
            .and_then(Scorer::from_index)
    }
}
