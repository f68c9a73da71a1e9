//! Description rendering for confirmed and review events.

use concord_core::types::Scorer;

/// Per-scorer labels at the bin a review description is derived from.
#[derive(Debug, Clone, Copy)]
pub struct ReviewContext<'a> {
    pub labels: [Option<&'a str>; Scorer::COUNT],
}

impl<'a> ReviewContext<'a> {
    /// First non-empty label in scorer precedence order.
    pub fn first_label(&self) -> Option<&'a str> {
        self.labels
            .iter()
            .flatten()
            .copied()
            .find(|label| !label.is_empty())
    }
}

/// How event descriptions are rendered for one scoring mode.
#[derive(Debug, Clone)]
pub enum DescriptionStyle {
    /// Confirmed events carry the consensus label; review events carry the
    /// marker plus the first asserted label truncated to `max_len` chars,
    /// or the bare marker when no label is present.
    TruncatedLabel { marker: String, max_len: usize },
    /// Both confirmed and review descriptions use one fixed event label.
    Fixed { marker: String, label: String },
    /// Confirmed events carry the consensus label; review events enumerate
    /// each scorer's asserted label (or a dash) under its roster name.
    PerRater {
        marker: String,
        names: [String; Scorer::COUNT],
    },
}

impl DescriptionStyle {
    /// Description of a confirmed event.
    pub fn confirmed(&self, consensus_label: &str) -> String {
        match self {
            DescriptionStyle::Fixed { label, .. } => label.clone(),
            _ => consensus_label.to_string(),
        }
    }

    /// Description of a review event derived from one bin's state.
    pub fn review(&self, context: &ReviewContext<'_>) -> String {
        match self {
            DescriptionStyle::TruncatedLabel { marker, max_len } => {
                match context.first_label() {
                    Some(label) => {
                        let cut = label
                            .char_indices()
                            .nth(*max_len)
                            .map_or(label.len(), |(at, _)| at);
                        format!("{marker}: {}", &label[..cut])
                    }
                    None => marker.clone(),
                }
            }
            DescriptionStyle::Fixed { marker, label } => format!("{marker}: {label}"),
            DescriptionStyle::PerRater { marker, names } => {
                let parts: Vec<String> = names
                    .iter()
                    .zip(context.labels.iter())
                    .map(|(name, label)| format!("{name}={}", label.unwrap_or("-")))
                    .collect();
                format!("{marker}: {}", parts.join(", "))
            }
        }
    }
}
