//! Top-level Concord configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    ConsensusConfig, EpochConfig, InputConfig, OutputConfig, ReviewStyleKind, RosterConfig,
    RunConfig,
};
use crate::errors::ConfigError;
use crate::types::Scorer;

/// Formats the output writers understand.
pub const KNOWN_FORMATS: [&str; 3] = ["tsv", "csv", "json"];

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Project config (`concord.toml` in the data root)
/// 3. User config (`~/.concord/config.toml`)
/// 4. Compiled defaults
///
/// There is deliberately no environment-variable layer: every knob the
/// engine reads is explicit configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConcordConfig {
    pub roster: RosterConfig,
    pub consensus: ConsensusConfig,
    pub epoch: EpochConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub run: RunConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threads: Option<usize>,
    pub format: Option<String>,
    pub resolution_secs: Option<u64>,
    pub fringe_threshold: Option<u32>,
    pub require_unanimous_anchor: Option<bool>,
    pub require_full_agreement: Option<bool>,
    pub review_style: Option<ReviewStyleKind>,
}

impl ConcordConfig {
    /// Load configuration with layered resolution.
    ///
    /// Resolution order (highest priority first):
    /// 1. CLI flags
    /// 2. Project config (`concord.toml` in `root`)
    /// 3. User config (`~/.concord/config.toml`)
    /// 4. Compiled defaults
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(_) => {
                        // Non-parse errors from user config are warnings, not fatal.
                        // Continue with defaults.
                    }
                }
            }
        }

        // Layer 2: project config
        let project_config_path = root.join("concord.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        // Validate the final config
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ConcordConfig) -> Result<(), ConfigError> {
        if !config.roster.scorers.is_empty() {
            if config.roster.scorers.len() != Scorer::COUNT {
                return Err(ConfigError::ValidationFailed {
                    field: "roster.scorers".to_string(),
                    message: format!("must list exactly {} identifiers", Scorer::COUNT),
                });
            }
            for (i, a) in config.roster.scorers.iter().enumerate() {
                if a.trim().is_empty() {
                    return Err(ConfigError::ValidationFailed {
                        field: "roster.scorers".to_string(),
                        message: "identifiers must be non-empty".to_string(),
                    });
                }
                if config.roster.scorers[i + 1..].contains(a) {
                    return Err(ConfigError::ValidationFailed {
                        field: "roster.scorers".to_string(),
                        message: format!("duplicate identifier {a:?}"),
                    });
                }
            }
        }
        if let Some(resolution) = config.consensus.resolution_secs {
            if resolution == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "consensus.resolution_secs".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(min_agreement) = config.consensus.min_agreement {
            if !(2..=Scorer::COUNT as u32).contains(&min_agreement) {
                return Err(ConfigError::ValidationFailed {
                    field: "consensus.min_agreement".to_string(),
                    message: format!("must be between 2 and {}", Scorer::COUNT),
                });
            }
        }
        if let Some(days) = config.consensus.max_span_days {
            if days < 1 {
                return Err(ConfigError::ValidationFailed {
                    field: "consensus.max_span_days".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(epoch_secs) = config.epoch.epoch_secs {
            if epoch_secs == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "epoch.epoch_secs".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(ref format) = config.output.format {
            if !KNOWN_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "output.format".to_string(),
                    message: format!("unknown format {format:?}, expected one of {KNOWN_FORMATS:?}"),
                });
            }
        }
        if let Some(truncate) = config.output.label_truncate {
            if truncate == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "output.label_truncate".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.concord/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ConcordConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ConcordConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` (or non-empty) value.
    fn merge(base: &mut ConcordConfig, other: &ConcordConfig) {
        // Roster
        if !other.roster.scorers.is_empty() {
            base.roster.scorers = other.roster.scorers.clone();
        }

        // Consensus
        if other.consensus.resolution_secs.is_some() {
            base.consensus.resolution_secs = other.consensus.resolution_secs;
        }
        if other.consensus.min_agreement.is_some() {
            base.consensus.min_agreement = other.consensus.min_agreement;
        }
        if other.consensus.require_unanimous_anchor.is_some() {
            base.consensus.require_unanimous_anchor = other.consensus.require_unanimous_anchor;
        }
        if other.consensus.fringe_threshold.is_some() {
            base.consensus.fringe_threshold = other.consensus.fringe_threshold;
        }
        if other.consensus.coverage.is_some() {
            base.consensus.coverage = other.consensus.coverage;
        }
        if other.consensus.max_span_days.is_some() {
            base.consensus.max_span_days = other.consensus.max_span_days;
        }

        // Epoch
        if other.epoch.epoch_secs.is_some() {
            base.epoch.epoch_secs = other.epoch.epoch_secs;
        }
        if other.epoch.require_full_agreement.is_some() {
            base.epoch.require_full_agreement = other.epoch.require_full_agreement;
        }
        if other.epoch.sentinel.is_some() {
            base.epoch.sentinel = other.epoch.sentinel.clone();
        }

        // Input
        if other.input.flow_file.is_some() {
            base.input.flow_file = other.input.flow_file.clone();
        }
        if other.input.arousal_file.is_some() {
            base.input.arousal_file = other.input.arousal_file.clone();
        }
        if other.input.markers_file.is_some() {
            base.input.markers_file = other.input.markers_file.clone();
        }
        if other.input.stage_grid_pattern.is_some() {
            base.input.stage_grid_pattern = other.input.stage_grid_pattern.clone();
        }

        // Output
        if other.output.format.is_some() {
            base.output.format = other.output.format.clone();
        }
        if other.output.review_marker.is_some() {
            base.output.review_marker = other.output.review_marker.clone();
        }
        if other.output.stage_prefix.is_some() {
            base.output.stage_prefix = other.output.stage_prefix.clone();
        }
        if other.output.label_truncate.is_some() {
            base.output.label_truncate = other.output.label_truncate;
        }
        if other.output.review_style.is_some() {
            base.output.review_style = other.output.review_style;
        }

        // Run
        if other.run.threads.is_some() {
            base.run.threads = other.run.threads;
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ConcordConfig, cli: &CliOverrides) {
        if let Some(v) = cli.threads {
            config.run.threads = Some(v);
        }
        if let Some(ref v) = cli.format {
            config.output.format = Some(v.clone());
        }
        if let Some(v) = cli.resolution_secs {
            config.consensus.resolution_secs = Some(v);
        }
        if let Some(v) = cli.fringe_threshold {
            config.consensus.fringe_threshold = Some(v);
        }
        if let Some(v) = cli.require_unanimous_anchor {
            config.consensus.require_unanimous_anchor = Some(v);
        }
        if let Some(v) = cli.require_full_agreement {
            config.epoch.require_full_agreement = Some(v);
        }
        if let Some(v) = cli.review_style {
            config.output.review_style = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level concord config directory: `~/.concord/`.
fn dirs_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".concord"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
