//! Configuration types for the consensus engine.
//!
//! All knobs are `Option`-valued with `effective_*` accessors that fall back
//! to compiled defaults, so a config file only needs to name the values it
//! changes. [`ConcordConfig::load`] layers user config, project config, and
//! CLI overrides.

pub mod concord_config;
pub mod consensus_config;
pub mod epoch_config;
pub mod input_config;
pub mod output_config;
pub mod roster_config;
pub mod run_config;

pub use concord_config::{CliOverrides, ConcordConfig, KNOWN_FORMATS};
pub use consensus_config::{ConsensusConfig, Coverage};
pub use epoch_config::EpochConfig;
pub use input_config::InputConfig;
pub use output_config::{OutputConfig, ReviewStyleKind};
pub use roster_config::RosterConfig;
pub use run_config::RunConfig;
