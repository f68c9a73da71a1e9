//! Subcommand definitions and execution.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use concord_core::config::{CliOverrides, ConcordConfig, ReviewStyleKind};
use concord_core::errors::{OutputError, StudyError};
use concord_core::types::ScoringMode;
use concord_io::{combine, BatchRunner, RunOptions};

/// Command-line arguments for the concord binary.
#[derive(Parser, Debug)]
#[command(name = "concord")]
#[command(about = "Multi-rater consensus for sleep-study annotations")]
#[command(version)]
pub struct Cli {
    /// Data directory containing one subdirectory per study.
    #[arg(short, long, default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Directory annotation outputs are written to.
    #[arg(short, long, default_value = "output", global = true)]
    pub out_dir: PathBuf,

    /// Worker threads for the study fan-out (0 = one per core).
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Output format: tsv, csv, or json.
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Grid resolution in seconds.
    #[arg(long, global = true)]
    pub resolution_secs: Option<u64>,

    /// Longest fringe, in bins, still absorbed into the confirmed core.
    #[arg(long, global = true)]
    pub fringe_threshold: Option<u32>,

    /// Confirm cores even when no bin of the segment has all scorers agreeing.
    #[arg(long, global = true)]
    pub no_unanimous_anchor: bool,

    /// Emit the sentinel for two-vs-one stage epochs instead of the majority label.
    #[arg(long, global = true)]
    pub strict_staging: bool,

    /// Review description style for interval modes.
    #[arg(long, value_enum, global = true)]
    pub review_style: Option<ReviewStyleArg>,

    /// Also write the run summary as JSON to this path.
    #[arg(long, global = true)]
    pub summary_json: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile breathing-flow events across all studies.
    Flow,
    /// Reconcile arousal events across all studies.
    Arousal,
    /// Vote sleep stages per epoch across all studies.
    Staging,
    /// Number stage annotations, then combine each subject's flow and
    /// arousal outputs chronologically.
    Combine,
    /// Merge combined events with markers-anchored stage annotations.
    Merge,
}

/// Review description styles accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReviewStyleArg {
    Truncated,
    Fixed,
    PerRater,
}

impl From<ReviewStyleArg> for ReviewStyleKind {
    fn from(style: ReviewStyleArg) -> Self {
        match style {
            ReviewStyleArg::Truncated => ReviewStyleKind::Truncated,
            ReviewStyleArg::Fixed => ReviewStyleKind::Fixed,
            ReviewStyleArg::PerRater => ReviewStyleKind::PerRater,
        }
    }
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threads: self.threads,
            format: self.format.clone(),
            resolution_secs: self.resolution_secs,
            fringe_threshold: self.fringe_threshold,
            require_unanimous_anchor: self.no_unanimous_anchor.then_some(false),
            require_full_agreement: self.strict_staging.then_some(true),
            review_style: self.review_style.map(ReviewStyleKind::from),
        }
    }
}

pub fn execute(cli: &Cli) -> Result<(), StudyError> {
    match cli.command {
        Command::Flow => run_mode(cli, ScoringMode::Flow),
        Command::Arousal => run_mode(cli, ScoringMode::Arousal),
        Command::Staging => run_mode(cli, ScoringMode::Staging),
        Command::Combine => {
            let numbered = combine::number_stage_files(&cli.out_dir)?;
            let combined = combine::combine_subjects(&cli.out_dir)?;
            println!(
                "Numbered {} staging file(s), combined {} subject(s)",
                numbered.len(),
                combined.len()
            );
            Ok(())
        }
        Command::Merge => {
            let config = ConcordConfig::load(&cli.data_dir, Some(&cli.overrides()))?;
            let merged = combine::merge_subjects(&cli.out_dir, &cli.data_dir, &config)?;
            println!("Merged {} subject(s)", merged.len());
            Ok(())
        }
    }
}

fn run_mode(cli: &Cli, mode: ScoringMode) -> Result<(), StudyError> {
    let config = ConcordConfig::load(&cli.data_dir, Some(&cli.overrides()))?;
    let runner = BatchRunner::new(config);
    let summary = runner.run(&RunOptions {
        data_dir: cli.data_dir.clone(),
        out_dir: cli.out_dir.clone(),
        mode,
    })?;

    print!("{}", summary.render_console());

    if let Some(ref path) = cli.summary_json {
        let json = summary.to_json().map_err(|e| OutputError::RenderFailed {
            format: "json".to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "run summary exported");
    }

    Ok(())
}
