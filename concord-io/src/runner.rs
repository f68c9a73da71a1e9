//! Batch runner: per-study fan-out over a data directory.
//!
//! Failures are isolated at study granularity. A study that cannot be
//! parsed or reconciled is recorded and skipped; it never aborts the run
//! and never leaves a partial output file behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use regex::Regex;

use concord_core::config::ConcordConfig;
use concord_core::errors::{ConcordErrorCode, OutputError, StudyError};
use concord_core::events::{
    ConcordEventHandler, EventDispatcher, RaterSourceMissingEvent, RunCompletedEvent,
    RunStartedEvent, StudyFailedEvent, StudyReconciledEvent, StudyStartedEvent,
};
use concord_core::types::{Annotation, ScoringMode, StudyWarning};
use concord_engine::ReconcileEngine;

use crate::parse::StageGridParser;
use crate::study::{discover_studies, find_stage_grid, load_study, StudyDir};
use crate::summary::{RunSummary, StudyFailure, StudyReport};
use crate::write::{self, AnnotationWriter};

/// One batch invocation: which tree to read, where to write, which mode.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub mode: ScoringMode,
}

/// Drives one reconciliation mode over every study under a data directory.
///
/// Holds the engine, the stage-grid parser, and the event dispatcher.
/// Per-study work is a pure function of the study's files, so the fan-out
/// can run studies on worker threads without coordination.
pub struct BatchRunner {
    grid_parser: StageGridParser,
    engine: ReconcileEngine,
    events: EventDispatcher,
}

impl BatchRunner {
    pub fn new(config: ConcordConfig) -> Self {
        Self {
            grid_parser: StageGridParser::new(&config.roster),
            engine: ReconcileEngine::new(config),
            events: EventDispatcher::new(),
        }
    }

    /// Register an observer for run lifecycle events.
    pub fn register_handler(&mut self, handler: Arc<dyn ConcordEventHandler>) {
        self.events.register(handler);
    }

    pub fn config(&self) -> &ConcordConfig {
        self.engine.config()
    }

    /// Run one mode over every study directory under `options.data_dir`.
    ///
    /// Returns `Err` only for run-level problems (unreadable data dir,
    /// unusable output config). Per-study errors land in the summary's
    /// failure list instead.
    pub fn run(&self, options: &RunOptions) -> Result<RunSummary, StudyError> {
        let started = Instant::now();
        let config = self.engine.config();

        let studies = discover_studies(&options.data_dir)?;

        fs::create_dir_all(&options.out_dir).map_err(|e| OutputError::Io {
            path: options.out_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let format = config.output.effective_format();
        let writer =
            write::create_writer(&format).ok_or(OutputError::UnknownFormat { format })?;

        let grid_pattern = Regex::new(&config.input.effective_stage_grid_pattern()).map_err(
            |e| concord_core::errors::ConfigError::ValidationFailed {
                field: "input.stage_grid_pattern".to_string(),
                message: e.to_string(),
            },
        )?;

        self.events.emit_run_started(&RunStartedEvent {
            root: options.data_dir.clone(),
            mode: options.mode,
            study_count: studies.len(),
        });
        tracing::info!(
            mode = %options.mode,
            studies = studies.len(),
            root = %options.data_dir.display(),
            "run started"
        );

        let mut reports = Vec::new();
        let mut failures = Vec::new();

        let threads = config.run.effective_threads();
        if threads == 1 {
            for study in &studies {
                match self.execute_study(study, options, &grid_pattern, writer.as_ref()) {
                    Ok(report) => reports.push(report),
                    Err(failure) => failures.push(failure),
                }
            }
        } else {
            if threads > 1 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .ok();
            }

            let (tx, rx) = crossbeam_channel::bounded(1024);
            let studies = &studies;
            let grid_pattern = &grid_pattern;
            let writer = writer.as_ref();
            rayon::scope(|s| {
                s.spawn(move |_| {
                    studies.par_iter().for_each_with(tx, |tx, study| {
                        let outcome =
                            self.execute_study(study, options, grid_pattern, writer);
                        let _ = tx.send(outcome);
                    });
                });
                // Drain as studies finish; the spawn drops the last sender.
                for outcome in rx.iter() {
                    match outcome {
                        Ok(report) => reports.push(report),
                        Err(failure) => failures.push(failure),
                    }
                }
            });
        }

        // Worker scheduling is nondeterministic; the summary is not.
        reports.sort_by(|a, b| a.study_id.cmp(&b.study_id));
        failures.sort_by(|a, b| a.study_id.cmp(&b.study_id));

        let summary = RunSummary {
            mode: options.mode,
            reports,
            failures,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        self.events.emit_run_completed(&RunCompletedEvent {
            reconciled: summary.processed(),
            failed: summary.failed(),
            duration_ms: summary.duration_ms,
        });
        tracing::info!(
            mode = %options.mode,
            reconciled = summary.processed(),
            failed = summary.failed(),
            duration_ms = summary.duration_ms,
            "run completed"
        );

        Ok(summary)
    }

    /// Process one study, emitting lifecycle events and folding any error
    /// into a [`StudyFailure`].
    fn execute_study(
        &self,
        study: &StudyDir,
        options: &RunOptions,
        grid_pattern: &Regex,
        writer: &dyn AnnotationWriter,
    ) -> Result<StudyReport, StudyFailure> {
        self.events.emit_study_started(&StudyStartedEvent {
            study_id: study.id.clone(),
        });

        let result = if options.mode.is_interval() {
            self.process_interval_study(study, options.mode, writer, &options.out_dir)
        } else {
            self.process_staging_study(study, grid_pattern, writer, &options.out_dir)
        };

        match result {
            Ok(report) => {
                self.events.emit_study_reconciled(&StudyReconciledEvent {
                    study_id: report.study_id.clone(),
                    confirmed: report.confirmed,
                    review: report.review,
                    duration_ms: report.duration_ms,
                });
                Ok(report)
            }
            Err(error) => {
                tracing::error!(study = %study.id, error = %error, "study failed");
                self.events.emit_study_failed(&StudyFailedEvent {
                    study_id: study.id.clone(),
                    message: error.to_string(),
                });
                Err(StudyFailure {
                    study_id: study.id.clone(),
                    error: error.to_string(),
                    code: error.error_code(),
                })
            }
        }
    }

    fn process_interval_study(
        &self,
        study: &StudyDir,
        mode: ScoringMode,
        writer: &dyn AnnotationWriter,
        out_dir: &Path,
    ) -> Result<StudyReport, StudyError> {
        let started = Instant::now();
        let annotations = load_study(study, mode, self.engine.config())?;

        for warning in &annotations.warnings {
            if let StudyWarning::MissingRaterSource { scorer, path } = warning {
                self.events.emit_rater_source_missing(&RaterSourceMissingEvent {
                    study_id: study.id.clone(),
                    scorer: *scorer,
                    path: PathBuf::from(path),
                });
            }
        }

        let reconciliation = self.engine.reconcile(mode, &annotations)?;
        let rows = reconciliation.annotations();
        let output_path = write_output(out_dir, &study.id, mode, writer, &rows)?;

        Ok(StudyReport {
            study_id: study.id.clone(),
            output_path: output_path.display().to_string(),
            confirmed: reconciliation.diagnostics.confirmed,
            review: reconciliation.diagnostics.review_events(),
            warnings: annotations.warnings,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn process_staging_study(
        &self,
        study: &StudyDir,
        grid_pattern: &Regex,
        writer: &dyn AnnotationWriter,
        out_dir: &Path,
    ) -> Result<StudyReport, StudyError> {
        let started = Instant::now();
        let grid_path = find_stage_grid(study, grid_pattern)?;
        let grid = self.grid_parser.parse(&grid_path)?;
        let (rows, stats) = self.engine.resolve_epochs(&grid);
        tracing::debug!(study = %grid.study_id, %stats, "epochs resolved");

        // The grid file stem, not the directory name, names the output.
        let output_path =
            write_output(out_dir, &grid.study_id, ScoringMode::Staging, writer, &rows)?;

        Ok(StudyReport {
            study_id: grid.study_id.clone(),
            output_path: output_path.display().to_string(),
            confirmed: stats.epochs - stats.flagged,
            review: stats.flagged,
            warnings: Vec::new(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Render first, then write in one shot, so a failing study never leaves
/// a truncated file in the output directory.
fn write_output(
    out_dir: &Path,
    study_id: &str,
    mode: ScoringMode,
    writer: &dyn AnnotationWriter,
    rows: &[Annotation],
) -> Result<PathBuf, StudyError> {
    let content = writer.render(rows).map_err(StudyError::from)?;
    let path = out_dir.join(format!("{study_id}{}.{}", mode.output_suffix(), writer.name()));
    fs::write(&path, content).map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}
