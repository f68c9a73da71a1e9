//! End-to-end batch runner tests over synthetic study trees.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use concord_core::config::ConcordConfig;
use concord_core::events::{
    ConcordEventHandler, RaterSourceMissingEvent, StudyFailedEvent, StudyReconciledEvent,
    StudyStartedEvent,
};
use concord_core::types::ScoringMode;
use concord_io::{BatchRunner, RunOptions};

const SCORERS: [&str; 3] = ["LS", "ES", "MS"];

const FLOW_TWO_EVENTS: &str = "\
Start Time: 08/05/2019 10:31:12 PM
22:39:10,160-22:39:20,660; 23; Hypopnea
22:41:00,000-22:41:15,000; 23; Obstructive Apnea
";

const FLOW_ONE_EVENT: &str = "\
Start Time: 08/05/2019 10:31:12 PM
23:02:05,000-23:02:17,500; 23; Central Apnea
";

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Write the same export for every scorer of one study.
fn seed_identical_study(data_dir: &Path, study_id: &str, file_name: &str, content: &str) {
    for scorer in SCORERS {
        write_file(&data_dir.join(study_id).join(scorer).join(file_name), content);
    }
}

fn options(data_dir: &Path, out_dir: &Path, mode: ScoringMode) -> RunOptions {
    RunOptions {
        data_dir: data_dir.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        mode,
    }
}

#[test]
fn test_flow_run_end_to_end() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed_identical_study(data.path(), "AWV001", "Flow Events.txt", FLOW_TWO_EVENTS);
    seed_identical_study(data.path(), "AWV002", "Flow Events.txt", FLOW_ONE_EVENT);
    fs::create_dir_all(data.path().join("AWV003")).unwrap();

    let runner = BatchRunner::new(ConcordConfig::default());
    let summary = runner
        .run(&options(data.path(), out.path(), ScoringMode::Flow))
        .unwrap();

    assert_eq!(summary.processed(), 2);
    assert_eq!(summary.failed(), 1);
    let ids: Vec<&str> = summary.reports.iter().map(|r| r.study_id.as_str()).collect();
    assert_eq!(ids, ["AWV001", "AWV002"]);
    assert_eq!(summary.failures[0].study_id, "AWV003");

    let content = fs::read_to_string(out.path().join("AWV001_flow_reconciliation.tsv")).unwrap();
    assert_eq!(
        content,
        "Onset\tDuration\tDescription\n\
         2019-08-05T22:39:10.160\t10.50\tHypopnea\n\
         2019-08-05T22:41:00.000\t15.00\tObstructive Apnea\n"
    );
    assert_eq!(summary.reports[0].confirmed, 2);
    assert_eq!(summary.reports[0].review, 0);

    // The failed study writes nothing.
    assert!(!out.path().join("AWV003_flow_reconciliation.tsv").exists());
}

#[test]
fn test_arousal_run_ignores_label_disagreement() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let labels = ["EEG arousal", "Resp arousal", "Movement arousal"];
    for (scorer, label) in SCORERS.into_iter().zip(labels) {
        write_file(
            &data
                .path()
                .join("AWV001")
                .join(scorer)
                .join("Classification Arousals.txt"),
            &format!(
                "Start Time: 08/05/2019 10:31:12 PM\n22:40:00,000-22:40:10,000; 5; {label}\n"
            ),
        );
    }

    let runner = BatchRunner::new(ConcordConfig::default());
    let summary = runner
        .run(&options(data.path(), out.path(), ScoringMode::Arousal))
        .unwrap();

    assert_eq!(summary.processed(), 1);
    let content =
        fs::read_to_string(out.path().join("AWV001_arousal_reconciliation.tsv")).unwrap();
    assert_eq!(
        content,
        "Onset\tDuration\tDescription\n2019-08-05T22:40:00.000\t10.00\tArousal\n"
    );
}

#[test]
fn test_staging_run_names_output_after_grid_stem() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_file(
        &data.path().join("AWV001").join("AWV001.csv"),
        "Epoch;LS;ES;MS\n1;N2;N2;N2\n2;W;N2;N2\n3;W;N1;R\n",
    );
    // No grid at all in the second study.
    fs::create_dir_all(data.path().join("AWV002")).unwrap();

    let runner = BatchRunner::new(ConcordConfig::default());
    let summary = runner
        .run(&options(data.path(), out.path(), ScoringMode::Staging))
        .unwrap();

    assert_eq!(summary.processed(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].study_id, "AWV002");

    let content = fs::read_to_string(out.path().join("AWV001_stage_annotations.tsv")).unwrap();
    assert_eq!(
        content,
        "Onset\tDuration\tDescription\n\
         0\t30.00\tStage: N2\n\
         30\t30.00\tStage: N2\n\
         60\t30.00\tStage: -\n"
    );
    assert_eq!(summary.reports[0].confirmed, 2);
    assert_eq!(summary.reports[0].review, 1);
}

#[test]
fn test_missing_scorer_degrades_study_to_review() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    for scorer in ["LS", "ES"] {
        write_file(
            &data
                .path()
                .join("AWV001")
                .join(scorer)
                .join("Flow Events.txt"),
            FLOW_ONE_EVENT,
        );
    }

    let runner = BatchRunner::new(ConcordConfig::default());
    let summary = runner
        .run(&options(data.path(), out.path(), ScoringMode::Flow))
        .unwrap();

    // Two agreeing scorers cannot produce the unanimous bin confirmation
    // requires, so the event survives only as a review span.
    assert_eq!(summary.processed(), 1);
    let report = &summary.reports[0];
    assert_eq!(report.confirmed, 0);
    assert_eq!(report.review, 1);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_format_override_controls_writer_and_extension() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed_identical_study(data.path(), "AWV001", "Flow Events.txt", FLOW_ONE_EVENT);

    let mut config = ConcordConfig::default();
    config.output.format = Some("csv".to_string());
    let runner = BatchRunner::new(config);
    let summary = runner
        .run(&options(data.path(), out.path(), ScoringMode::Flow))
        .unwrap();

    let path = out.path().join("AWV001_flow_reconciliation.csv");
    assert!(path.exists());
    assert_eq!(summary.reports[0].output_path, path.display().to_string());
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("Onset,Duration,Description\n"));
}

#[test]
fn test_unknown_format_fails_the_whole_run() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed_identical_study(data.path(), "AWV001", "Flow Events.txt", FLOW_ONE_EVENT);

    let mut config = ConcordConfig::default();
    config.output.format = Some("xml".to_string());
    let runner = BatchRunner::new(config);
    assert!(runner
        .run(&options(data.path(), out.path(), ScoringMode::Flow))
        .is_err());
}

#[test]
fn test_parallel_run_matches_sequential() {
    let data = TempDir::new().unwrap();
    let out_seq = TempDir::new().unwrap();
    let out_par = TempDir::new().unwrap();
    seed_identical_study(data.path(), "AWV001", "Flow Events.txt", FLOW_TWO_EVENTS);
    seed_identical_study(data.path(), "AWV002", "Flow Events.txt", FLOW_ONE_EVENT);
    seed_identical_study(data.path(), "AWV003", "Flow Events.txt", FLOW_ONE_EVENT);

    let sequential = BatchRunner::new(ConcordConfig::default())
        .run(&options(data.path(), out_seq.path(), ScoringMode::Flow))
        .unwrap();

    let mut config = ConcordConfig::default();
    config.run.threads = Some(2);
    let parallel = BatchRunner::new(config)
        .run(&options(data.path(), out_par.path(), ScoringMode::Flow))
        .unwrap();

    assert_eq!(sequential.processed(), parallel.processed());
    for (a, b) in sequential.reports.iter().zip(&parallel.reports) {
        assert_eq!(a.study_id, b.study_id);
        assert_eq!(a.confirmed, b.confirmed);
        assert_eq!(a.review, b.review);
    }
    for report in &parallel.reports {
        let name = Path::new(&report.output_path).file_name().unwrap();
        let seq_content = fs::read_to_string(out_seq.path().join(name)).unwrap();
        let par_content = fs::read_to_string(&report.output_path).unwrap();
        assert_eq!(seq_content, par_content);
    }
}

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
}

impl ConcordEventHandler for Recorder {
    fn on_study_started(&self, event: &StudyStartedEvent) {
        self.log
            .lock()
            .unwrap()
            .push(format!("started {}", event.study_id));
    }

    fn on_study_reconciled(&self, event: &StudyReconciledEvent) {
        self.log
            .lock()
            .unwrap()
            .push(format!("reconciled {} {}", event.study_id, event.confirmed));
    }

    fn on_study_failed(&self, event: &StudyFailedEvent) {
        self.log
            .lock()
            .unwrap()
            .push(format!("failed {}", event.study_id));
    }

    fn on_rater_source_missing(&self, event: &RaterSourceMissingEvent) {
        self.log
            .lock()
            .unwrap()
            .push(format!("missing {} {}", event.study_id, event.scorer));
    }
}

#[test]
fn test_lifecycle_events_fire_per_study() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed_identical_study(data.path(), "AWV001", "Flow Events.txt", FLOW_TWO_EVENTS);
    for scorer in ["LS", "ES"] {
        write_file(
            &data
                .path()
                .join("AWV002")
                .join(scorer)
                .join("Flow Events.txt"),
            FLOW_ONE_EVENT,
        );
    }
    fs::create_dir_all(data.path().join("AWV003")).unwrap();

    let recorder = Arc::new(Recorder::default());
    let mut runner = BatchRunner::new(ConcordConfig::default());
    runner.register_handler(recorder.clone());
    runner
        .run(&options(data.path(), out.path(), ScoringMode::Flow))
        .unwrap();

    let log = recorder.log.lock().unwrap();
    assert!(log.contains(&"started AWV001".to_string()));
    assert!(log.contains(&"reconciled AWV001 2".to_string()));
    assert!(log.contains(&"missing AWV002 C".to_string()));
    assert!(log.contains(&"failed AWV003".to_string()));
}
