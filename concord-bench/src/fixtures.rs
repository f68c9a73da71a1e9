//! Shared test fixtures and generators for benchmarks.
//! Deterministic: same seed → same output across runs.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use concord_core::config::RosterConfig;
use concord_core::types::{Interval, Scorer, StageGrid, StudyAnnotations};

/// A generated study tree with deterministic export content.
pub struct TestFixture {
    pub root: PathBuf,
    pub studies: Vec<FixtureStudy>,
    pub total_events: usize,
    pub total_bytes: usize,
}

/// A single generated study in a test fixture.
pub struct FixtureStudy {
    pub id: String,
    pub dir: PathBuf,
    pub events_per_scorer: usize,
    pub epochs: usize,
}

/// Fixture size presets.
#[derive(Debug, Clone, Copy)]
pub enum FixtureSize {
    /// 2 studies, 40 events per scorer. Unit test scale.
    Micro,
    /// 10 studies, 200 events per scorer. One scoring batch.
    Small,
    /// 40 studies, 400 events per scorer. A site month.
    Medium,
    /// 200 studies, 1K events per scorer. Full-night density across a cohort.
    Large,
}

impl FixtureSize {
    pub fn study_count(&self) -> usize {
        match self {
            Self::Micro => 2,
            Self::Small => 10,
            Self::Medium => 40,
            Self::Large => 200,
        }
    }

    pub fn events_per_scorer(&self) -> usize {
        match self {
            Self::Micro => 40,
            Self::Small => 200,
            Self::Medium => 400,
            Self::Large => 1_000,
        }
    }

    pub fn epochs(&self) -> usize {
        match self {
            Self::Micro => 120,
            Self::Small => 480,
            Self::Medium => 960,
            Self::Large => 960,
        }
    }
}

/// Label distribution for generated exports.
struct LabelSpec {
    label: &'static str,
    weight: usize,
}

const EVENT_LABELS: &[LabelSpec] = &[
    LabelSpec { label: "Hypopnea", weight: 45 },
    LabelSpec { label: "Obstructive Apnea", weight: 25 },
    LabelSpec { label: "Central Apnea", weight: 15 },
    LabelSpec { label: "Mixed Apnea", weight: 10 },
    LabelSpec { label: "RERA", weight: 5 },
];

const STAGE_LABELS: &[LabelSpec] = &[
    LabelSpec { label: "N2", weight: 45 },
    LabelSpec { label: "W", weight: 15 },
    LabelSpec { label: "N3", weight: 15 },
    LabelSpec { label: "R", weight: 15 },
    LabelSpec { label: "N1", weight: 10 },
];

/// Header line every synthetic export carries.
const START_TIME_HEADER: &str = "Start Time: 08/05/2019 10:00:00 PM";

/// The datetime [`START_TIME_HEADER`] parses to.
fn recording_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 8, 5)
        .and_then(|date| date.and_hms_opt(22, 0, 0))
        .expect("valid fixture start time")
}

/// Generate a deterministic study tree on disk.
/// Uses a simple PRNG seeded from the given seed for reproducibility.
///
/// Layout per study: one export per scorer under the scorer's directory,
/// plus a stage grid named after the study at the study root.
pub fn generate_fixture(root: &Path, size: FixtureSize, seed: u64) -> TestFixture {
    let roster = RosterConfig::default();
    let mut rng = SimpleRng::new(seed);
    let mut studies = Vec::with_capacity(size.study_count());
    let mut total_events = 0;
    let mut total_bytes = 0;

    for i in 0..size.study_count() {
        let id = format!("SYN{:03}", i + 1);
        let dir = root.join(&id);
        let plans = plan_events(size.events_per_scorer(), &mut rng);

        for scorer in Scorer::ALL {
            let scorer_dir = dir.join(roster.name(scorer));
            let _ = std::fs::create_dir_all(&scorer_dir);
            let content = render_export(&plans, scorer);
            total_bytes += content.len();
            let _ = std::fs::write(scorer_dir.join("Flow Events.txt"), &content);
        }

        let grid = render_grid(size.epochs(), &roster, &mut rng);
        total_bytes += grid.len();
        let _ = std::fs::write(dir.join(format!("{id}.csv")), &grid);

        total_events += plans.len() * Scorer::COUNT;
        studies.push(FixtureStudy {
            id,
            dir,
            events_per_scorer: plans.len(),
            epochs: size.epochs(),
        });
    }

    TestFixture {
        root: root.to_path_buf(),
        studies,
        total_events,
        total_bytes,
    }
}

/// Build one study's interval inputs in memory, no disk involved.
/// Same event model as [`generate_fixture`]: shared true windows with
/// per-scorer onset jitter, so consensus sees near- but not exact
/// agreement.
pub fn synthetic_annotations(
    study_id: &str,
    events_per_scorer: usize,
    seed: u64,
) -> StudyAnnotations {
    let mut rng = SimpleRng::new(seed);
    let plans = plan_events(events_per_scorer, &mut rng);
    let mut annotations = StudyAnnotations::new(study_id);
    for scorer in Scorer::ALL {
        let intervals = plans
            .iter()
            .map(|plan| {
                let (start, end) = plan.window(scorer);
                Interval::new(scorer, start, end, plan.label)
            })
            .collect();
        annotations.add_source(scorer, recording_start(), intervals);
    }
    annotations
}

/// Build one study's stage grid in memory.
pub fn synthetic_grid(study_id: &str, epochs: usize, seed: u64) -> StageGrid {
    let mut rng = SimpleRng::new(seed);
    let mut grid = StageGrid::new(study_id);
    for _ in 0..epochs {
        grid.rows.push(stage_row(&mut rng).map(str::to_string));
    }
    grid
}

/// One scheduled event: a shared true window plus each scorer's onset
/// jitter. Jitter stays under the gap floor, so per-scorer intervals keep
/// their order and never overlap within one scorer.
struct EventPlan {
    /// Offset of the true onset from the recording start.
    onset_ms: u64,
    duration_ms: u64,
    jitter_ms: [i64; Scorer::COUNT],
    label: &'static str,
}

impl EventPlan {
    /// The interval one scorer asserts for this event.
    fn window(&self, scorer: Scorer) -> (NaiveDateTime, NaiveDateTime) {
        let shift =
            Duration::milliseconds(self.onset_ms as i64 + self.jitter_ms[scorer.index()]);
        let start = recording_start() + shift;
        (start, start + Duration::milliseconds(self.duration_ms as i64))
    }
}

/// Lay out `count` events after the recording start: 15-60 s gaps,
/// 8-30 s durations, ±1 s scorer jitter.
fn plan_events(count: usize, rng: &mut SimpleRng) -> Vec<EventPlan> {
    let mut plans = Vec::with_capacity(count);
    let mut clock_ms: u64 = 0;
    for _ in 0..count {
        clock_ms += 15_000 + rng.next_u64() % 45_000;
        let duration_ms = 8_000 + rng.next_u64() % 22_000;
        let jitter_ms = [0u8; Scorer::COUNT].map(|_| (rng.next_u64() % 2_001) as i64 - 1_000);
        plans.push(EventPlan {
            onset_ms: clock_ms,
            duration_ms,
            jitter_ms,
            label: pick_label(rng, EVENT_LABELS),
        });
        clock_ms += duration_ms;
    }
    plans
}

/// Render one scorer's export file for a planned event schedule.
fn render_export(plans: &[EventPlan], scorer: Scorer) -> String {
    let mut out = String::with_capacity(plans.len() * 48 + 64);
    out.push_str("Signal Type: Flow\n");
    out.push_str(START_TIME_HEADER);
    out.push_str("\nUnit: s\n\n");
    for plan in plans {
        let (start, end) = plan.window(scorer);
        out.push_str(&format!(
            "{}-{}; {}; {}\n",
            start.format("%H:%M:%S,%3f"),
            end.format("%H:%M:%S,%3f"),
            plan.duration_ms / 1000,
            plan.label
        ));
    }
    out
}

/// One epoch's labels: a base stage every scorer asserts with 85%
/// probability, disagreeing scorers drawing a fresh stage.
fn stage_row(rng: &mut SimpleRng) -> [&'static str; Scorer::COUNT] {
    let base = pick_label(rng, STAGE_LABELS);
    [0u8; Scorer::COUNT].map(|_| {
        if rng.next_u64() % 100 < 85 {
            base
        } else {
            pick_label(rng, STAGE_LABELS)
        }
    })
}

/// Render a `;`-separated stage grid with one column per roster scorer.
fn render_grid(epochs: usize, roster: &RosterConfig, rng: &mut SimpleRng) -> String {
    let mut out = String::with_capacity(epochs * 16 + 32);
    out.push_str("Epoch");
    for code in roster.effective_scorers() {
        out.push(';');
        out.push_str(&code);
    }
    out.push('\n');
    for epoch in 0..epochs {
        out.push_str(&(epoch + 1).to_string());
        for label in stage_row(rng) {
            out.push(';');
            out.push_str(label);
        }
        out.push('\n');
    }
    out
}

fn pick_label(rng: &mut SimpleRng, table: &'static [LabelSpec]) -> &'static str {
    let total_weight: usize = table.iter().map(|l| l.weight).sum();
    let mut pick = (rng.next_u64() as usize) % total_weight;
    for spec in table {
        if pick < spec.weight {
            return spec.label;
        }
        pick -= spec.weight;
    }
    table[0].label
}

/// Simple deterministic PRNG (xorshift64) for reproducible fixtures.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}
