//! Post-run assembly: stage numbering, per-subject event combining, and
//! the final merge of staged epochs into the event timeline.
//!
//! These steps read back files the run itself wrote, join them per subject,
//! and emit the two legacy deliverables: `<subject>_combined_events.csv`
//! and `<subject>_merged.csv`. Both keep tab-separated content under a
//! `.csv` name, which is what downstream tooling expects.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;

use concord_core::config::ConcordConfig;
use concord_core::errors::{OutputError, ParseError, StudyError};
use concord_core::types::{Annotation, Onset, Scorer};

use crate::parse::parse_markers_file;
use crate::write::{self, tsv::TsvWriter, AnnotationWriter};

/// Read back one annotation output file, whatever format it was written in.
///
/// The sniff only has to tell the three writers apart: a JSON array, a
/// tab-delimited table, or a comma-delimited one.
pub fn read_annotation_file(path: &Path) -> Result<Vec<Annotation>, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let display = path.display().to_string();

    if content.trim_start().starts_with('[') {
        return parse_json_rows(&content, &display);
    }
    let tab_delimited = content
        .lines()
        .next()
        .is_some_and(|line| line.contains('\t'));
    parse_delimited_rows(&content, &display, tab_delimited)
}

fn parse_json_rows(content: &str, path: &str) -> Result<Vec<Annotation>, ParseError> {
    #[derive(serde::Deserialize)]
    struct Row {
        onset: String,
        duration: f64,
        description: String,
    }

    let rows: Vec<Row> = serde_json::from_str(content).map_err(|e| ParseError::MalformedRow {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    rows.into_iter()
        .map(|row| match Onset::parse(&row.onset) {
            Some(onset) => Ok(Annotation::new(onset, row.duration, row.description)),
            None => Err(ParseError::InvalidTimestamp {
                path: path.to_string(),
                value: row.onset,
            }),
        })
        .collect()
}

fn parse_delimited_rows(
    content: &str,
    path: &str,
    tab_delimited: bool,
) -> Result<Vec<Annotation>, ParseError> {
    let mut annotations = Vec::new();
    // First line is the Onset/Duration/Description header.
    for line in content.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<String> = if tab_delimited {
            line.splitn(3, '\t').map(str::to_string).collect()
        } else {
            split_csv_line(line)
        };
        if fields.len() < 3 {
            return Err(ParseError::MalformedRow {
                path: path.to_string(),
                message: format!("expected 3 columns, found {}", fields.len()),
            });
        }

        let onset = Onset::parse(&fields[0]).ok_or_else(|| ParseError::InvalidTimestamp {
            path: path.to_string(),
            value: fields[0].clone(),
        })?;
        let duration = fields[1]
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::MalformedRow {
                path: path.to_string(),
                message: format!("unparseable duration {:?}", fields[1]),
            })?;
        annotations.push(Annotation::new(onset, duration, fields[2].clone()));
    }
    Ok(annotations)
}

/// Split one CSV line, honoring double-quoted fields with `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }
    fields.push(field);
    fields
}

/// Prefix every row's description with its 1-based position, writing the
/// result next to the input as `<stem>_numbered.<ext>`.
///
/// Numbered descriptions let a reviewer name an epoch by ordinal once the
/// merge has interleaved stage rows with events.
pub fn number_stage_file(path: &Path) -> Result<PathBuf, StudyError> {
    let numbered: Vec<Annotation> = read_annotation_file(path)?
        .into_iter()
        .enumerate()
        .map(|(i, mut annotation)| {
            annotation.description = format!("{}. {}", i + 1, annotation.description);
            annotation
        })
        .collect();

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tsv".to_string());
    let writer = write::create_writer(&extension).ok_or(OutputError::UnknownFormat {
        format: extension.clone(),
    })?;
    let content = writer.render(&numbered).map_err(StudyError::from)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = path.with_file_name(format!("{stem}_numbered.{extension}"));
    fs::write(&output, content).map_err(|e| OutputError::Io {
        path: output.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(output)
}

/// Number every stage-annotation file under the output directory.
pub fn number_stage_files(out_dir: &Path) -> Result<Vec<PathBuf>, StudyError> {
    let mut written = Vec::new();
    for path in glob_sorted(out_dir, "*_stage_annotations.*")? {
        written.push(number_stage_file(&path)?);
    }
    Ok(written)
}

/// Combine each subject's flow and arousal outputs into one chronological
/// `<subject>_combined_events.csv`.
///
/// Flow files are read before arousal files and the sort is stable, so
/// events sharing an onset keep that order.
pub fn combine_subjects(out_dir: &Path) -> Result<Vec<PathBuf>, StudyError> {
    let flow = glob_sorted(out_dir, "*_flow_reconciliation.*")?;
    let arousal = glob_sorted(out_dir, "*_arousal_reconciliation.*")?;

    let mut subjects = BTreeSet::new();
    for path in flow.iter().chain(&arousal) {
        if let Some(subject) = subject_of(path) {
            subjects.insert(subject);
        }
    }

    let mut written = Vec::new();
    for subject in subjects {
        let mut annotations = Vec::new();
        for path in flow.iter().chain(&arousal) {
            if subject_of(path).as_deref() == Some(&subject) {
                annotations.extend(read_annotation_file(path)?);
            }
        }
        annotations.sort_by(|a, b| a.onset.cmp(&b.onset));

        let output = out_dir.join(format!("{subject}_combined_events.csv"));
        write_tsv(&output, &annotations)?;
        tracing::info!(subject = %subject, path = %output.display(), "combined events written");
        written.push(output);
    }
    Ok(written)
}

/// Merge every subject's combined events with its numbered stage
/// annotations into `<subject>_merged.csv`.
///
/// Subjects missing a numbered staging file or a markers anchor are
/// skipped, not failed.
pub fn merge_subjects(
    out_dir: &Path,
    data_dir: &Path,
    config: &ConcordConfig,
) -> Result<Vec<PathBuf>, StudyError> {
    let mut written = Vec::new();
    for combined_path in glob_sorted(out_dir, "*_combined_events.csv")? {
        let Some(subject) = subject_of(&combined_path) else {
            continue;
        };

        let staging = glob_sorted(out_dir, &format!("{subject}_stage_annotations_numbered.*"))?;
        let Some(staging_path) = staging.first() else {
            tracing::warn!(subject = %subject, "no numbered staging file, skipping merge");
            continue;
        };

        if let Some(path) =
            merge_subject(&combined_path, staging_path, data_dir, &subject, config)?
        {
            written.push(path);
        }
    }
    Ok(written)
}

fn merge_subject(
    combined_path: &Path,
    staging_path: &Path,
    data_dir: &Path,
    subject: &str,
    config: &ConcordConfig,
) -> Result<Option<PathBuf>, StudyError> {
    let events = read_annotation_file(combined_path)?;
    let Some(first_event) = events.iter().find_map(|a| a.onset.as_absolute()) else {
        tracing::warn!(subject = %subject, "combined file has no absolute onset, skipping merge");
        return Ok(None);
    };

    let Some(markers_path) = find_markers_file(data_dir, subject, config) else {
        tracing::warn!(subject = %subject, "no markers file, skipping merge");
        return Ok(None);
    };
    let start_time = parse_markers_file(&markers_path)?;

    // The markers line carries a clock time only. Its date comes from the
    // first scored event; a start time later than that event means the
    // recording began the previous day.
    let mut anchor = first_event.date().and_time(start_time);
    if anchor > first_event {
        anchor -= Duration::days(1);
    }

    let staging = read_annotation_file(staging_path)?;
    let mut merged = events;
    merged.extend(staging.into_iter().map(|mut annotation| {
        annotation.onset = annotation.onset.anchored(anchor);
        annotation
    }));
    merged.sort_by(|a, b| a.onset.cmp(&b.onset));

    let output = combined_path.with_file_name(format!("{subject}_merged.csv"));
    write_tsv(&output, &merged)?;
    tracing::info!(subject = %subject, path = %output.display(), "merged annotations written");
    Ok(Some(output))
}

/// Subject id of an output file: the stem up to the first underscore.
fn subject_of(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    stem.split('_').next().map(str::to_string)
}

/// Markers file for a subject, taking the first scorer directory that has
/// one, in roster order.
fn find_markers_file(data_dir: &Path, subject: &str, config: &ConcordConfig) -> Option<PathBuf> {
    let file_name = config.input.effective_markers_file();
    Scorer::ALL.into_iter().find_map(|scorer| {
        let path = data_dir
            .join(subject)
            .join(config.roster.name(scorer))
            .join(&file_name);
        path.exists().then_some(path)
    })
}

fn glob_sorted(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, OutputError> {
    let full = dir.join(pattern).display().to_string();
    let mut paths: Vec<PathBuf> = glob::glob(&full)
        .map_err(|e| OutputError::Io {
            path: full.clone(),
            message: e.to_string(),
        })?
        .flatten()
        .collect();
    paths.sort();
    Ok(paths)
}

fn write_tsv(path: &Path, annotations: &[Annotation]) -> Result<(), StudyError> {
    let content = TsvWriter.render(annotations).map_err(StudyError::from)?;
    fs::write(path, content).map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
