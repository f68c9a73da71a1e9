//! Parser for per-scorer annotation export files.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use regex::Regex;

use concord_core::errors::ParseError;
use concord_core::types::{Interval, Scorer};

/// `Start Time: 08/05/2019 10:31:12 PM` header line.
static START_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Start Time:\s*(.*)").unwrap());

/// Prefix of one event row: time range, duration field, and the separator
/// before the label. Exports concatenate rows without newlines, so rows are
/// located by this prefix and each label runs to the next prefix or EOF.
static ROW_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})-(\d{2}:\d{2}:\d{2},\d{3});\s*\d+;\s*").unwrap()
});

const START_TIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";
const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S,%3f";

/// One parsed export: the recording start time from the file header plus
/// the scorer's intervals, dates normalized so `start <= end` holds.
#[derive(Debug, Clone)]
pub struct ParsedEvents {
    pub start_time: NaiveDateTime,
    pub intervals: Vec<Interval>,
}

/// Parse one scorer's export file.
pub fn parse_event_file(path: &Path, scorer: Scorer) -> Result<ParsedEvents, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_event_text(&content, scorer, &path.display().to_string())
}

/// Parse export text already read into memory.
///
/// Event rows carry time-of-day stamps only. Each stamp is dated from the
/// header start date; a time-of-day earlier than the header's rolls over
/// to the next day (midnight crossing), and an end earlier than its start
/// forces the end to the next day as well.
pub fn parse_event_text(
    content: &str,
    scorer: Scorer,
    path: &str,
) -> Result<ParsedEvents, ParseError> {
    let header = START_TIME_RE
        .captures(content)
        .ok_or_else(|| ParseError::MissingStartTime {
            path: path.to_string(),
        })?;
    let start_value = header[1].trim();
    let start_time = NaiveDateTime::parse_from_str(start_value, START_TIME_FORMAT).map_err(
        |_| ParseError::InvalidTimestamp {
            path: path.to_string(),
            value: start_value.to_string(),
        },
    )?;

    let rows: Vec<regex::Captures> = ROW_PREFIX_RE.captures_iter(content).collect();
    let mut intervals = Vec::with_capacity(rows.len());
    for (index, caps) in rows.iter().enumerate() {
        let Some(prefix) = caps.get(0) else { continue };
        let label_end = rows
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let label = content[prefix.end()..label_end].trim();

        let start_tod = parse_time_of_day(&caps[1], path)?;
        let end_tod = parse_time_of_day(&caps[2], path)?;
        let (start, end) = date_from_header(start_tod, end_tod, start_time);
        intervals.push(Interval::new(scorer, start, end, label));
    }

    tracing::debug!(path, scorer = %scorer, events = intervals.len(), "parsed event export");

    Ok(ParsedEvents {
        start_time,
        intervals,
    })
}

fn parse_time_of_day(value: &str, path: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value, TIME_OF_DAY_FORMAT).map_err(|_| {
        ParseError::InvalidTimestamp {
            path: path.to_string(),
            value: value.to_string(),
        }
    })
}

fn date_from_header(
    start_tod: NaiveTime,
    end_tod: NaiveTime,
    header: NaiveDateTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let date = header.date();
    let mut start = date.and_time(start_tod);
    if start_tod < header.time() {
        start += Duration::days(1);
    }
    let mut end = date.and_time(end_tod);
    if end_tod < header.time() || end < start {
        end += Duration::days(1);
    }
    (start, end)
}
