//! Markers-file parsing: the recording start marker used as merge anchor.

use std::fs;
use std::path::Path;

use chrono::NaiveTime;

use concord_core::errors::ParseError;

/// Extract the recording start time from a markers file.
///
/// Marker rows have the shape `HH:MM:SS,mmm; <label>`; the first row
/// labeled `Start` supplies the time. The stamp is time-of-day only; the
/// merge step dates it against the combined events.
pub fn parse_markers_file(path: &Path) -> Result<NaiveTime, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_markers_text(&content, &path.display().to_string())
}

/// Parse markers text already read into memory.
pub fn parse_markers_text(content: &str, path: &str) -> Result<NaiveTime, ParseError> {
    for line in content.lines() {
        if !line.contains("; Start") {
            continue;
        }
        let Some(time_text) = line.split(';').next() else {
            continue;
        };
        return parse_marker_time(time_text.trim(), path);
    }
    Err(ParseError::MalformedRow {
        path: path.to_string(),
        message: "no start marker row".to_string(),
    })
}

fn parse_marker_time(value: &str, path: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S,%3f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ParseError::InvalidTimestamp {
            path: path.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_marker_with_millis() {
        let text = "22:31:12,160; Start\n23:10:00,000; Lights Off\n";
        let time = parse_markers_text(text, "test").unwrap();
        assert_eq!(time, NaiveTime::from_hms_milli_opt(22, 31, 12, 160).unwrap());
    }

    #[test]
    fn test_start_marker_whole_seconds() {
        let time = parse_markers_text("22:31:12; Start\n", "test").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(22, 31, 12).unwrap());
    }

    #[test]
    fn test_first_start_row_wins() {
        let text = "21:00:00,000; Start\n22:00:00,000; Start\n";
        let time = parse_markers_text(text, "test").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_start_marker() {
        let err = parse_markers_text("23:10:00,000; Lights Off\n", "test").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRow { .. }));
    }

    #[test]
    fn test_unparseable_marker_time() {
        let err = parse_markers_text("late evening; Start\n", "test").unwrap_err();
        assert!(matches!(err, ParseError::InvalidTimestamp { .. }));
    }
}
