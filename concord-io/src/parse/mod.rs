//! Parsers for the annotation-export formats Concord consumes.

pub mod event_file;
pub mod markers;
pub mod stage_grid;

pub use event_file::{parse_event_file, parse_event_text, ParsedEvents};
pub use markers::{parse_markers_file, parse_markers_text};
pub use stage_grid::StageGridParser;
