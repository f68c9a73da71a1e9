//! Output writers for reconciled annotations.

pub mod csv;
pub mod json;
pub mod tsv;

use concord_core::errors::OutputError;
use concord_core::types::Annotation;

/// Trait for annotation rendering. Writers produce the whole file content
/// in one call so a failed study never leaves a partial file behind.
pub trait AnnotationWriter: Send + Sync {
    /// Format name, doubling as the output file extension.
    fn name(&self) -> &'static str;
    fn render(&self, annotations: &[Annotation]) -> Result<String, OutputError>;
}

/// Create a writer by format name.
pub fn create_writer(format: &str) -> Option<Box<dyn AnnotationWriter>> {
    match format {
        "tsv" => Some(Box::new(tsv::TsvWriter)),
        "csv" => Some(Box::new(csv::CsvWriter)),
        "json" => Some(Box::new(json::JsonWriter)),
        _ => None,
    }
}

/// List all available writer format names.
pub fn available_formats() -> &'static [&'static str] {
    &["tsv", "csv", "json"]
}
