//! Comma-separated writer.

use std::borrow::Cow;

use concord_core::errors::OutputError;
use concord_core::types::Annotation;

use super::AnnotationWriter;

pub struct CsvWriter;

/// Quote a field when it contains a separator, quote, or newline.
fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

impl AnnotationWriter for CsvWriter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn render(&self, annotations: &[Annotation]) -> Result<String, OutputError> {
        let mut output = String::from("Onset,Duration,Description\n");
        for annotation in annotations {
            output.push_str(&format!(
                "{},{:.2},{}\n",
                annotation.onset,
                annotation.duration_secs,
                quote(&annotation.description)
            ));
        }
        Ok(output)
    }
}
