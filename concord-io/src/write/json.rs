//! JSON writer: an array of annotation objects.

use concord_core::errors::OutputError;
use concord_core::types::Annotation;

use super::AnnotationWriter;

pub struct JsonWriter;

impl AnnotationWriter for JsonWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, annotations: &[Annotation]) -> Result<String, OutputError> {
        let rows: Vec<serde_json::Value> = annotations
            .iter()
            .map(|annotation| {
                serde_json::json!({
                    "onset": annotation.onset.to_string(),
                    "duration": (annotation.duration_secs * 100.0).round() / 100.0,
                    "description": annotation.description,
                })
            })
            .collect();
        serde_json::to_string_pretty(&rows).map_err(|e| OutputError::RenderFailed {
            format: "json".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::types::Onset;

    #[test]
    fn test_render_round_trips_through_serde() {
        let annotations = vec![
            Annotation::new(Onset::Relative(0), 30.0, "Stage: W"),
            Annotation::new(Onset::Relative(30), 30.555, "Stage: N1"),
        ];
        let text = JsonWriter.render(&annotations).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["onset"], "0");
        assert_eq!(parsed[0]["description"], "Stage: W");
        assert_eq!(parsed[1]["duration"], 30.56);
    }
}
