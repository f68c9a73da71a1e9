//! Tab-separated writer, the default output format.

use concord_core::errors::OutputError;
use concord_core::types::Annotation;

use super::AnnotationWriter;

pub struct TsvWriter;

impl AnnotationWriter for TsvWriter {
    fn name(&self) -> &'static str {
        "tsv"
    }

    fn render(&self, annotations: &[Annotation]) -> Result<String, OutputError> {
        let mut output = String::from("Onset\tDuration\tDescription\n");
        for annotation in annotations {
            output.push_str(&format!(
                "{}\t{:.2}\t{}\n",
                annotation.onset, annotation.duration_secs, annotation.description
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use concord_core::types::Onset;

    #[test]
    fn test_render_absolute_and_relative_onsets() {
        let onset = NaiveDate::from_ymd_opt(2019, 8, 5)
            .unwrap()
            .and_hms_milli_opt(22, 39, 10, 160)
            .unwrap();
        let annotations = vec![
            Annotation::new(Onset::Absolute(onset), 10.5, "Hypopnea"),
            Annotation::new(Onset::Relative(930), 30.0, "Stage: N2"),
        ];
        let text = TsvWriter.render(&annotations).unwrap();
        assert_eq!(
            text,
            "Onset\tDuration\tDescription\n\
             2019-08-05T22:39:10.160\t10.50\tHypopnea\n\
             930\t30.00\tStage: N2\n"
        );
    }

    #[test]
    fn test_render_empty_is_header_only() {
        assert_eq!(TsvWriter.render(&[]).unwrap(), "Onset\tDuration\tDescription\n");
    }
}
