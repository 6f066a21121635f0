use super::{OutputWriter, DISCLAIMER};
use crate::artifact::ArtifactMetadata;
use crate::assessment::FatigueAssessment;
use crate::training::TrainingReport;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct AssessmentDocument<'a> {
    #[serde(flatten)]
    assessment: &'a FatigueAssessment,
    disclaimer: &'static str,
}

#[derive(Serialize)]
struct ArtifactDocument<'a> {
    path: &'a Path,
    #[serde(flatten)]
    metadata: &'a ArtifactMetadata,
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_assessment(&mut self, assessment: &FatigueAssessment) -> anyhow::Result<()> {
        self.emit(&AssessmentDocument {
            assessment,
            disclaimer: DISCLAIMER,
        })
    }

    fn write_training_report(&mut self, report: &TrainingReport) -> anyhow::Result<()> {
        self.emit(report)
    }

    fn write_artifact_summary(
        &mut self,
        path: &Path,
        metadata: &ArtifactMetadata,
    ) -> anyhow::Result<()> {
        self.emit(&ArtifactDocument { path, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::assessment;

    #[test]
    fn test_assessment_json_fields() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_assessment(&assessment(57.25))
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["score"], 57.25);
        assert_eq!(value["risk_category"], "MODERATE");
        assert_eq!(value["advice"][0]["kind"], "reduce_screen_time");
        assert_eq!(value["contributions"].as_array().unwrap().len(), 6);
        assert!(value["disclaimer"].as_str().unwrap().contains("decision-support"));
    }
}
