use super::{OutputWriter, DISCLAIMER};
use crate::artifact::ArtifactMetadata;
use crate::assessment::FatigueAssessment;
use crate::profile::Feature;
use crate::training::TrainingReport;
use std::io::Write;
use std::path::Path;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_row(&mut self, label: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "| {label} | {value} |")?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_assessment(&mut self, assessment: &FatigueAssessment) -> anyhow::Result<()> {
        writeln!(self.writer, "# Digital Fatigue Assessment")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**Fatigue score:** {:.1} / 100 ({} risk)",
            assessment.score,
            assessment.risk_category.label()
        )?;
        writeln!(self.writer)?;

        writeln!(self.writer, "## Inputs")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Input | Value |")?;
        writeln!(self.writer, "|-------|-------|")?;
        for feature in Feature::ALL {
            let mut value = format!("{}", assessment.profile.get(feature));
            if assessment.adjusted_features.contains(&feature) {
                value.push_str(" (clamped)");
            }
            self.write_row(feature.label(), &value)?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Factor Contributions")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Factor | Relative Impact |")?;
        writeln!(self.writer, "|--------|-----------------|")?;
        for contribution in &assessment.contributions {
            self.write_row(
                contribution.factor.label(),
                &format!("{:.2}", contribution.relative_impact),
            )?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Advice")?;
        writeln!(self.writer)?;
        for advice in &assessment.advice {
            writeln!(self.writer, "- {}", advice.message)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "> {}", DISCLAIMER)?;
        Ok(())
    }

    fn write_training_report(&mut self, report: &TrainingReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Training Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Trained: {}",
            report.trained_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_row("Dataset", &report.data_path.display().to_string())?;
        self.write_row("Rows used", &report.rows_used.to_string())?;
        self.write_row("Rows dropped", &report.dropped_rows.to_string())?;
        self.write_row(
            "Train / test",
            &format!("{} / {}", report.training_rows, report.test_rows),
        )?;
        self.write_row("Validation MAE", &format!("{:.3}", report.validation_mae))?;
        self.write_row(
            "Raw label range",
            &format!("{:.2} .. {:.2}", report.label_scale.min, report.label_scale.max),
        )?;
        self.write_row(
            "Trees / depth / leaf",
            &format!(
                "{} / {} / {}",
                report.params.n_estimators, report.params.max_depth, report.params.min_samples_leaf
            ),
        )?;
        self.write_row("Seed", &report.seed.to_string())?;
        self.write_row("Artifact", &report.model_path.display().to_string())?;
        Ok(())
    }

    fn write_artifact_summary(
        &mut self,
        path: &Path,
        metadata: &ArtifactMetadata,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Model Artifact")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Field | Value |")?;
        writeln!(self.writer, "|-------|-------|")?;
        self.write_row("Path", &path.display().to_string())?;
        self.write_row(
            "Trained",
            &metadata.trained_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )?;
        self.write_row(
            "Train / test rows",
            &format!("{} / {}", metadata.training_rows, metadata.test_rows),
        )?;
        self.write_row("Validation MAE", &format!("{:.3}", metadata.validation_mae))?;
        self.write_row("Trees", &metadata.params.n_estimators.to_string())?;
        self.write_row("Features", &metadata.feature_names.join(", "))?;
        Ok(())
    }
}
