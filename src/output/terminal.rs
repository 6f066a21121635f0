use super::{bar, OutputWriter, DISCLAIMER};
use crate::artifact::ArtifactMetadata;
use crate::assessment::{FatigueAssessment, RiskCategory};
use crate::formatting::{emoji_fallback, formatter_for, FormattingConfig, OutputFormatter};
use crate::training::TrainingReport;
use comfy_table::{presets, ContentArrangement, Table};
use std::io::Write;
use std::path::Path;

const BAR_WIDTH: usize = 20;
const RULE: &str = "═══════════════════════════════════════════";

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatter: Box<dyn OutputFormatter>,
    plain: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            formatter: formatter_for(formatting),
            plain: formatting.is_plain(),
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.plain {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            })
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn bar(&self, fraction: f64) -> String {
        if self.plain {
            bar(fraction, BAR_WIDTH, '#', '.')
        } else {
            bar(fraction, BAR_WIDTH, '█', '░')
        }
    }

    fn emoji(&self, emoji: &str) -> String {
        self.formatter.emoji(emoji, emoji_fallback(emoji))
    }

    fn risk_text(&self, category: RiskCategory) -> String {
        let (emoji, text) = match category {
            RiskCategory::Low => ("🟢", self.formatter.success(category.label())),
            RiskCategory::Moderate => ("🟡", self.formatter.warning(category.label())),
            RiskCategory::High => ("🔴", self.formatter.error(category.label())),
        };
        format!("{} {}", self.emoji(emoji), text)
    }

    fn write_heading(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.header(RULE))?;
        writeln!(self.writer, "  {}", self.formatter.header(title))?;
        writeln!(self.writer, "{}", self.formatter.header(RULE))?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_assessment(&mut self, assessment: &FatigueAssessment) -> anyhow::Result<()> {
        self.write_heading("DIGITAL FATIGUE ASSESSMENT")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Fatigue score: {} / 100  {}",
            self.formatter.bold(&format!("{:.1}", assessment.score)),
            self.bar(assessment.score / 100.0)
        )?;
        writeln!(
            self.writer,
            "Risk level:    {}",
            self.risk_text(assessment.risk_category)
        )?;

        if !assessment.adjusted_features.is_empty() {
            let names: Vec<&str> = assessment
                .adjusted_features
                .iter()
                .map(|f| f.column())
                .collect();
            writeln!(
                self.writer,
                "{} {}",
                self.emoji("⚠"),
                self.formatter
                    .warning(&format!("Clamped into trained range: {}", names.join(", ")))
            )?;
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.bold("Factor contributions"))?;
        let mut table = self.table();
        table.set_header(vec!["Factor", "Impact", ""]);
        for contribution in &assessment.contributions {
            table.add_row(vec![
                contribution.factor.label().to_string(),
                format!("{:.2}", contribution.relative_impact),
                self.bar(contribution.relative_impact),
            ]);
        }
        writeln!(self.writer, "{table}")?;

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.bold("Advice"))?;
        for advice in &assessment.advice {
            writeln!(
                self.writer,
                "  {} {}",
                self.emoji(advice.kind.emoji()),
                advice.message
            )?;
        }

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} {}",
            self.emoji("⚠"),
            self.formatter.dim(DISCLAIMER)
        )?;
        Ok(())
    }

    fn write_training_report(&mut self, report: &TrainingReport) -> anyhow::Result<()> {
        self.write_heading("TRAINING REPORT")?;
        let mut table = self.table();
        table.set_header(vec!["Metric", "Value"]);
        table.add_row(vec![
            "Dataset".to_string(),
            report.data_path.display().to_string(),
        ]);
        table.add_row(vec!["Rows used".to_string(), report.rows_used.to_string()]);
        table.add_row(vec![
            "Rows dropped".to_string(),
            report.dropped_rows.to_string(),
        ]);
        table.add_row(vec![
            "Train / test".to_string(),
            format!("{} / {}", report.training_rows, report.test_rows),
        ]);
        table.add_row(vec![
            "Validation MAE".to_string(),
            format!("{:.3}", report.validation_mae),
        ]);
        table.add_row(vec![
            "Raw label range".to_string(),
            format!("{:.2} .. {:.2}", report.label_scale.min, report.label_scale.max),
        ]);
        table.add_row(vec![
            "Trees / depth / leaf".to_string(),
            format!(
                "{} / {} / {}",
                report.params.n_estimators, report.params.max_depth, report.params.min_samples_leaf
            ),
        ]);
        table.add_row(vec!["Seed".to_string(), report.seed.to_string()]);
        table.add_row(vec![
            "Duration".to_string(),
            format!("{:.2}s", report.duration_secs),
        ]);
        writeln!(self.writer, "{table}")?;
        writeln!(
            self.writer,
            "{} Model saved to {}",
            self.emoji("✅"),
            self.formatter
                .success(&report.model_path.display().to_string())
        )?;
        Ok(())
    }

    fn write_artifact_summary(
        &mut self,
        path: &Path,
        metadata: &ArtifactMetadata,
    ) -> anyhow::Result<()> {
        self.write_heading("MODEL ARTIFACT")?;
        let mut table = self.table();
        table.set_header(vec!["Field", "Value"]);
        table.add_row(vec!["Path".to_string(), path.display().to_string()]);
        table.add_row(vec![
            "Trained".to_string(),
            metadata.trained_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ]);
        table.add_row(vec![
            "Train / test rows".to_string(),
            format!("{} / {}", metadata.training_rows, metadata.test_rows),
        ]);
        table.add_row(vec![
            "Validation MAE".to_string(),
            format!("{:.3}", metadata.validation_mae),
        ]);
        table.add_row(vec![
            "Trees".to_string(),
            metadata.params.n_estimators.to_string(),
        ]);
        table.add_row(vec!["Seed".to_string(), metadata.seed.to_string()]);
        writeln!(self.writer, "{table}")?;
        writeln!(
            self.writer,
            "{} Capability probe passed",
            self.emoji("✅")
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::assessment;

    fn render(score: f64) -> String {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, FormattingConfig::plain())
            .write_assessment(&assessment(score))
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_plain_assessment_uses_ascii_fallbacks() {
        let text = render(40.0);
        assert!(text.contains("Fatigue score: 40.0 / 100"));
        assert!(text.contains("[MODERATE] Moderate"));
        assert!(text.contains("[SCREEN] Reduce total screen time"));
        assert!(!text.contains('█'));
    }

    #[test]
    fn test_disclaimer_is_always_printed() {
        assert!(render(5.0).contains(DISCLAIMER));
        assert!(render(95.0).contains(DISCLAIMER));
    }
}
