//! Report writers for assessments, training runs and artifact metadata.

mod json;
mod markdown;
mod terminal;

pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

use crate::artifact::ArtifactMetadata;
use crate::assessment::FatigueAssessment;
use crate::formatting::FormattingConfig;
use crate::training::TrainingReport;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Printed under every assessment
pub const DISCLAIMER: &str = "This system is a decision-support tool, not a medical diagnostic \
system. Predictions are based on behavioral usage analytics.";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_assessment(&mut self, assessment: &FatigueAssessment) -> anyhow::Result<()>;

    fn write_training_report(&mut self, report: &TrainingReport) -> anyhow::Result<()>;

    fn write_artifact_summary(
        &mut self,
        path: &Path,
        metadata: &ArtifactMetadata,
    ) -> anyhow::Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
    }
}

/// Horizontal bar for a value in `[0, 1]`
pub(crate) fn bar(fraction: f64, width: usize, fill: char, empty: char) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut out = String::with_capacity(width * fill.len_utf8());
    out.extend(std::iter::repeat_n(fill, filled));
    out.extend(std::iter::repeat_n(empty, width - filled));
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_widths() {
        assert_eq!(bar(0.0, 4, '#', '.'), "....");
        assert_eq!(bar(0.5, 4, '#', '.'), "##..");
        assert_eq!(bar(1.0, 4, '#', '.'), "####");
        assert_eq!(bar(3.0, 4, '#', '.'), "####");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::Markdown).unwrap(),
            "\"markdown\""
        );
        assert_eq!(OutputFormat::default(), OutputFormat::Terminal);
    }
}
