use crate::config::TrainingConfig;
use crate::formatting::FormattingConfig;
use crate::output::{create_writer, OutputFormat};
use crate::training::{train_with_progress, TrainingReport};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Command-line overrides applied on top of the `[training]` section
#[derive(Debug, Clone, Default)]
pub struct TrainOverrides {
    pub data: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub seed: Option<u64>,
    pub trees: Option<usize>,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: Option<usize>,
    pub test_fraction: Option<f64>,
}

impl TrainOverrides {
    pub fn apply(self, mut config: TrainingConfig) -> TrainingConfig {
        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(trees) = self.trees {
            config.n_estimators = trees;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(leaf) = self.min_samples_leaf {
            config.min_samples_leaf = leaf;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        config
    }
}

fn progress_bar(total: usize, formatting: FormattingConfig) -> ProgressBar {
    if formatting.is_plain() || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template("{spinner} fitting trees [{bar:30}] {pos}/{len} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

pub fn run_training(
    config: &TrainingConfig,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> Result<TrainingReport> {
    let bar = progress_bar(config.n_estimators, formatting);
    let report = train_with_progress(config, || bar.inc(1));
    bar.finish_and_clear();

    let report = report.with_context(|| {
        format!(
            "Training failed (data: {}, model: {})",
            config.data_path.display(),
            config.model_path.display()
        )
    })?;

    let stdout = std::io::stdout();
    let mut writer = create_writer(format, stdout.lock(), formatting);
    writer.write_training_report(&report)?;
    Ok(report)
}
