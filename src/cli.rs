use crate::output::OutputFormat;
use crate::profile::Feature;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fatiguemap")]
#[command(about = "Digital fatigue scoring from screen-usage behaviour", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (skips .fatiguemap.toml discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Plain ASCII output: no colour, no emoji
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the fatigue model and publish the artifact
    Train {
        /// Training dataset (CSV)
        #[arg(long, env = "FATIGUEMAP_DATA")]
        data: Option<PathBuf>,

        /// Where to publish the model artifact
        #[arg(long, env = "FATIGUEMAP_MODEL")]
        model: Option<PathBuf>,

        /// Seed for splitting and bootstrapping
        #[arg(long)]
        seed: Option<u64>,

        /// Number of trees
        #[arg(long)]
        trees: Option<usize>,

        #[arg(long)]
        max_depth: Option<usize>,

        #[arg(long)]
        min_samples_leaf: Option<usize>,

        /// Held-out share of rows, in (0, 1)
        #[arg(long)]
        test_fraction: Option<f64>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Write a synthetic training dataset
    Generate {
        #[arg(long, default_value = "1000")]
        rows: usize,

        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output CSV (defaults to the configured data path)
        #[arg(short, long, env = "FATIGUEMAP_DATA")]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Score one usage profile
    Assess {
        #[command(flatten)]
        inputs: ProfileArgs,

        /// Read the whole profile from a JSON file instead of flags
        #[arg(long, conflicts_with_all = PROFILE_FLAGS)]
        profile: Option<PathBuf>,

        #[arg(long, env = "FATIGUEMAP_MODEL")]
        model: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Interactive terminal dashboard
    Dashboard {
        #[arg(long, env = "FATIGUEMAP_MODEL")]
        model: Option<PathBuf>,
    },

    /// Load a model artifact, probe it and print its metadata
    Inspect {
        #[arg(long, env = "FATIGUEMAP_MODEL")]
        model: Option<PathBuf>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Write a default .fatiguemap.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

const PROFILE_FLAGS: [&str; 7] = [
    "screen_time",
    "continuous_usage",
    "night_usage",
    "breaks",
    "sleep",
    "eye_strain",
    "task_switching",
];

/// Per-feature flags. Unset flags take the default profile's value.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Daily screen time in hours [1, 16]
    #[arg(long, value_parser = in_domain(Feature::ScreenTimeHours))]
    pub screen_time: Option<f64>,

    /// Longest continuous session in minutes [10, 300]
    #[arg(long, value_parser = in_domain(Feature::ContinuousUsageMinutes))]
    pub continuous_usage: Option<f64>,

    /// Screen use after dark in hours [0, 8]
    #[arg(long, value_parser = in_domain(Feature::NightUsageHours))]
    pub night_usage: Option<f64>,

    /// Breaks per day [0, 15]
    #[arg(long, value_parser = in_domain(Feature::BreaksPerDay))]
    pub breaks: Option<f64>,

    /// Sleep per night in hours [3, 10]
    #[arg(long, value_parser = in_domain(Feature::SleepHours))]
    pub sleep: Option<f64>,

    /// Self-reported eye strain [1, 5]
    #[arg(long, value_parser = in_domain(Feature::EyeStrainLevel))]
    pub eye_strain: Option<f64>,

    /// Task switches per hour [1, 50]
    #[arg(long, value_parser = in_domain(Feature::TaskSwitchingRate))]
    pub task_switching: Option<f64>,
}

impl ProfileArgs {
    pub fn values(&self) -> [(Feature, Option<f64>); 7] {
        [
            (Feature::ScreenTimeHours, self.screen_time),
            (Feature::ContinuousUsageMinutes, self.continuous_usage),
            (Feature::NightUsageHours, self.night_usage),
            (Feature::BreaksPerDay, self.breaks),
            (Feature::SleepHours, self.sleep),
            (Feature::EyeStrainLevel, self.eye_strain),
            (Feature::TaskSwitchingRate, self.task_switching),
        ]
    }
}

/// Value parser accepting only numbers inside the feature's domain
fn in_domain(
    feature: Feature,
) -> impl Fn(&str) -> Result<f64, String> + Clone + Send + Sync + 'static {
    move |raw: &str| {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("`{}` is not a number", raw))?;
        let domain = feature.domain();
        if domain.contains(value) {
            Ok(value)
        } else {
            Err(format!("{} must be {}", feature.column(), domain.describe()))
        }
    }
}
