use crate::errors::{FatigueError, Result};
use crate::model::ForestParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/digital_fatigue.csv";
pub const DEFAULT_MODEL_PATH: &str = "model/fatigue_model.bin";

/// `[training]` section: paths, split and fixed hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Held-out share of the dataset, in (0, 1)
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,

    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,

    /// Features tried per split; all seven when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_features: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            model_path: default_model_path(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            n_estimators: default_n_estimators(),
            max_depth: default_max_depth(),
            min_samples_leaf: default_min_samples_leaf(),
            max_features: None,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}
fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}
fn default_seed() -> u64 {
    42
}
fn default_test_fraction() -> f64 {
    0.2
}
fn default_n_estimators() -> usize {
    ForestParams::default().n_estimators
}
fn default_max_depth() -> usize {
    ForestParams::default().max_depth
}
fn default_min_samples_leaf() -> usize {
    ForestParams::default().min_samples_leaf
}

impl TrainingConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(FatigueError::configuration(format!(
                "test_fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        self.forest_params().validate()
    }
}
