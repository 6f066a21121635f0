// Export modules for library usage
pub mod artifact;
pub mod assessment;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod formatting;
pub mod model;
pub mod observability;
pub mod output;
pub mod profile;
pub mod target;
pub mod training;
pub mod tui;

// Re-export commonly used types
pub use crate::artifact::{ArtifactMetadata, ArtifactStore, ModelArtifact, StagedArtifact};
pub use crate::assessment::{
    assess, Advice, AdviceOrder, AdviceThresholds, AssessmentPolicy, ContributionFactor,
    FactorContribution, FatigueAssessment, InputPolicy, RiskCategory, RiskThresholds,
};
pub use crate::config::{FatiguemapConfig, TrainingConfig};
pub use crate::dataset::{generate_synthetic, Dataset};
pub use crate::errors::{ErrorCategory, FatigueError, Result};
pub use crate::model::{probe_predictor, FatiguePredictor, ForestParams, RandomForest};
pub use crate::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::profile::{Feature, FeatureVector, UsageProfile, FEATURE_COUNT};
pub use crate::target::{engineer_labels, LabelScale};
pub use crate::training::{train, train_with_progress, TrainingReport};
