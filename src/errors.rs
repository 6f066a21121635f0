//! Shared error types for fatiguemap.
//!
//! Errors are grouped into categories that decide how a caller reacts:
//!
//! - **Configuration**: dataset missing, required columns missing, degenerate
//!   label range, invalid policy values. Fatal for training; the artifact
//!   path is never touched.
//! - **Artifact**: model file missing, truncated, corrupted, or failing its
//!   capability probe. Interactive surfaces disable prediction and keep
//!   running.
//! - **Inference**: a single prediction failed or returned a non-finite
//!   value. Reported per call; later calls may succeed.
//! - **Input**: a usage profile outside its declared domain under the
//!   `reject` input policy.
//! - **Io**: everything else the filesystem or encoders report.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fatiguemap operations
#[derive(Debug, Error)]
pub enum FatigueError {
    /// The training dataset does not exist
    #[error("Dataset not found at {}", path.display())]
    DatasetNotFound { path: PathBuf },

    /// The dataset header lacks one or more required feature columns
    #[error("Dataset is missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// No usable rows remained after dropping incomplete ones
    #[error("Dataset has no usable rows ({dropped} dropped for missing values)")]
    EmptyDataset { dropped: usize },

    /// Every row produced the same raw score, so min-max scaling is undefined
    #[error("Degenerate label range: every row produced raw score {value}")]
    DegenerateLabelRange { value: f64 },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model artifact missing, corrupted, or failing its capability probe
    #[error("Model unavailable at {}: {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    /// The predictor raised while evaluating a feature vector
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// The predictor returned NaN or infinity
    #[error("Prediction produced a non-finite value ({0})")]
    NonFinitePrediction(f64),

    /// Profile field outside its declared domain
    #[error("Invalid usage profile: {}", violations.join("; "))]
    InvalidProfile { violations: Vec<String> },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification that drives propagation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Inference,
    Input,
    Io,
}

impl FatigueError {
    /// Create an artifact error for the given path
    pub fn model_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DatasetNotFound { .. }
            | Self::MissingColumns { .. }
            | Self::EmptyDataset { .. }
            | Self::DegenerateLabelRange { .. }
            | Self::Configuration(_)
            | Self::Csv(_)
            | Self::Toml(_) => ErrorCategory::Configuration,
            Self::ModelUnavailable { .. } => ErrorCategory::Artifact,
            Self::Prediction(_) | Self::NonFinitePrediction(_) => ErrorCategory::Inference,
            Self::InvalidProfile { .. } => ErrorCategory::Input,
            Self::Io(_) | Self::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the application can stay usable after this error.
    ///
    /// Configuration and IO failures are deterministic failures of static
    /// inputs and are never retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Artifact | ErrorCategory::Inference | ErrorCategory::Input
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, FatigueError>;
