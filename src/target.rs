//! Label engineering.
//!
//! No sensor observes "actual fatigue", so training manufactures a proxy
//! label: a fixed linear combination of the seven features, min-max scaled
//! over the training dataset to `[0, 100]`.

use crate::errors::{FatigueError, Result};
use crate::profile::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// Domain-prior weights in feature column order.
///
/// Screen time, continuous use, night use, eye strain and task switching
/// raise fatigue; breaks and sleep lower it.
pub const LABEL_WEIGHTS: [f64; FEATURE_COUNT] = [6.0, 0.08, 8.0, -4.0, -7.0, 10.0, 1.5];

/// Unscaled fatigue score of one row
pub fn raw_score(features: &FeatureVector) -> f64 {
    features
        .iter()
        .zip(LABEL_WEIGHTS.iter())
        .map(|(value, weight)| value * weight)
        .sum()
}

/// Dataset-specific min/max of the raw score, baked in at training time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelScale {
    pub min: f64,
    pub max: f64,
}

impl LabelScale {
    /// Scale over a set of raw scores.
    ///
    /// Fails when the range is empty or zero-width, since scaling would
    /// then divide by zero.
    pub fn fit(raw: &[f64]) -> Result<Self> {
        let (min, max) = raw
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if raw.is_empty() {
            return Err(FatigueError::EmptyDataset { dropped: 0 });
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(FatigueError::configuration(
                "raw fatigue scores contain non-finite values",
            ));
        }
        if max - min <= 0.0 {
            return Err(FatigueError::DegenerateLabelRange { value: min });
        }

        Ok(Self { min, max })
    }

    /// Map a raw score onto the 0-100 label scale.
    ///
    /// Only rows of the fitted dataset are guaranteed to land in range.
    pub fn normalize(&self, raw: f64) -> f64 {
        (raw - self.min) / (self.max - self.min) * 100.0
    }
}

/// Training labels together with the scale that produced them
#[derive(Debug, Clone)]
pub struct EngineeredLabels {
    pub labels: Vec<f64>,
    pub scale: LabelScale,
}

/// Compute normalized labels for every row
pub fn engineer_labels(rows: &[FeatureVector]) -> Result<EngineeredLabels> {
    let raw: Vec<f64> = rows.iter().map(raw_score).collect();
    let scale = LabelScale::fit(&raw)?;
    let labels = raw.iter().map(|&r| scale.normalize(r)).collect();

    tracing::debug!(
        rows = rows.len(),
        raw_min = scale.min,
        raw_max = scale.max,
        "Engineered fatigue labels"
    );

    Ok(EngineeredLabels { labels, scale })
}
