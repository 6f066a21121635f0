//! Regression models and the capability interface inference depends on.
//!
//! Assessment code only ever sees a [`FatiguePredictor`]. The concrete
//! ensemble lives in [`forest`]; anything that maps the seven-feature
//! vector to a scalar can stand in for it.

pub mod forest;
pub mod tree;

pub use forest::{ForestParams, RandomForest};
pub use tree::{RegressionTree, TreeParams};

use crate::errors::{FatigueError, Result};
use crate::profile::{Feature, FeatureVector};

/// Minimal prediction capability
pub trait FatiguePredictor: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// One prediction per input row, in input order
    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

impl<P: FatiguePredictor + ?Sized> FatiguePredictor for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        (**self).predict_batch(rows)
    }
}

/// Mean absolute error between paired slices.
///
/// Returns NaN for empty input.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

/// Require exactly `expected` predictions, all finite
pub fn check_predictions(predictor: &str, predictions: &[f64], expected: usize) -> Result<()> {
    if predictions.len() != expected {
        return Err(FatigueError::Prediction(format!(
            "{} returned {} predictions for {} rows",
            predictor,
            predictions.len(),
            expected
        )));
    }
    if let Some(bad) = predictions.iter().find(|p| !p.is_finite()) {
        return Err(FatigueError::NonFinitePrediction(*bad));
    }
    Ok(())
}

/// Vectors at the lower edge, centre and upper edge of every feature domain
pub fn probe_vectors() -> Vec<FeatureVector> {
    let at = |pick: fn(f64, f64) -> f64| -> FeatureVector {
        Feature::ALL.map(|feature| {
            let domain = feature.domain();
            pick(domain.min, domain.max)
        })
    };
    vec![
        at(|min, _| min),
        at(|min, max| (min + max) / 2.0),
        at(|_, max| max),
    ]
}

/// Check that a predictor actually predicts: one finite value per probe row.
///
/// Run after fitting and after every artifact load, so a broken model is
/// detected before any caller relies on it.
pub fn probe_predictor(predictor: &dyn FatiguePredictor) -> Result<()> {
    let probes = probe_vectors();
    let predictions = predictor.predict_batch(&probes)?;
    check_predictions(predictor.name(), &predictions, probes.len())?;

    tracing::debug!(predictor = predictor.name(), ?predictions, "Capability probe passed");
    Ok(())
}
