//! Scoring one usage profile.
//!
//! [`assess`] is the single entry point every surface calls: it applies the
//! input policy, asks the predictor for a score, clamps it, buckets it and
//! attaches the explanation and advice.

pub mod advice;
pub mod contribution;
pub mod risk;

pub use advice::{Advice, AdviceKind, AdviceOrder, AdviceThresholds};
pub use contribution::{ContributionFactor, FactorContribution};
pub use risk::{RiskCategory, RiskThresholds};

use crate::errors::{FatigueError, Result};
use crate::model::FatiguePredictor;
use crate::profile::{Feature, UsageProfile};
use serde::{Deserialize, Serialize};

/// What to do with profile values outside their trained domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Fail with [`FatigueError::InvalidProfile`]
    Reject,
    /// Pull values to the nearest domain edge and log a warning
    #[default]
    Clamp,
}

impl InputPolicy {
    /// Returns the profile to score and the features that were adjusted
    pub fn apply(&self, profile: &UsageProfile) -> Result<(UsageProfile, Vec<Feature>)> {
        match self {
            InputPolicy::Reject => {
                profile.validate()?;
                Ok((*profile, Vec::new()))
            }
            InputPolicy::Clamp => {
                let adjusted = profile.out_of_domain();
                let clamped = profile.clamped();
                // NaN survives clamping
                clamped.validate()?;
                for feature in &adjusted {
                    tracing::warn!(
                        feature = feature.column(),
                        value = profile.get(*feature),
                        clamped = clamped.get(*feature),
                        "Input outside trained domain; clamped"
                    );
                }
                Ok((clamped, adjusted))
            }
        }
    }
}

/// Everything policy-driven about an assessment
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AssessmentPolicy {
    pub risk: RiskThresholds,
    pub advice: AdviceThresholds,
    pub advice_order: AdviceOrder,
    pub input: InputPolicy,
}

/// Result of scoring one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueAssessment {
    /// Profile as scored, after the input policy
    pub profile: UsageProfile,
    /// Features the input policy clamped
    pub adjusted_features: Vec<Feature>,
    /// Model output before clamping
    pub raw_score: f64,
    /// Score in `[0, 100]`
    pub score: f64,
    pub risk_category: RiskCategory,
    pub contributions: Vec<FactorContribution>,
    pub advice: Vec<Advice>,
}

/// Score, categorize and explain one profile
pub fn assess(
    profile: &UsageProfile,
    predictor: &dyn FatiguePredictor,
    policy: &AssessmentPolicy,
) -> Result<FatigueAssessment> {
    let (profile, adjusted_features) = policy.input.apply(profile)?;

    let raw_score = predictor.predict(&profile.to_features())?;
    if !raw_score.is_finite() {
        return Err(FatigueError::NonFinitePrediction(raw_score));
    }
    let score = raw_score.clamp(0.0, 100.0);
    let risk_category = policy.risk.classify(score);

    let contributions = contribution::compute(&profile);
    let advice = advice::generate(&profile, &policy.advice, policy.advice_order, &contributions);

    tracing::debug!(
        predictor = predictor.name(),
        raw_score,
        score,
        risk = %risk_category,
        advice = advice.len(),
        "Assessed profile"
    );

    Ok(FatigueAssessment {
        profile,
        adjusted_features,
        raw_score,
        score,
        risk_category,
        contributions,
        advice,
    })
}
