//! Risk buckets over the clamped fatigue score.
//!
//! The thresholds are a business rule of their own. They are unrelated to
//! the min/max used when labels were normalized during training.

use crate::errors::{FatigueError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
}

impl RiskCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::High => "High",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds (inclusive) of the Moderate and High buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    #[serde(default = "default_moderate")]
    pub moderate: f64,

    #[serde(default = "default_high")]
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate: default_moderate(),
            high: default_high(),
        }
    }
}

fn default_moderate() -> f64 {
    35.0
}
fn default_high() -> f64 {
    65.0
}

impl RiskThresholds {
    /// Require `0 <= moderate < high <= 100`
    pub fn validate(&self) -> Result<()> {
        let ordered = self.moderate >= 0.0 && self.moderate < self.high && self.high <= 100.0;
        if ordered {
            Ok(())
        } else {
            Err(FatigueError::configuration(format!(
                "risk thresholds must satisfy 0 <= moderate < high <= 100 (moderate = {}, high = {})",
                self.moderate, self.high
            )))
        }
    }

    /// `score < moderate` is Low, `moderate <= score < high` is Moderate,
    /// anything else is High.
    pub fn classify(&self, score: f64) -> RiskCategory {
        if score >= self.high {
            RiskCategory::High
        } else if score >= self.moderate {
            RiskCategory::Moderate
        } else {
            RiskCategory::Low
        }
    }
}
