//! `.fatiguemap.toml` configuration.
//!
//! Every section is optional; accessors fall back to built-in defaults.
//! Precedence is CLI flag, then file, then default. Flags are applied by
//! the command handlers on top of what these accessors return.

mod loader;
mod training;

pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use training::{TrainingConfig, DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH};

use crate::assessment::{
    AdviceOrder, AdviceThresholds, AssessmentPolicy, InputPolicy, RiskThresholds,
};
use crate::errors::{FatigueError, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FatiguemapConfig {
    #[serde(default)]
    pub training: Option<TrainingConfig>,

    /// Risk category thresholds
    #[serde(default)]
    pub risk: Option<RiskThresholds>,

    #[serde(default)]
    pub advice: Option<AdviceConfig>,

    /// Handling of out-of-domain inputs
    #[serde(default)]
    pub input: Option<InputConfig>,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

/// `[advice]` section: rule thresholds plus ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceConfig {
    #[serde(flatten)]
    pub thresholds: AdviceThresholds,

    #[serde(default)]
    pub order: AdviceOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub out_of_range: InputPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: Option<OutputFormat>,

    /// Force colour on or off; unset means detect
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl FatiguemapConfig {
    pub fn training_config(&self) -> TrainingConfig {
        self.training.clone().unwrap_or_default()
    }

    pub fn risk_thresholds(&self) -> RiskThresholds {
        self.risk.unwrap_or_default()
    }

    pub fn advice_thresholds(&self) -> AdviceThresholds {
        self.advice.map(|a| a.thresholds).unwrap_or_default()
    }

    pub fn advice_order(&self) -> AdviceOrder {
        self.advice.map(|a| a.order).unwrap_or_default()
    }

    pub fn input_policy(&self) -> InputPolicy {
        self.input.map(|i| i.out_of_range).unwrap_or_default()
    }

    pub fn assessment_policy(&self) -> AssessmentPolicy {
        AssessmentPolicy {
            risk: self.risk_thresholds(),
            advice: self.advice_thresholds(),
            advice_order: self.advice_order(),
            input: self.input_policy(),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.default_format)
            .unwrap_or_default()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.use_color)
    }

    /// Semantic checks that TOML parsing cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(training) = &self.training {
            training.validate()?;
        }
        if let Some(risk) = &self.risk {
            risk.validate()?;
        }
        if let Some(advice) = &self.advice {
            let t = advice.thresholds;
            let values = [
                t.screen_time_hours,
                t.night_usage_hours,
                t.sleep_hours,
                t.continuous_usage_minutes,
                t.eye_strain_level,
                t.task_switching_rate,
            ];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(FatigueError::configuration(
                    "advice thresholds must be finite numbers",
                ));
            }
        }
        Ok(())
    }
}

/// Commented template written by `fatiguemap init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# fatiguemap configuration

[training]
data_path = "data/digital_fatigue.csv"
model_path = "model/fatigue_model.bin"
seed = 42
test_fraction = 0.2
n_estimators = 300
max_depth = 12
min_samples_leaf = 3

# Score buckets: Low < moderate <= Moderate < high <= High
[risk]
moderate = 35.0
high = 65.0

[advice]
screen_time_hours = 8.0
night_usage_hours = 2.0
sleep_hours = 6.0
continuous_usage_minutes = 120.0
eye_strain_level = 4.0
task_switching_rate = 30.0
# "table" or "contribution"
order = "table"

[input]
# "clamp" or "reject"
out_of_range = "clamp"

[output]
default_format = "terminal"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_yields_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config.assessment_policy(), AssessmentPolicy::default());
        assert_eq!(config.training_config(), TrainingConfig::default());
        assert_eq!(config.output_format(), OutputFormat::Terminal);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_and_validate_config(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.assessment_policy(), AssessmentPolicy::default());
        assert_eq!(config.training_config(), TrainingConfig::default());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [advice]
            screen_time_hours = 6
            order = "contribution"

            [input]
            out_of_range = "reject"

            [output]
            default_format = "json"
        "#})
        .unwrap();

        assert_eq!(config.advice_thresholds().screen_time_hours, 6.0);
        assert_eq!(config.advice_thresholds().sleep_hours, 6.0);
        assert_eq!(config.advice_order(), AdviceOrder::Contribution);
        assert_eq!(config.input_policy(), InputPolicy::Reject);
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_inverted_risk_thresholds_are_rejected() {
        let err = parse_and_validate_config("[risk]\nmoderate = 70\nhigh = 30\n").unwrap_err();
        assert!(matches!(err, FatigueError::Configuration(_)));
    }

    #[test]
    fn test_unknown_policy_value_is_a_parse_error() {
        let err = parse_and_validate_config("[input]\nout_of_range = \"ignore\"\n").unwrap_err();
        assert!(matches!(err, FatigueError::Toml(_)));
    }
}
