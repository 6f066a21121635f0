//! Threshold rules mapping raw inputs to recommendations.
//!
//! Rules read the profile only. Two profiles that trip the same rules get
//! the same advice whatever their scores are.

use super::contribution::{ContributionFactor, FactorContribution};
use crate::profile::UsageProfile;
use serde::{Deserialize, Serialize};

/// Trigger points for each rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdviceThresholds {
    /// Advise when screen time exceeds this many hours
    #[serde(default = "default_screen_time_hours")]
    pub screen_time_hours: f64,

    #[serde(default = "default_night_usage_hours")]
    pub night_usage_hours: f64,

    /// Advise when sleep falls below this many hours
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,

    #[serde(default = "default_continuous_usage_minutes")]
    pub continuous_usage_minutes: f64,

    /// Advise at or above this eye strain level
    #[serde(default = "default_eye_strain_level")]
    pub eye_strain_level: f64,

    #[serde(default = "default_task_switching_rate")]
    pub task_switching_rate: f64,
}

impl Default for AdviceThresholds {
    fn default() -> Self {
        Self {
            screen_time_hours: default_screen_time_hours(),
            night_usage_hours: default_night_usage_hours(),
            sleep_hours: default_sleep_hours(),
            continuous_usage_minutes: default_continuous_usage_minutes(),
            eye_strain_level: default_eye_strain_level(),
            task_switching_rate: default_task_switching_rate(),
        }
    }
}

fn default_screen_time_hours() -> f64 {
    8.0
}
fn default_night_usage_hours() -> f64 {
    2.0
}
fn default_sleep_hours() -> f64 {
    6.0
}
fn default_continuous_usage_minutes() -> f64 {
    120.0
}
fn default_eye_strain_level() -> f64 {
    4.0
}
fn default_task_switching_rate() -> f64 {
    30.0
}

/// How triggered advice is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceOrder {
    /// Rule table order
    #[default]
    Table,
    /// Strongest contributing factor first
    Contribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    ReduceScreenTime,
    AvoidNightUsage,
    IncreaseSleep,
    TakeBreaks,
    EyeRelaxation,
    ReduceTaskSwitching,
    /// Nothing triggered
    Balanced,
}

impl AdviceKind {
    /// Rules in table order
    pub const RULES: [AdviceKind; 6] = [
        AdviceKind::ReduceScreenTime,
        AdviceKind::AvoidNightUsage,
        AdviceKind::IncreaseSleep,
        AdviceKind::TakeBreaks,
        AdviceKind::EyeRelaxation,
        AdviceKind::ReduceTaskSwitching,
    ];

    /// Recommendation text; quoted limits come from `thresholds`
    pub fn message(&self, thresholds: &AdviceThresholds) -> String {
        match self {
            AdviceKind::ReduceScreenTime => format!(
                "Reduce total screen time to under {} hours/day.",
                thresholds.screen_time_hours
            ),
            AdviceKind::AvoidNightUsage => {
                "Avoid screen usage at least 1 hour before sleep.".to_string()
            }
            AdviceKind::IncreaseSleep => "Increase sleep duration to improve recovery.".to_string(),
            AdviceKind::TakeBreaks => "Take short breaks every 60 minutes.".to_string(),
            AdviceKind::EyeRelaxation => "Use the 20-20-20 eye relaxation rule.".to_string(),
            AdviceKind::ReduceTaskSwitching => {
                "Reduce frequent task switching to lower mental load.".to_string()
            }
            AdviceKind::Balanced => {
                "Your digital habits are well balanced. Keep it up!".to_string()
            }
        }
    }

    /// Emoji prefix for terminals that render it
    pub fn emoji(&self) -> &'static str {
        match self {
            AdviceKind::ReduceScreenTime => "📱",
            AdviceKind::AvoidNightUsage => "🌙",
            AdviceKind::IncreaseSleep => "😴",
            AdviceKind::TakeBreaks => "⏱",
            AdviceKind::EyeRelaxation => "👁",
            AdviceKind::ReduceTaskSwitching => "🔁",
            AdviceKind::Balanced => "✅",
        }
    }

    /// Contribution factor this rule addresses
    pub fn factor(&self) -> Option<ContributionFactor> {
        match self {
            AdviceKind::ReduceScreenTime => Some(ContributionFactor::ScreenTime),
            AdviceKind::AvoidNightUsage => Some(ContributionFactor::NightUsage),
            AdviceKind::IncreaseSleep => Some(ContributionFactor::LowSleep),
            AdviceKind::TakeBreaks => Some(ContributionFactor::ContinuousUsage),
            AdviceKind::EyeRelaxation => Some(ContributionFactor::EyeStrain),
            AdviceKind::ReduceTaskSwitching => Some(ContributionFactor::TaskSwitching),
            AdviceKind::Balanced => None,
        }
    }

    fn triggered(&self, profile: &UsageProfile, thresholds: &AdviceThresholds) -> bool {
        match self {
            AdviceKind::ReduceScreenTime => profile.screen_time_hours > thresholds.screen_time_hours,
            AdviceKind::AvoidNightUsage => profile.night_usage_hours > thresholds.night_usage_hours,
            AdviceKind::IncreaseSleep => profile.sleep_hours < thresholds.sleep_hours,
            AdviceKind::TakeBreaks => {
                profile.continuous_usage_minutes > thresholds.continuous_usage_minutes
            }
            AdviceKind::EyeRelaxation => profile.eye_strain_level >= thresholds.eye_strain_level,
            AdviceKind::ReduceTaskSwitching => {
                profile.task_switching_rate > thresholds.task_switching_rate
            }
            AdviceKind::Balanced => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub kind: AdviceKind,
    pub message: String,
}

impl Advice {
    pub fn new(kind: AdviceKind, thresholds: &AdviceThresholds) -> Self {
        Self {
            kind,
            message: kind.message(thresholds),
        }
    }
}

/// Evaluate every rule; a single `Balanced` item when none fires.
///
/// With [`AdviceOrder::Contribution`], items follow the order of
/// `contributions` (expected sorted by descending impact); table order
/// breaks ties.
pub fn generate(
    profile: &UsageProfile,
    thresholds: &AdviceThresholds,
    order: AdviceOrder,
    contributions: &[FactorContribution],
) -> Vec<Advice> {
    let mut triggered: Vec<AdviceKind> = AdviceKind::RULES
        .into_iter()
        .filter(|kind| kind.triggered(profile, thresholds))
        .collect();

    if triggered.is_empty() {
        return vec![Advice::new(AdviceKind::Balanced, thresholds)];
    }

    if order == AdviceOrder::Contribution {
        let rank = |kind: &AdviceKind| {
            kind.factor()
                .and_then(|factor| contributions.iter().position(|c| c.factor == factor))
                .unwrap_or(usize::MAX)
        };
        triggered.sort_by_key(rank);
    }

    triggered
        .into_iter()
        .map(|kind| Advice::new(kind, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::contribution;

    fn kinds(advice: &[Advice]) -> Vec<AdviceKind> {
        advice.iter().map(|a| a.kind).collect()
    }

    fn table(profile: &UsageProfile) -> Vec<AdviceKind> {
        kinds(&generate(
            profile,
            &AdviceThresholds::default(),
            AdviceOrder::Table,
            &[],
        ))
    }

    #[test]
    fn test_only_screen_time_triggers() {
        let profile = UsageProfile {
            screen_time_hours: 9.0,
            night_usage_hours: 1.0,
            sleep_hours: 7.0,
            continuous_usage_minutes: 60.0,
            eye_strain_level: 2.0,
            task_switching_rate: 10.0,
            ..UsageProfile::default()
        };
        assert_eq!(table(&profile), vec![AdviceKind::ReduceScreenTime]);
    }

    #[test]
    fn test_balanced_when_nothing_triggers() {
        let profile = UsageProfile {
            screen_time_hours: 4.0,
            night_usage_hours: 0.5,
            sleep_hours: 8.0,
            continuous_usage_minutes: 30.0,
            eye_strain_level: 1.0,
            task_switching_rate: 5.0,
            ..UsageProfile::default()
        };
        let advice = generate(
            &profile,
            &AdviceThresholds::default(),
            AdviceOrder::Table,
            &[],
        );
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].kind, AdviceKind::Balanced);
        assert_eq!(
            advice[0].message,
            "Your digital habits are well balanced. Keep it up!"
        );
    }

    #[test]
    fn test_screen_time_message_quotes_configured_threshold() {
        let profile = UsageProfile {
            screen_time_hours: 7.0,
            night_usage_hours: 1.0,
            sleep_hours: 7.0,
            continuous_usage_minutes: 60.0,
            eye_strain_level: 2.0,
            task_switching_rate: 10.0,
            ..UsageProfile::default()
        };
        let thresholds = AdviceThresholds {
            screen_time_hours: 6.5,
            ..AdviceThresholds::default()
        };
        let advice = generate(&profile, &thresholds, AdviceOrder::Table, &[]);
        assert_eq!(kinds(&advice), vec![AdviceKind::ReduceScreenTime]);
        assert_eq!(
            advice[0].message,
            "Reduce total screen time to under 6.5 hours/day."
        );

        let default_message = AdviceKind::ReduceScreenTime.message(&AdviceThresholds::default());
        assert_eq!(default_message, "Reduce total screen time to under 8 hours/day.");
    }

    #[test]
    fn test_threshold_comparisons() {
        // Exactly at a ">" threshold does not trigger; eye strain uses ">="
        let at_thresholds = UsageProfile {
            screen_time_hours: 8.0,
            night_usage_hours: 2.0,
            sleep_hours: 6.0,
            continuous_usage_minutes: 120.0,
            eye_strain_level: 4.0,
            task_switching_rate: 30.0,
            ..UsageProfile::default()
        };
        assert_eq!(table(&at_thresholds), vec![AdviceKind::EyeRelaxation]);
    }

    #[test]
    fn test_every_rule_in_table_order() {
        let profile = UsageProfile {
            screen_time_hours: 12.0,
            night_usage_hours: 4.0,
            sleep_hours: 4.0,
            continuous_usage_minutes: 200.0,
            eye_strain_level: 5.0,
            task_switching_rate: 40.0,
            ..UsageProfile::default()
        };
        assert_eq!(table(&profile), AdviceKind::RULES.to_vec());
    }

    #[test]
    fn test_contribution_order_follows_impacts() {
        let profile = UsageProfile {
            screen_time_hours: 9.0,
            night_usage_hours: 7.5,
            sleep_hours: 7.0,
            continuous_usage_minutes: 60.0,
            eye_strain_level: 4.0,
            task_switching_rate: 10.0,
            ..UsageProfile::default()
        };
        // Impacts: night 0.94, eye strain 0.8, screen 0.56
        let contributions = contribution::compute(&profile);
        let advice = generate(
            &profile,
            &AdviceThresholds::default(),
            AdviceOrder::Contribution,
            &contributions,
        );
        assert_eq!(
            kinds(&advice),
            vec![
                AdviceKind::AvoidNightUsage,
                AdviceKind::EyeRelaxation,
                AdviceKind::ReduceScreenTime,
            ]
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = AdviceThresholds {
            screen_time_hours: 4.0,
            ..AdviceThresholds::default()
        };
        let profile = UsageProfile {
            screen_time_hours: 5.0,
            night_usage_hours: 0.0,
            sleep_hours: 8.0,
            continuous_usage_minutes: 30.0,
            eye_strain_level: 1.0,
            task_switching_rate: 5.0,
            ..UsageProfile::default()
        };
        let advice = generate(&profile, &strict, AdviceOrder::Table, &[]);
        assert_eq!(kinds(&advice), vec![AdviceKind::ReduceScreenTime]);
    }
}
