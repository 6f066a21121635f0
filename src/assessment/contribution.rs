//! Model-independent factor attribution.
//!
//! Each factor's impact is its value divided by a plausible maximum, so the
//! same profile always explains the same way whichever model is loaded.

use crate::profile::UsageProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionFactor {
    ScreenTime,
    ContinuousUsage,
    NightUsage,
    LowSleep,
    EyeStrain,
    TaskSwitching,
}

impl ContributionFactor {
    pub const ALL: [ContributionFactor; 6] = [
        ContributionFactor::ScreenTime,
        ContributionFactor::ContinuousUsage,
        ContributionFactor::NightUsage,
        ContributionFactor::LowSleep,
        ContributionFactor::EyeStrain,
        ContributionFactor::TaskSwitching,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContributionFactor::ScreenTime => "Screen Time",
            ContributionFactor::ContinuousUsage => "Continuous Usage",
            ContributionFactor::NightUsage => "Night Usage",
            ContributionFactor::LowSleep => "Low Sleep",
            ContributionFactor::EyeStrain => "Eye Strain",
            ContributionFactor::TaskSwitching => "Task Switching",
        }
    }

    /// Raw heuristic ratio before clamping
    fn ratio(&self, profile: &UsageProfile) -> f64 {
        match self {
            ContributionFactor::ScreenTime => profile.screen_time_hours / 16.0,
            ContributionFactor::ContinuousUsage => profile.continuous_usage_minutes / 300.0,
            ContributionFactor::NightUsage => profile.night_usage_hours / 8.0,
            // Inverted: less sleep contributes more
            ContributionFactor::LowSleep => (10.0 - profile.sleep_hours) / 10.0,
            ContributionFactor::EyeStrain => profile.eye_strain_level / 5.0,
            ContributionFactor::TaskSwitching => profile.task_switching_rate / 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: ContributionFactor,
    /// Relative impact in `[0, 1]`
    pub relative_impact: f64,
}

/// Contributions sorted by descending impact; ties keep factor order.
///
/// Impacts are clamped to `[0, 1]`, which only matters for profiles that
/// were not clamped into their domains first.
pub fn compute(profile: &UsageProfile) -> Vec<FactorContribution> {
    let mut contributions: Vec<FactorContribution> = ContributionFactor::ALL
        .iter()
        .map(|factor| FactorContribution {
            factor: *factor,
            relative_impact: sanitize(factor.ratio(profile)),
        })
        .collect();

    contributions.sort_by(|a, b| b.relative_impact.total_cmp(&a.relative_impact));
    contributions
}

fn sanitize(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact_of(contributions: &[FactorContribution], factor: ContributionFactor) -> f64 {
        contributions
            .iter()
            .find(|c| c.factor == factor)
            .map(|c| c.relative_impact)
            .unwrap()
    }

    #[test]
    fn test_domain_extremes() {
        let profile = UsageProfile {
            screen_time_hours: 16.0,
            sleep_hours: 10.0,
            ..UsageProfile::default()
        };
        let contributions = compute(&profile);
        assert_eq!(impact_of(&contributions, ContributionFactor::ScreenTime), 1.0);
        assert_eq!(impact_of(&contributions, ContributionFactor::LowSleep), 0.0);
    }

    #[test]
    fn test_sorted_descending() {
        let contributions = compute(&UsageProfile::default());
        assert_eq!(contributions.len(), 6);
        assert!(contributions
            .windows(2)
            .all(|w| w[0].relative_impact >= w[1].relative_impact));
        // 3/5 eye strain is the largest ratio of the default profile
        assert_eq!(contributions[0].factor, ContributionFactor::EyeStrain);
    }

    #[test]
    fn test_out_of_domain_values_are_clamped() {
        let profile = UsageProfile {
            screen_time_hours: 30.0,
            sleep_hours: 12.0,
            night_usage_hours: f64::NAN,
            ..UsageProfile::default()
        };
        let contributions = compute(&profile);
        assert!(contributions
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.relative_impact)));
        assert_eq!(impact_of(&contributions, ContributionFactor::NightUsage), 0.0);
    }

    #[test]
    fn test_breaks_do_not_contribute() {
        let few = compute(&UsageProfile {
            breaks_per_day: 0.0,
            ..UsageProfile::default()
        });
        let many = compute(&UsageProfile {
            breaks_per_day: 15.0,
            ..UsageProfile::default()
        });
        assert_eq!(few, many);
    }
}
