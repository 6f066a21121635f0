//! Usage profiles and the seven-feature vector the model consumes.
//!
//! Column order is fixed: every dataset row, every training example and
//! every inference call uses the order of [`Feature::ALL`].

use crate::errors::{FatigueError, Result};
use serde::{Deserialize, Serialize};

/// Number of model input features
pub const FEATURE_COUNT: usize = 7;

/// Ordered model input
pub type FeatureVector = [f64; FEATURE_COUNT];

/// One model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ScreenTimeHours,
    ContinuousUsageMinutes,
    NightUsageHours,
    BreaksPerDay,
    SleepHours,
    EyeStrainLevel,
    TaskSwitchingRate,
}

/// Closed numeric interval a feature was trained on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDomain {
    pub min: f64,
    pub max: f64,
    /// Slider increment used by interactive surfaces
    pub step: f64,
    /// Only whole numbers are valid
    pub ordinal: bool,
}

impl FeatureDomain {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            ordinal: false,
        }
    }

    const fn ordinal(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: 1.0,
            ordinal: true,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max && (!self.ordinal || value.fract() == 0.0)
    }

    /// Nearest valid value; ordinal domains round to the nearest level
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if self.ordinal { value.round() } else { value };
        value.clamp(self.min, self.max)
    }

    /// Human-readable description of the valid values
    pub fn describe(&self) -> String {
        if self.ordinal {
            format!("a whole number within [{}, {}]", self.min, self.max)
        } else {
            format!("within [{}, {}]", self.min, self.max)
        }
    }
}

impl Feature {
    /// All features in model column order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::ScreenTimeHours,
        Feature::ContinuousUsageMinutes,
        Feature::NightUsageHours,
        Feature::BreaksPerDay,
        Feature::SleepHours,
        Feature::EyeStrainLevel,
        Feature::TaskSwitchingRate,
    ];

    /// Dataset column name
    pub fn column(&self) -> &'static str {
        match self {
            Feature::ScreenTimeHours => "screen_time_hours",
            Feature::ContinuousUsageMinutes => "continuous_usage_minutes",
            Feature::NightUsageHours => "night_usage_hours",
            Feature::BreaksPerDay => "breaks_per_day",
            Feature::SleepHours => "sleep_hours",
            Feature::EyeStrainLevel => "eye_strain_level",
            Feature::TaskSwitchingRate => "task_switching_rate",
        }
    }

    /// Human-readable label with unit
    pub fn label(&self) -> &'static str {
        match self {
            Feature::ScreenTimeHours => "Screen Time (hrs/day)",
            Feature::ContinuousUsageMinutes => "Continuous Usage (mins)",
            Feature::NightUsageHours => "Night Usage (hrs)",
            Feature::BreaksPerDay => "Breaks per Day",
            Feature::SleepHours => "Sleep Duration (hrs)",
            Feature::EyeStrainLevel => "Eye Strain Level",
            Feature::TaskSwitchingRate => "Task Switching Rate (per hour)",
        }
    }

    pub fn domain(&self) -> FeatureDomain {
        match self {
            Feature::ScreenTimeHours => FeatureDomain::new(1.0, 16.0, 0.5),
            Feature::ContinuousUsageMinutes => FeatureDomain::new(10.0, 300.0, 10.0),
            Feature::NightUsageHours => FeatureDomain::new(0.0, 8.0, 0.5),
            Feature::BreaksPerDay => FeatureDomain::new(0.0, 15.0, 1.0),
            Feature::SleepHours => FeatureDomain::new(3.0, 10.0, 0.5),
            Feature::EyeStrainLevel => FeatureDomain::ordinal(1.0, 5.0),
            Feature::TaskSwitchingRate => FeatureDomain::new(1.0, 50.0, 1.0),
        }
    }

    /// Position of this feature in a [`FeatureVector`]
    pub fn index(&self) -> usize {
        match self {
            Feature::ScreenTimeHours => 0,
            Feature::ContinuousUsageMinutes => 1,
            Feature::NightUsageHours => 2,
            Feature::BreaksPerDay => 3,
            Feature::SleepHours => 4,
            Feature::EyeStrainLevel => 5,
            Feature::TaskSwitchingRate => 6,
        }
    }
}

/// Column names in model order
pub fn feature_columns() -> Vec<&'static str> {
    Feature::ALL.iter().map(Feature::column).collect()
}

/// One user's behavioural snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    pub screen_time_hours: f64,
    pub continuous_usage_minutes: f64,
    pub night_usage_hours: f64,
    pub breaks_per_day: f64,
    pub sleep_hours: f64,
    pub eye_strain_level: f64,
    pub task_switching_rate: f64,
}

impl Default for UsageProfile {
    /// Starting slider positions of the dashboard
    fn default() -> Self {
        Self {
            screen_time_hours: 6.5,
            continuous_usage_minutes: 90.0,
            night_usage_hours: 1.5,
            breaks_per_day: 4.0,
            sleep_hours: 7.0,
            eye_strain_level: 3.0,
            task_switching_rate: 18.0,
        }
    }
}

impl UsageProfile {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::ScreenTimeHours => self.screen_time_hours,
            Feature::ContinuousUsageMinutes => self.continuous_usage_minutes,
            Feature::NightUsageHours => self.night_usage_hours,
            Feature::BreaksPerDay => self.breaks_per_day,
            Feature::SleepHours => self.sleep_hours,
            Feature::EyeStrainLevel => self.eye_strain_level,
            Feature::TaskSwitchingRate => self.task_switching_rate,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        let slot = match feature {
            Feature::ScreenTimeHours => &mut self.screen_time_hours,
            Feature::ContinuousUsageMinutes => &mut self.continuous_usage_minutes,
            Feature::NightUsageHours => &mut self.night_usage_hours,
            Feature::BreaksPerDay => &mut self.breaks_per_day,
            Feature::SleepHours => &mut self.sleep_hours,
            Feature::EyeStrainLevel => &mut self.eye_strain_level,
            Feature::TaskSwitchingRate => &mut self.task_switching_rate,
        };
        *slot = value;
    }

    pub fn from_features(features: &FeatureVector) -> Self {
        let mut profile = Self::default();
        for feature in Feature::ALL {
            profile.set(feature, features[feature.index()]);
        }
        profile
    }

    pub fn to_features(&self) -> FeatureVector {
        Feature::ALL.map(|feature| self.get(feature))
    }

    /// Features whose value lies outside the trained domain (NaN included)
    pub fn out_of_domain(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| !feature.domain().contains(self.get(*feature)))
            .collect()
    }

    /// Check every field against its domain, reporting all violations at once
    pub fn validate(&self) -> Result<()> {
        let violations: Vec<String> = self
            .out_of_domain()
            .into_iter()
            .map(|feature| {
                let domain = feature.domain();
                format!(
                    "{} = {} is not {}",
                    feature.column(),
                    self.get(feature),
                    domain.describe()
                )
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(FatigueError::InvalidProfile { violations })
        }
    }

    /// Copy with every field clamped into its domain.
    ///
    /// NaN fields cannot be clamped meaningfully and are left untouched so
    /// that validation still reports them.
    pub fn clamped(&self) -> Self {
        let mut clamped = *self;
        for feature in Feature::ALL {
            let value = self.get(feature);
            if !value.is_nan() {
                clamped.set(feature, feature.domain().clamp(value));
            }
        }
        clamped
    }
}
