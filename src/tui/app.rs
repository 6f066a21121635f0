//! Dashboard state and key handling.

use super::actions::{determine_action, ActionContext, DashboardAction};
use crate::assessment::{assess, AssessmentPolicy, FatigueAssessment};
use crate::model::FatiguePredictor;
use crate::profile::{Feature, UsageProfile};
use crossterm::event::KeyEvent;

/// Whether the dashboard has something to predict with
pub enum ModelStatus {
    Ready(Box<dyn FatiguePredictor>),
    /// Loading failed; the reason is shown in place of results
    Unavailable { reason: String },
}

/// Result of the last prediction attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Assessed(FatigueAssessment),
    Failed(String),
}

pub struct DashboardApp {
    profile: UsageProfile,
    selected: usize,
    model: ModelStatus,
    policy: AssessmentPolicy,
    outcome: Option<Outcome>,
    /// Inputs changed since the last prediction
    stale: bool,
    help_visible: bool,
}

impl DashboardApp {
    pub fn new(model: ModelStatus, policy: AssessmentPolicy) -> Self {
        Self {
            profile: UsageProfile::default(),
            selected: 0,
            model,
            policy,
            outcome: None,
            stale: false,
            help_visible: false,
        }
    }

    pub fn profile(&self) -> &UsageProfile {
        &self.profile
    }

    pub fn selected_feature(&self) -> Feature {
        Feature::ALL[self.selected]
    }

    pub fn model(&self) -> &ModelStatus {
        &self.model
    }

    pub fn can_predict(&self) -> bool {
        matches!(self.model, ModelStatus::Ready(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Handle one key press. Returns true when the dashboard should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctx = ActionContext {
            can_predict: self.can_predict(),
            help_visible: self.help_visible,
        };
        match determine_action(key, ctx) {
            Some(action) => self.execute(action),
            None => false,
        }
    }

    pub fn execute(&mut self, action: DashboardAction) -> bool {
        match action {
            DashboardAction::Quit => return true,
            DashboardAction::SelectPrevious => {
                self.selected = (self.selected + Feature::ALL.len() - 1) % Feature::ALL.len();
            }
            DashboardAction::SelectNext => {
                self.selected = (self.selected + 1) % Feature::ALL.len();
            }
            DashboardAction::Decrease(steps) => self.step_selected(-i64::from(steps)),
            DashboardAction::Increase(steps) => self.step_selected(i64::from(steps)),
            DashboardAction::Predict => self.predict(),
            DashboardAction::Reset => {
                self.profile = UsageProfile::default();
                self.mark_changed();
            }
            DashboardAction::ToggleHelp => self.help_visible = !self.help_visible,
        }
        false
    }

    /// Move the selected slider by whole steps, staying on the step grid
    fn step_selected(&mut self, steps: i64) {
        let feature = self.selected_feature();
        let domain = feature.domain();
        let current = self.profile.get(feature);

        let position = ((current - domain.min) / domain.step).round() as i64;
        let next = domain.clamp(domain.min + (position + steps) as f64 * domain.step);

        if next != current {
            self.profile.set(feature, next);
            self.mark_changed();
        }
    }

    fn mark_changed(&mut self) {
        if self.outcome.is_some() {
            self.stale = true;
        }
    }

    /// Run an assessment; failures are kept for display instead of propagated
    pub fn predict(&mut self) {
        let ModelStatus::Ready(predictor) = &self.model else {
            return;
        };
        self.outcome = Some(match assess(&self.profile, predictor.as_ref(), &self.policy) {
            Ok(assessment) => Outcome::Assessed(assessment),
            Err(e) => {
                tracing::warn!(error = %e, "Dashboard prediction failed");
                Outcome::Failed(e.to_string())
            }
        });
        self.stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FatigueError, Result};
    use crate::profile::FeatureVector;
    use crossterm::event::{KeyCode, KeyModifiers};

    struct Fixed(f64);

    impl FatiguePredictor for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl FatiguePredictor for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn predict(&self, _features: &FeatureVector) -> Result<f64> {
            Err(FatigueError::Prediction("no trees".into()))
        }
    }

    fn ready(score: f64) -> DashboardApp {
        DashboardApp::new(
            ModelStatus::Ready(Box::new(Fixed(score))),
            AssessmentPolicy::default(),
        )
    }

    fn press(app: &mut DashboardApp, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_starts_with_default_profile() {
        let app = ready(50.0);
        assert_eq!(*app.profile(), UsageProfile::default());
        assert_eq!(app.selected_feature(), Feature::ScreenTimeHours);
        assert!(app.outcome().is_none());
    }

    #[test]
    fn test_slider_moves_by_step_and_stops_at_edges() {
        let mut app = ready(50.0);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.profile().screen_time_hours, 7.0);

        for _ in 0..100 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.profile().screen_time_hours, 16.0);

        app.execute(DashboardAction::Decrease(200));
        assert_eq!(app.profile().screen_time_hours, 1.0);
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = ready(50.0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_feature(), Feature::TaskSwitchingRate);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_feature(), Feature::ScreenTimeHours);
    }

    #[test]
    fn test_predict_and_stale_tracking() {
        let mut app = ready(72.0);
        press(&mut app, KeyCode::Enter);

        match app.outcome() {
            Some(Outcome::Assessed(a)) => assert_eq!(a.score, 72.0),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!app.is_stale());

        press(&mut app, KeyCode::Left);
        assert!(app.is_stale());

        press(&mut app, KeyCode::Char('p'));
        assert!(!app.is_stale());
    }

    #[test]
    fn test_prediction_failure_is_shown_not_raised() {
        let mut app = DashboardApp::new(
            ModelStatus::Ready(Box::new(Broken)),
            AssessmentPolicy::default(),
        );
        assert!(!press(&mut app, KeyCode::Enter));
        assert!(matches!(app.outcome(), Some(Outcome::Failed(msg)) if msg.contains("no trees")));
    }

    #[test]
    fn test_unavailable_model_keeps_sliders_working() {
        let mut app = DashboardApp::new(
            ModelStatus::Unavailable {
                reason: "file not found".into(),
            },
            AssessmentPolicy::default(),
        );
        assert!(!app.can_predict());

        press(&mut app, KeyCode::Enter);
        assert!(app.outcome().is_none());

        press(&mut app, KeyCode::Right);
        assert_eq!(app.profile().screen_time_hours, 7.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut app = ready(10.0);
        app.execute(DashboardAction::Increase(5));
        app.execute(DashboardAction::Reset);
        assert_eq!(*app.profile(), UsageProfile::default());
    }

    #[test]
    fn test_quit_key() {
        let mut app = ready(10.0);
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
