//! Pure key-to-action mapping for the dashboard.
//!
//! `determine_action` decides what a key means given a small context; the
//! app then executes the action. Keeping the two apart lets key handling be
//! tested without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Quit,
    /// Focus the slider above
    SelectPrevious,
    /// Focus the slider below
    SelectNext,
    /// Move the focused slider down by `n` steps
    Decrease(u8),
    /// Move the focused slider up by `n` steps
    Increase(u8),
    /// Run the assessment on the current inputs
    Predict,
    /// Restore the default profile
    Reset,
    ToggleHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionContext {
    /// False when no usable model is loaded
    pub can_predict: bool,
    pub help_visible: bool,
}

/// Steps moved by shift-modified arrows
pub const LARGE_STEP: u8 = 5;

pub fn determine_action(key: KeyEvent, ctx: ActionContext) -> Option<DashboardAction> {
    if ctx.help_visible {
        // Any key closes help; quitting still works
        return match key.code {
            KeyCode::Char('q') => Some(DashboardAction::Quit),
            _ => Some(DashboardAction::ToggleHelp),
        };
    }

    let steps = if key.modifiers.contains(KeyModifiers::SHIFT) {
        LARGE_STEP
    } else {
        1
    };

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(DashboardAction::Quit),

        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
            Some(DashboardAction::SelectPrevious)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(DashboardAction::SelectNext),

        KeyCode::Left | KeyCode::Char('h') => Some(DashboardAction::Decrease(steps)),
        KeyCode::Right | KeyCode::Char('l') => Some(DashboardAction::Increase(steps)),
        KeyCode::Char('-') => Some(DashboardAction::Decrease(1)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(DashboardAction::Increase(1)),

        // Prediction is disabled without a model
        KeyCode::Enter | KeyCode::Char('p') if ctx.can_predict => Some(DashboardAction::Predict),

        KeyCode::Char('r') => Some(DashboardAction::Reset),
        KeyCode::Char('?') => Some(DashboardAction::ToggleHelp),

        _ => None,
    }
}
