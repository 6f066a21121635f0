//! Colors and styles for the dashboard.

use crate::assessment::RiskCategory;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    /// Focused slider and headings
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    /// Inactive text and hints
    pub muted: Color,
    pub text: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            primary: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::DarkGray,
            text: Color::White,
        }
    }

    pub fn risk_color(&self, category: RiskCategory) -> Color {
        match category {
            RiskCategory::Low => self.success,
            RiskCategory::Moderate => self.warning,
            RiskCategory::High => self.danger,
        }
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn slider_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text)
        }
    }

    pub fn track_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    pub fn bar_style(&self) -> Style {
        Style::default().fg(self.warning)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
