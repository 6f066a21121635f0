//! Drawing the dashboard.

use super::app::{DashboardApp, ModelStatus, Outcome};
use super::theme::Theme;
use crate::assessment::FatigueAssessment;
use crate::output::DISCLAIMER;
use crate::profile::Feature;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

const TRACK_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &DashboardApp) {
    let theme = Theme::default_theme();
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("fatiguemap", theme.title_style()),
            Span::styled("  digital fatigue dashboard", theme.hint_style()),
        ])),
        header,
    );

    let [inputs, results] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    render_sliders(frame, app, &theme, inputs);
    render_results(frame, app, &theme, results);
    render_footer(frame, &theme, footer);

    if app.help_visible() {
        render_help(frame, &theme);
    }
}

fn format_value(feature: Feature, value: f64) -> String {
    if feature.domain().step < 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.0}", value)
    }
}

fn track(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * TRACK_WIDTH as f64).round() as usize;
    format!("{}{}", "━".repeat(filled), "─".repeat(TRACK_WIDTH - filled))
}

fn render_sliders(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let mut lines = Vec::new();
    for feature in Feature::ALL {
        let focused = feature == app.selected_feature();
        let domain = feature.domain();
        let value = app.profile().get(feature);
        let fraction = (value - domain.min) / (domain.max - domain.min);

        lines.push(Line::from(Span::styled(
            format!("{} {}", if focused { "▸" } else { " " }, feature.label()),
            theme.slider_style(focused),
        )));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(track(fraction), theme.track_style()),
            Span::raw(" "),
            Span::styled(format_value(feature, value), theme.slider_style(focused)),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Usage ")),
        area,
    );
}

fn render_results(frame: &mut Frame, app: &DashboardApp, theme: &Theme, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Assessment ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match (app.model(), app.outcome()) {
        (ModelStatus::Unavailable { reason }, _) => {
            let text = vec![
                Line::from(Span::styled("Model unavailable", theme.error_style())),
                Line::from(""),
                Line::from(reason.as_str()),
                Line::from(""),
                Line::from(Span::styled(
                    "Run `fatiguemap train` to build a model.",
                    theme.hint_style(),
                )),
            ];
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
        }
        (ModelStatus::Ready(_), None) => {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Adjust the sliders, then press Enter to assess.",
                    theme.hint_style(),
                )),
                inner,
            );
        }
        (ModelStatus::Ready(_), Some(Outcome::Failed(message))) => {
            let text = vec![
                Line::from(Span::styled("Prediction failed", theme.error_style())),
                Line::from(message.as_str()),
            ];
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
        }
        (ModelStatus::Ready(_), Some(Outcome::Assessed(assessment))) => {
            render_assessment(frame, assessment, app.is_stale(), theme, inner);
        }
    }
}

fn render_assessment(
    frame: &mut Frame,
    assessment: &FatigueAssessment,
    stale: bool,
    theme: &Theme,
    area: Rect,
) {
    let [gauge_area, risk_area, detail_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(area);

    let color = theme.risk_color(assessment.risk_category);
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio((assessment.score / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1} / 100", assessment.score)),
        gauge_area,
    );

    let mut risk_line = vec![
        Span::raw("Risk: "),
        Span::styled(
            assessment.risk_category.label(),
            Style::default().fg(color),
        ),
    ];
    if stale {
        risk_line.push(Span::styled(
            "  (inputs changed, press Enter)",
            theme.hint_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(risk_line)), risk_area);

    let mut lines = vec![Line::from(Span::styled("Contributing factors", theme.title_style()))];
    for contribution in &assessment.contributions {
        let filled = (contribution.relative_impact * 10.0).round() as usize;
        lines.push(Line::from(vec![
            Span::raw(format!("{:<14}", contribution.factor.label())),
            Span::styled("█".repeat(filled.min(10)), theme.bar_style()),
            Span::raw(format!(" {:.2}", contribution.relative_impact)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Advice", theme.title_style())));
    for advice in &assessment.advice {
        lines.push(Line::from(format!(
            "{} {}",
            advice.kind.emoji(),
            advice.message
        )));
    }

    if !assessment.adjusted_features.is_empty() {
        let names: Vec<&str> = assessment
            .adjusted_features
            .iter()
            .map(Feature::column)
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Clamped to trained range: {}", names.join(", ")),
            theme.hint_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), detail_area);
}

fn render_footer(frame: &mut Frame, theme: &Theme, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "↑↓ select  ←→ adjust  Enter assess  r reset  ? help  q quit",
            theme.hint_style(),
        )),
        Line::from(Span::styled(DISCLAIMER, theme.hint_style())),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_help(frame: &mut Frame, theme: &Theme) {
    let area = centered(frame.area(), 46, 12);
    let rows = [
        ("↑ / k / Shift+Tab", "previous input"),
        ("↓ / j / Tab", "next input"),
        ("← / h / -", "decrease"),
        ("→ / l / +", "increase"),
        ("Shift+←/→", "move five steps"),
        ("Enter / p", "assess"),
        ("r", "reset inputs"),
        ("q / Esc", "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<20}", keys), theme.title_style()),
                Span::raw(*action),
            ])
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys ")),
        area,
    );
}
