//! Panic hook printing a boxed crash report.
//!
//! The hook leaves the dashboard's alternate screen first so the report
//! is visible, then prints the training phase, file and tree progress that
//! were current when the panic happened.

use super::context::{get_current_context, get_progress, TrainingContext};
use super::logging::set_tui_active;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    exit_tui_mode();

    let context = get_current_context();
    let (fitted, total) = get_progress();

    let lines = crash_report_lines(
        &extract_panic_message(info),
        location(info),
        &context,
        fitted,
        total,
    );

    eprintln!();
    for line in lines {
        eprintln!("{}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn exit_tui_mode() {
    set_tui_active(false);

    // Already panicking; nothing useful to do with these errors
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(std::io::stderr(), crossterm::terminal::LeaveAlternateScreen);
}

fn location(info: &PanicHookInfo<'_>) -> Option<String> {
    info.location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
}

fn boxed(text: &str) -> String {
    format!("║  {:<width$} ║", truncate(text, WIDTH - 3), width = WIDTH - 3)
}

fn rule(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(WIDTH), right)
}

fn crash_report_lines(
    message: &str,
    location: Option<String>,
    context: &TrainingContext,
    fitted: usize,
    total: usize,
) -> Vec<String> {
    let mut lines = vec![
        rule('╔', '╗'),
        boxed("FATIGUEMAP CRASH REPORT"),
        rule('╠', '╣'),
        boxed(&format!("Version: {}", VERSION)),
        boxed(&format!("Platform: {}", std::env::consts::OS)),
        boxed(&format!(
            "Time: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )),
        rule('╠', '╣'),
        boxed(&format!("PANIC: {}", message)),
    ];
    if let Some(location) = location {
        lines.push(boxed(&format!("Location: {}", location)));
    }

    lines.push(rule('╠', '╣'));
    lines.push(boxed("OPERATION CONTEXT:"));
    lines.push(boxed(&match context.phase {
        Some(phase) => format!("  Phase: {}", phase),
        None => "  Phase: (not set - crash occurred outside training)".to_string(),
    }));
    if let Some(file) = &context.current_file {
        lines.push(boxed(&format!("  File: {}", file.display())));
    }
    if total > 0 {
        let pct = (fitted as f64 / total as f64 * 100.0) as usize;
        lines.push(boxed(&format!(
            "  Progress: {} / {} trees ({}%)",
            fitted, total, pct
        )));
    }

    lines.push(rule('╠', '╣'));
    lines.push(boxed("Run with RUST_BACKTRACE=1 for stack trace"));
    lines.push(rule('╚', '╝'));
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
