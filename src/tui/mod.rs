//! Interactive dashboard for exploring fatigue scores.
//!
//! Sliders for every usage input, a score gauge with the risk label,
//! factor contributions and advice. Without a loaded model the inputs stay
//! usable and the results pane shows why prediction is unavailable.

pub mod actions;
pub mod app;
pub mod render;
pub mod theme;

use crate::assessment::AssessmentPolicy;
use crate::observability::set_tui_active;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

pub use app::{DashboardApp, ModelStatus, Outcome};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Undo steps for a terminal setup still in progress.
///
/// Dropped before [`SetupGuard::disarm`], it runs them newest first so a
/// failed setup leaves the terminal as it found it.
#[derive(Default)]
struct SetupGuard {
    undo: Vec<Box<dyn FnOnce()>>,
}

impl SetupGuard {
    fn push(&mut self, undo: impl FnOnce() + 'static) {
        self.undo.push(Box::new(undo));
    }

    fn disarm(mut self) {
        self.undo.clear();
    }
}

impl Drop for SetupGuard {
    fn drop(&mut self) {
        while let Some(undo) = self.undo.pop() {
            undo();
        }
    }
}

pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: DashboardApp,
    cleaned_up: bool,
}

impl Dashboard {
    pub fn new(model: ModelStatus, policy: AssessmentPolicy) -> Result<Self> {
        let mut setup = SetupGuard::default();
        enable_raw_mode()?;
        setup.push(|| {
            let _ = disable_raw_mode();
        });

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        setup.push(|| {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        });
        set_tui_active(true);
        setup.push(|| set_tui_active(false));

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        setup.disarm();

        Ok(Self {
            terminal,
            app: DashboardApp::new(model, policy),
            cleaned_up: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|f| render::render(f, &self.app))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break;
                    }
                    if self.app.handle_key(key) {
                        break;
                    }
                }
            }
        }

        self.cleanup()
    }

    /// Restore the terminal
    pub fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;
        set_tui_active(false);
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_guard(log: &Rc<RefCell<Vec<&'static str>>>) -> SetupGuard {
        let mut guard = SetupGuard::default();
        for step in ["raw mode", "alternate screen", "tui flag"] {
            let log = Rc::clone(log);
            guard.push(move || log.borrow_mut().push(step));
        }
        guard
    }

    #[test]
    fn test_abandoned_setup_undoes_steps_in_reverse() {
        let log = Rc::new(RefCell::new(Vec::new()));
        drop(recording_guard(&log));
        assert_eq!(
            *log.borrow(),
            vec!["tui flag", "alternate screen", "raw mode"]
        );
    }

    #[test]
    fn test_completed_setup_keeps_terminal_state() {
        let log = Rc::new(RefCell::new(Vec::new()));
        recording_guard(&log).disarm();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_failure_midway_undoes_only_finished_steps() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let setup = || -> std::result::Result<(), &'static str> {
            let mut guard = SetupGuard::default();
            let raw = Rc::clone(&log);
            guard.push(move || raw.borrow_mut().push("raw mode"));
            let alternate_screen: std::result::Result<(), &'static str> =
                Err("alternate screen unavailable");
            alternate_screen?;
            guard.disarm();
            Ok(())
        };
        assert!(setup().is_err());
        assert_eq!(*log.borrow(), vec!["raw mode"]);
    }
}
