//! Thread-local context tracking for crash reports.
//!
//! Records which training phase is running and which dataset file is being
//! read, so a panic can say where it happened. Tree-fitting progress is kept
//! in global atomics because trees are fitted on rayon worker threads.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static TREES_FITTED: AtomicUsize = AtomicUsize::new(0);
static TREES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<TrainingContext> = const { RefCell::new(TrainingContext::new()) };
}

/// Snapshot of what the current thread is doing
#[derive(Debug, Clone, Default)]
pub struct TrainingContext {
    pub phase: Option<TrainingPhase>,
    /// Dataset or artifact file currently being read or written
    pub current_file: Option<PathBuf>,
}

impl TrainingContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// Stages of a training run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    LoadingData,
    EngineeringLabels,
    Splitting,
    Fitting,
    Validating,
    Publishing,
    Verifying,
}

impl std::fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadingData => write!(f, "loading_data"),
            Self::EngineeringLabels => write!(f, "engineering_labels"),
            Self::Splitting => write!(f, "splitting"),
            Self::Fitting => write!(f, "fitting"),
            Self::Validating => write!(f, "validating"),
            Self::Publishing => write!(f, "publishing"),
            Self::Verifying => write!(f, "verifying"),
        }
    }
}

/// RAII guard restoring the previous context on drop
pub struct ContextGuard {
    previous: TrainingContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Enter a training phase until the returned guard drops
#[must_use]
pub fn set_phase(phase: TrainingPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Record the file being processed until the returned guard drops
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

/// Set the tree counters. Thread-safe.
pub fn set_progress(fitted: usize, total: usize) {
    TREES_FITTED.store(fitted, Ordering::Relaxed);
    TREES_TOTAL.store(total, Ordering::Relaxed);
}

/// Count one more fitted tree. Safe to call from rayon workers.
pub fn increment_fitted() {
    TREES_FITTED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> TrainingContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (fitted, total) trees
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        TREES_FITTED.load(Ordering::Relaxed),
        TREES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = TrainingContext::new();
    });
}
