//! Logging and crash reporting.
//!
//! Install the panic hook and subscriber at startup:
//!
//! ```ignore
//! use fatiguemap::observability::{init_logging, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_logging(cli.verbose);
//! }
//! ```
//!
//! Training code marks its phase so a crash report can say where it was:
//!
//! ```ignore
//! let _phase = set_phase(TrainingPhase::Fitting);
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_fitted, set_current_file, set_phase,
    set_progress, ContextGuard, TrainingContext, TrainingPhase,
};
pub use logging::{init_logging, is_tui_active, set_tui_active};
pub use panic_hook::install_panic_hook;
