//! Terminal output for status lines.
//!
//! Everything here writes to stderr so stdout stays free for machine-readable
//! output (`plan`, `--json`).

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, print_outcome};
pub use messages::{error, info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, then falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support. Call once, early in `main`.
///
/// `--no-color` and the environment both turn colors off for every status
/// line printed through this module.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

static COLORS: AtomicBool = AtomicBool::new(true);

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
