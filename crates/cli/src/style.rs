//! Shared styling utilities for terminal output.

use console::Style;

use gitresolve_core::ConflictState;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a bold string.
pub fn bold(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

/// Final session message, styled by outcome.
pub fn outcome(state: ConflictState) -> String {
    match state {
        ConflictState::Unresolved => warn(state.summary()),
        ConflictState::None | ConflictState::Resolved => success(state.summary()),
    }
}
