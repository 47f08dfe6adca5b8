use std::{fmt, io};

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::output;
use crate::cli::ui::test_mode;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

/// Print a warning message via the standard CLI output helpers.
pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

/// Print an error message via the standard CLI output helpers.
pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

/// Print a success message via the standard CLI output helpers.
pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Yes/no question. Scripted runs take `default` without touching the terminal.
pub fn confirm_action(prompt: &str, default: bool) -> io::Result<bool> {
    if test_mode::is_enabled() {
        return Ok(default);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))
}
