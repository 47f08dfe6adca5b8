use colored::Colorize;
use std::env;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputPreferences {
    /// No colour and no symbol decorations.
    pub plain_mode: bool,
    pub screen_reader_mode: bool,
    pub high_contrast_mode: bool,
}

impl OutputPreferences {
    /// Combines the configured `plain_output` flag with `NO_COLOR`.
    pub fn resolve(plain_output: bool) -> Self {
        let no_color = env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self {
            plain_mode: plain_output || no_color,
            ..Self::default()
        }
    }
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
    if prefs.plain_mode {
        colored::control::set_override(false);
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "ℹ"),
        MessageKind::Success => ("SUCCESS", "✔"),
        MessageKind::Warning => ("WARNING", "⚠"),
        MessageKind::Error => ("ERROR", "✖"),
        MessageKind::Section => ("", ""),
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    if kind == MessageKind::Section {
        let base = format!("=== {} ===", text.trim());
        return if prefs.plain_mode || prefs.screen_reader_mode {
            base
        } else {
            base.bold().to_string()
        };
    }

    let (label, icon) = build_label(kind);
    if prefs.plain_mode || prefs.screen_reader_mode {
        return format!("{label}: {text}");
    }

    let formatted = format!("{icon} {text}");
    if prefs.high_contrast_mode {
        return formatted.bold().to_string();
    }
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Info | MessageKind::Section => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &current_preferences());
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_uses_text_labels() {
        let prefs = OutputPreferences {
            plain_mode: true,
            ..OutputPreferences::default()
        };
        assert_eq!(
            apply_style(MessageKind::Error, "relay refused", &prefs),
            "ERROR: relay refused"
        );
        assert_eq!(
            apply_style(MessageKind::Section, " Inquiry Summary ", &prefs),
            "=== Inquiry Summary ==="
        );
    }

    #[test]
    fn plain_output_flag_forces_plain_mode() {
        assert!(OutputPreferences::resolve(true).plain_mode);
    }
}
