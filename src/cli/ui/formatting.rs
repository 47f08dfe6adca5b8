use std::fmt;

use colored::Colorize;

use crate::cli::output::{current_preferences, OutputPreferences};

pub struct Formatter {
    prefs: OutputPreferences,
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            prefs: current_preferences(),
        }
    }

    pub fn print_header(&self, title: impl fmt::Display) {
        println!("\n{}", self.header_text(title));
    }

    pub fn header_text(&self, title: impl fmt::Display) -> String {
        let text = format!("=== {} ===", title);
        if self.is_plain() {
            text
        } else if self.prefs.high_contrast_mode {
            text.bold().underline().to_string()
        } else {
            text.bold().to_string()
        }
    }

    pub fn print_detail(&self, message: impl fmt::Display) {
        println!("{}", self.detail_text(message));
    }

    pub fn detail_text(&self, message: impl fmt::Display) -> String {
        if self.is_plain() {
            message.to_string()
        } else {
            message.to_string().dimmed().to_string()
        }
    }

    pub fn navigation_hint(&self) -> String {
        "(Use arrow keys to navigate, Enter to select, ESC to go back)".to_string()
    }

    /// Label/value pairs aligned on the widest label.
    pub fn print_rows<L: AsRef<str>, V: AsRef<str>>(&self, rows: &[(L, V)]) {
        let width = rows
            .iter()
            .map(|(label, _)| label.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        for (label, value) in rows {
            let label = format!("{}:", label.as_ref());
            println!("{}", self.format_two_column_row(&label, value.as_ref(), width));
        }
    }

    pub fn format_two_column_row(&self, label: &str, description: &str, width: usize) -> String {
        let padding = (width + 2).saturating_sub(label.chars().count());
        let row = format!("  {label}{}  {description}", " ".repeat(padding));
        row.trim_end().to_string()
    }

    fn is_plain(&self) -> bool {
        self.prefs.plain_mode || self.prefs.screen_reader_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_by_character_count() {
        let formatter = Formatter::new();
        assert_eq!(
            formatter.format_two_column_row("Van", "Up to 72 months", 5),
            "  Van      Up to 72 months"
        );
        assert_eq!(
            formatter.format_two_column_row("වෑන්", "", 2),
            "  වෑන්"
        );
    }
}
