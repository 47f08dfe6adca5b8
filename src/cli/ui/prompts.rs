use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};

use crate::cli::ui::menu_renderer::{MenuRenderer, MenuUI, MenuUIItem};
use crate::cli::ui::test_mode::{self, TextTestInput};

const BACK_KEY: &str = "__BACK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPromptResult {
    Value(String),
    Keep,
    Back,
    Help,
    Cancel,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoicePromptResult {
    Value(String),
    Back,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPromptResult {
    Confirm,
    Back,
    Cancel,
}

/// Single-line input read in raw mode. `:back`, `:help`, `:clear` and
/// `:cancel` are interpreted; Enter on an empty line keeps the default.
pub fn text_input(label: &str, default: Option<&str>) -> io::Result<TextPromptResult> {
    if let Some(scripted) = test_mode::next_text_input(label) {
        return Ok(match scripted {
            TextTestInput::Value(value) => interpret_buffer(&value, default),
            TextTestInput::Keep => TextPromptResult::Keep,
            TextTestInput::Back => TextPromptResult::Back,
            TextTestInput::Help => TextPromptResult::Help,
            TextTestInput::Cancel => TextPromptResult::Cancel,
            TextTestInput::Escape => TextPromptResult::Escape,
        });
    }

    let mut guard = RawModeGuard::activate()?;
    let mut stdout = io::stdout();
    redraw_input(&mut stdout, "")?;
    let mut buffer = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    guard.deactivate();
                    println!();
                    return Ok(TextPromptResult::Cancel);
                }
                KeyCode::Char('u') | KeyCode::Char('U') => {
                    buffer.clear();
                    redraw_input(&mut stdout, &buffer)?;
                    continue;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => {
                guard.deactivate();
                println!();
                return Ok(TextPromptResult::Escape);
            }
            KeyCode::Enter => {
                guard.deactivate();
                println!();
                return Ok(interpret_buffer(&buffer, default));
            }
            KeyCode::Backspace => {
                buffer.pop();
                redraw_input(&mut stdout, &buffer)?;
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                redraw_input(&mut stdout, &buffer)?;
            }
            KeyCode::Delete => {
                buffer.clear();
                redraw_input(&mut stdout, &buffer)?;
            }
            _ => {}
        }
    }
}

pub fn choice_menu(
    title: &str,
    context_lines: &[String],
    options: &[String],
    default: Option<&str>,
    enable_back: bool,
) -> io::Result<ChoicePromptResult> {
    if options.is_empty() {
        return Ok(ChoicePromptResult::Cancel);
    }

    let mut items: Vec<MenuUIItem> = options
        .iter()
        .map(|label| MenuUIItem::new(label.clone(), label.clone(), ""))
        .collect();
    if enable_back {
        items.push(MenuUIItem::new(
            BACK_KEY,
            "← Back",
            "Return to the previous field",
        ));
    }

    let mut menu = MenuUI::new(title, items);
    if let Some(context) = join_context(context_lines) {
        menu = menu.with_context(context);
    }
    if let Some(index) = default.and_then(|label| {
        options
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(label))
    }) {
        menu = menu.with_initial_index(index);
    }

    match MenuRenderer::new().show(&menu) {
        Ok(Some(selection)) if selection == BACK_KEY => Ok(ChoicePromptResult::Back),
        Ok(Some(selection)) => Ok(ChoicePromptResult::Value(selection)),
        Ok(None) if enable_back => Ok(ChoicePromptResult::Back),
        Ok(None) | Err(_) => Ok(ChoicePromptResult::Cancel),
    }
}

pub fn confirm_menu(title: &str, context_lines: &[String]) -> io::Result<ConfirmationPromptResult> {
    let items = vec![
        MenuUIItem::new("confirm", "Submit", "Send the inquiry"),
        MenuUIItem::new(BACK_KEY, "Edit previous field", "Return to the last field"),
        MenuUIItem::new("cancel", "Cancel", "Leave the form"),
    ];

    let mut menu = MenuUI::new(title, items).with_initial_index(0);
    if let Some(context) = join_context(context_lines) {
        menu = menu.with_context(context);
    }

    match MenuRenderer::new().show(&menu) {
        Ok(Some(selection)) if selection == "confirm" => Ok(ConfirmationPromptResult::Confirm),
        Ok(Some(selection)) if selection == BACK_KEY => Ok(ConfirmationPromptResult::Back),
        _ => Ok(ConfirmationPromptResult::Cancel),
    }
}

fn redraw_input(stdout: &mut Stdout, buffer: &str) -> io::Result<()> {
    stdout.execute(cursor::MoveToColumn(0))?;
    stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
    write!(stdout, "> {}", buffer)?;
    stdout.flush()
}

fn interpret_buffer(buffer: &str, default: Option<&str>) -> TextPromptResult {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return if default.is_some_and(|value| !value.is_empty()) {
            TextPromptResult::Keep
        } else {
            TextPromptResult::Value(String::new())
        };
    }

    match trimmed.to_ascii_lowercase().as_str() {
        ":cancel" => TextPromptResult::Cancel,
        ":back" => TextPromptResult::Back,
        ":help" => TextPromptResult::Help,
        ":clear" => TextPromptResult::Value(String::new()),
        _ => TextPromptResult::Value(trimmed.to_string()),
    }
}

fn join_context(lines: &[String]) -> Option<String> {
    let trimmed: Vec<&str> = lines.iter().map(|line| line.trim_end()).collect();
    if trimmed.iter().all(|line| line.is_empty()) {
        None
    } else {
        Some(trimmed.join("\n"))
    }
}

struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_keeps_a_present_default() {
        assert_eq!(interpret_buffer("  ", Some("Toyota")), TextPromptResult::Keep);
        assert_eq!(
            interpret_buffer("", None),
            TextPromptResult::Value(String::new())
        );
        assert_eq!(
            interpret_buffer("", Some("")),
            TextPromptResult::Value(String::new())
        );
    }

    #[test]
    fn colon_commands_are_interpreted() {
        assert_eq!(interpret_buffer(":BACK", None), TextPromptResult::Back);
        assert_eq!(interpret_buffer(":help", None), TextPromptResult::Help);
        assert_eq!(
            interpret_buffer(":clear", Some("Kandy")),
            TextPromptResult::Value(String::new())
        );
        assert_eq!(
            interpret_buffer(" Galle ", None),
            TextPromptResult::Value("Galle".into())
        );
    }
}
