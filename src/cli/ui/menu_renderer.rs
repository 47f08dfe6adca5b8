use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Attribute, SetAttribute},
    terminal::{self, ClearType},
    ExecutableCommand,
};

use crate::cli::output::{current_preferences, OutputPreferences};
use crate::cli::ui::formatting::Formatter;
use crate::cli::ui::test_mode::{self, MenuTestEvent};

const PAGE_JUMP: usize = 3;

#[derive(Clone, Debug)]
pub struct MenuUI {
    pub title: String,
    pub context: Option<String>,
    pub items: Vec<MenuUIItem>,
    pub initial_index: Option<usize>,
}

impl MenuUI {
    pub fn new(title: impl Into<String>, items: Vec<MenuUIItem>) -> Self {
        Self {
            title: title.into(),
            context: None,
            items,
            initial_index: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = Some(index);
        self
    }

    fn start_index(&self) -> usize {
        self.initial_index
            .unwrap_or(0)
            .min(self.items.len().saturating_sub(1))
    }

    fn label_width(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
pub struct MenuUIItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl MenuUIItem {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug)]
pub enum MenuRenderError {
    Interrupted,
    EndOfInput,
    Io(io::Error),
}

impl From<io::Error> for MenuRenderError {
    fn from(err: io::Error) -> Self {
        MenuRenderError::Io(err)
    }
}

impl From<MenuRenderError> for io::Error {
    fn from(err: MenuRenderError) -> Self {
        match err {
            MenuRenderError::Io(err) => err,
            MenuRenderError::Interrupted => {
                io::Error::new(io::ErrorKind::Interrupted, "menu interrupted")
            }
            MenuRenderError::EndOfInput => {
                io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")
            }
        }
    }
}

enum Step {
    Move(usize),
    Select,
    Dismiss,
}

fn step(event: MenuTestEvent, selected: usize, len: usize) -> Step {
    match event {
        MenuTestEvent::Up => Step::Move(selected.checked_sub(1).unwrap_or(len - 1)),
        MenuTestEvent::Down => Step::Move((selected + 1) % len),
        MenuTestEvent::Home => Step::Move(0),
        MenuTestEvent::End => Step::Move(len - 1),
        MenuTestEvent::PageUp => Step::Move(selected.saturating_sub(PAGE_JUMP)),
        MenuTestEvent::PageDown => Step::Move((selected + PAGE_JUMP).min(len - 1)),
        MenuTestEvent::Enter => Step::Select,
        MenuTestEvent::Esc => Step::Dismiss,
    }
}

fn key_event(code: KeyCode) -> Option<MenuTestEvent> {
    match code {
        KeyCode::Up => Some(MenuTestEvent::Up),
        KeyCode::Down => Some(MenuTestEvent::Down),
        KeyCode::Home => Some(MenuTestEvent::Home),
        KeyCode::End => Some(MenuTestEvent::End),
        KeyCode::PageUp => Some(MenuTestEvent::PageUp),
        KeyCode::PageDown => Some(MenuTestEvent::PageDown),
        KeyCode::Enter => Some(MenuTestEvent::Enter),
        KeyCode::Esc => Some(MenuTestEvent::Esc),
        _ => None,
    }
}

/// Arrow-key menu returning the key of the chosen item, `None` on ESC.
pub struct MenuRenderer {
    prefs: OutputPreferences,
}

impl MenuRenderer {
    pub fn new() -> Self {
        Self {
            prefs: current_preferences(),
        }
    }

    pub fn show(&self, menu: &MenuUI) -> Result<Option<String>, MenuRenderError> {
        if menu.items.is_empty() {
            return Ok(None);
        }

        if let Some(events) = test_mode::next_menu_events(&menu.title) {
            return Ok(self.show_with_script(menu, events));
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(cursor::Hide)?;

        let len = menu.items.len();
        let mut selected = menu.start_index();
        let result = loop {
            self.render(&mut stdout, menu, selected)?;
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        break Err(MenuRenderError::Interrupted)
                    }
                    KeyCode::Char('d') | KeyCode::Char('D') => {
                        break Err(MenuRenderError::EndOfInput)
                    }
                    _ => continue,
                }
            }
            match key_event(key.code).map(|event| step(event, selected, len)) {
                Some(Step::Move(index)) => selected = index,
                Some(Step::Select) => break Ok(Some(menu.items[selected].key.clone())),
                Some(Step::Dismiss) => break Ok(None),
                None => {}
            }
        };

        let clear_status = self.clear_screen(&mut stdout);
        stdout.execute(cursor::Show).ok();
        terminal::disable_raw_mode().ok();
        clear_status?;

        result
    }

    fn show_with_script(&self, menu: &MenuUI, events: Vec<MenuTestEvent>) -> Option<String> {
        let len = menu.items.len();
        let mut selected = menu.start_index();
        for event in events {
            match step(event, selected, len) {
                Step::Move(index) => selected = index,
                Step::Select => {
                    self.print_snapshot(menu, selected);
                    return Some(menu.items[selected].key.clone());
                }
                Step::Dismiss => {
                    self.print_snapshot(menu, selected);
                    return None;
                }
            }
        }
        self.print_snapshot(menu, selected);
        panic!(
            "Scripted menu events must end with ENTER or ESC for `{}`",
            menu.title
        );
    }

    fn lines(&self, menu: &MenuUI, selected: usize) -> Vec<(bool, String)> {
        let formatter = Formatter::new();
        let width = menu.label_width();
        let mut lines = Vec::new();
        if let Some(context) = &menu.context {
            lines.push((false, formatter.detail_text(context)));
            lines.push((false, String::new()));
        }
        lines.push((false, formatter.header_text(&menu.title)));
        lines.push((false, String::new()));
        for (index, item) in menu.items.iter().enumerate() {
            let is_selected = index == selected;
            let pointer = match (is_selected, self.prefs.plain_mode) {
                (true, true) => ">",
                (true, false) => "▸",
                (false, _) => " ",
            };
            let row = formatter.format_two_column_row(&item.label, &item.description, width);
            lines.push((is_selected, format!(" {pointer} {row}")));
        }
        lines.push((false, String::new()));
        lines.push((false, formatter.detail_text(formatter.navigation_hint())));
        lines
    }

    fn print_snapshot(&self, menu: &MenuUI, selected: usize) {
        for (_, line) in self.lines(menu, selected) {
            println!("{line}");
        }
    }

    fn render(&self, stdout: &mut Stdout, menu: &MenuUI, selected: usize) -> io::Result<()> {
        self.clear_screen(stdout)?;
        for (highlight, line) in self.lines(menu, selected) {
            if highlight {
                stdout.execute(SetAttribute(Attribute::Reverse))?;
            }
            write!(stdout, "{line}")?;
            stdout.execute(SetAttribute(Attribute::Reset))?;
            // Raw mode needs an explicit carriage return.
            write!(stdout, "\r\n")?;
        }
        stdout.flush()
    }

    fn clear_screen(&self, stdout: &mut Stdout) -> io::Result<()> {
        stdout.execute(terminal::Clear(ClearType::All))?;
        stdout.execute(cursor::MoveTo(0, 0))?;
        Ok(())
    }
}
