//! Scripted input for driving the interactive screens without a terminal.
//!
//! `LEASING_TEST_MENU_EVENTS` holds one segment per rendered menu, separated by
//! `|`, each a comma list of key names (`DOWN,DOWN,ENTER`).
//! `LEASING_TEST_TEXT_INPUTS` holds one `|`-separated answer per text prompt;
//! `<KEEP>`, `<BACK>`, `<HELP>`, `<BLANK>`, `<ESC>` and `<CANCEL>` are
//! recognised tokens.

use once_cell::sync::Lazy;
use std::{
    collections::VecDeque,
    env,
    sync::{Mutex, MutexGuard, PoisonError},
};

pub const MENU_EVENTS_ENV: &str = "LEASING_TEST_MENU_EVENTS";
pub const TEXT_INPUTS_ENV: &str = "LEASING_TEST_TEXT_INPUTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTestEvent {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Esc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTestInput {
    Value(String),
    Keep,
    Back,
    Help,
    Cancel,
    Escape,
}

struct ScriptQueue<T> {
    enabled: bool,
    items: VecDeque<T>,
}

impl<T> ScriptQueue<T> {
    fn from_env(var: &str, parse: fn(&str) -> VecDeque<T>) -> Self {
        match env::var(var) {
            Ok(raw) => Self {
                enabled: true,
                items: parse(&raw),
            },
            Err(_) => Self {
                enabled: false,
                items: VecDeque::new(),
            },
        }
    }
}

static MENU_EVENTS: Lazy<Mutex<ScriptQueue<Vec<MenuTestEvent>>>> =
    Lazy::new(|| Mutex::new(ScriptQueue::from_env(MENU_EVENTS_ENV, parse_menu_sequences)));

static TEXT_INPUTS: Lazy<Mutex<ScriptQueue<TextTestInput>>> =
    Lazy::new(|| Mutex::new(ScriptQueue::from_env(TEXT_INPUTS_ENV, parse_text_sequences)));

fn lock<T>(queue: &Mutex<T>) -> MutexGuard<'_, T> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn is_enabled() -> bool {
    lock(&MENU_EVENTS).enabled || lock(&TEXT_INPUTS).enabled
}

pub fn next_menu_events(label: &str) -> Option<Vec<MenuTestEvent>> {
    let mut guard = lock(&MENU_EVENTS);
    if !guard.enabled {
        return None;
    }
    Some(
        guard
            .items
            .pop_front()
            .unwrap_or_else(|| panic!("Menu events exhausted before `{label}` menu rendered")),
    )
}

pub fn next_text_input(label: &str) -> Option<TextTestInput> {
    let mut guard = lock(&TEXT_INPUTS);
    if !guard.enabled {
        return None;
    }
    Some(
        guard
            .items
            .pop_front()
            .unwrap_or_else(|| panic!("Text inputs exhausted before prompt `{label}`")),
    )
}

fn parse_menu_event(token: &str) -> Option<MenuTestEvent> {
    match token.to_ascii_uppercase().as_str() {
        "UP" => Some(MenuTestEvent::Up),
        "DOWN" => Some(MenuTestEvent::Down),
        "HOME" => Some(MenuTestEvent::Home),
        "END" => Some(MenuTestEvent::End),
        "PAGEUP" | "PAGE_UP" => Some(MenuTestEvent::PageUp),
        "PAGEDOWN" | "PAGE_DOWN" => Some(MenuTestEvent::PageDown),
        "ENTER" | "RETURN" => Some(MenuTestEvent::Enter),
        "ESC" | "ESCAPE" => Some(MenuTestEvent::Esc),
        _ => None,
    }
}

fn parse_text_input(token: &str) -> TextTestInput {
    match token.to_ascii_uppercase().as_str() {
        "<ESC>" => TextTestInput::Escape,
        "<CANCEL>" => TextTestInput::Cancel,
        "<BACK>" => TextTestInput::Back,
        "<HELP>" => TextTestInput::Help,
        "<KEEP>" => TextTestInput::Keep,
        "<BLANK>" | "<EMPTY>" => TextTestInput::Value(String::new()),
        _ => TextTestInput::Value(token.to_string()),
    }
}

fn parse_menu_sequences(raw: &str) -> VecDeque<Vec<MenuTestEvent>> {
    raw.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let events: Vec<_> = segment
                .split(',')
                .filter_map(|token| parse_menu_event(token.trim()))
                .collect();
            (!events.is_empty()).then_some(events)
        })
        .collect()
}

fn parse_text_sequences(raw: &str) -> VecDeque<TextTestInput> {
    raw.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_text_input)
        .collect()
}

#[cfg(test)]
pub fn install_menu_events(events: Vec<Vec<MenuTestEvent>>) {
    let mut guard = lock(&MENU_EVENTS);
    guard.enabled = true;
    guard.items = events.into();
}

#[cfg(test)]
pub fn reset_menu_events() {
    let mut guard = lock(&MENU_EVENTS);
    guard.enabled = false;
    guard.items.clear();
}
