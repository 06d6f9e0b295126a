//! Event handling for the live view.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Clock;
use crate::error::ReadtimeError;
use crate::storage::KeyValueStore;
use crate::tui::app::App;

const HELP: &str = "s:start | x:stop | q:quit";
const PROMPT_HELP: &str = "j/k:move | Space:toggle | Enter:confirm | Esc:dismiss";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start reading.
    Start,
    /// Stop reading.
    Stop,
    /// Record the break with the checked activities.
    Confirm,
    /// Close the break prompt.
    Dismiss,
}

/// Wait up to `timeout` for a terminal event and handle it.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<S: KeyValueStore, C: Clock>(
    app: &mut App<S, C>,
    timeout: Duration,
) -> Result<Option<Action>, ReadtimeError> {
    if !event::poll(timeout)
        .map_err(|e| ReadtimeError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| ReadtimeError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(app, key)),
        _ => Ok(None),
    }
}

/// Map a key press to an action, applying pure navigation directly.
pub fn handle_key<S: KeyValueStore, C: Clock>(app: &mut App<S, C>, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if let Some(prompt) = app.prompt.as_mut() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => prompt.select_next(),
            KeyCode::Char('k') | KeyCode::Up => prompt.select_previous(),
            KeyCode::Char(' ') => prompt.toggle(),
            KeyCode::Enter => return Some(Action::Confirm),
            KeyCode::Esc => return Some(Action::Dismiss),
            KeyCode::Char('?') => app.message = Some(PROMPT_HELP.to_string()),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('?') => {
            app.message = Some(HELP.to_string());
            None
        }
        _ => None,
    }
}
