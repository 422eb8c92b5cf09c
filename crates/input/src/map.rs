//! Key mapping from terminal events to player intents.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Context-free meaning of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Start from the start dialog, or play again from the completion dialog
    Confirm,
    /// The N-th building or option, 1-based
    Choose(usize),
    /// Close the question dialog
    Dismiss,
    /// Start over
    Reset,
}

/// Map keyboard input to intents.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyIntent> {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(KeyIntent::Confirm),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| KeyIntent::Choose(d as usize)),
        KeyCode::Esc => Some(KeyIntent::Dismiss),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyIntent::Reset),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
