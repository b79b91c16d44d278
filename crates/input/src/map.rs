//! Key mapping from terminal events to drill actions.

use crate::types::DrillAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to drill actions.
pub fn handle_key_event(key: KeyEvent) -> Option<DrillAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Answer entry
        KeyCode::Char(c @ '0'..='9') => c.to_digit(10).map(|d| DrillAction::Digit(d as u8)),
        KeyCode::Backspace | KeyCode::Delete => Some(DrillAction::Delete),
        KeyCode::Enter => Some(DrillAction::Submit),

        // Lifecycle
        KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('S') => Some(DrillAction::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(DrillAction::Replay),

        _ => None,
    }
}

/// Check if key should quit the drill.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
