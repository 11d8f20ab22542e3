// src/ui/keybindings.rs
//! Keyboard input handling: crossterm key events become picker events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::PickerEvent;
use crate::listing::SortKey;

/// Map a key event to a picker event. Character keys stay raw here; the
/// reducer routes them to the focused input or the type-ahead buffer.
pub fn key_to_event(key: &KeyEvent) -> Option<PickerEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') => Some(PickerEvent::NewFolderRequested),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up => Some(PickerEvent::ArrowUp),
        KeyCode::Down => Some(PickerEvent::ArrowDown),
        KeyCode::Left => Some(PickerEvent::UpDirectory),
        KeyCode::Enter | KeyCode::Right => Some(PickerEvent::Enter),
        KeyCode::Esc => Some(PickerEvent::Escape),
        KeyCode::Backspace => Some(PickerEvent::Backspace),
        KeyCode::Tab => Some(PickerEvent::Tab),
        // Column sorting, the header-click equivalent
        KeyCode::F(2) => Some(PickerEvent::HeaderClicked(SortKey::Name)),
        KeyCode::F(3) => Some(PickerEvent::HeaderClicked(SortKey::Modified)),
        KeyCode::F(4) => Some(PickerEvent::HeaderClicked(SortKey::Size)),
        KeyCode::Char(c) => Some(PickerEvent::CharTyped(c)),
        _ => None,
    }
}
