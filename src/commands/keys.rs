//! Names for key events, in the vocabulary the keybinding table uses.
//!
//! Printable keys are the character itself (`"j"`, `"G"`, `"?"`), named keys
//! are lowercase words (`"enter"`, `"f5"`, `"page down"`), and modifiers are
//! a space-separated prefix (`"ctrl d"`, `"meta x"`).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Binding-table name for `event`, or `None` for events that never bind
/// (key releases, bare modifier presses).
pub fn key_name(event: &KeyEvent) -> Option<String> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let base = match event.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "shift tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "page up".to_string(),
        KeyCode::PageDown => "page down".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };

    let mut prefix = String::new();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("ctrl ");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("meta ");
    }
    // Shift is already in the character for printable keys.
    if event.modifiers.contains(KeyModifiers::SHIFT)
        && !matches!(event.code, KeyCode::Char(_) | KeyCode::BackTab)
    {
        prefix.push_str("shift ");
    }

    // Control chords are spelled with the lowercase letter.
    let base = if event.modifiers.contains(KeyModifiers::CONTROL) {
        base.to_lowercase()
    } else {
        base
    };

    Some(prefix + &base)
}
