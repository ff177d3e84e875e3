//! Keybindings: Enter submit, Esc unfocus/close palette, Ctrl+L clear, Up/Down history,
//! PgUp/PgDn scroll, F2 logs, Ctrl+C quit. j/k/g/G/q only while the input is unfocused.

use crate::actions::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub const TICK_RATE: Duration = Duration::from_millis(80);

pub fn key_to_action(
    event: &KeyEvent,
    palette_visible: bool,
    input_focused: bool,
    input_empty: bool,
) -> Option<Action> {
    // Accept Press and Repeat (hold key); ignore Release so we don't double-handle.
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let (code, mods) = (event.code, event.modifiers);

    if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    if code == KeyCode::Char('l') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::ClearInput);
    }
    if code == KeyCode::F(2) {
        return Some(Action::ToggleLogs);
    }
    if code == KeyCode::Esc {
        return if palette_visible {
            Some(Action::PaletteHide)
        } else {
            Some(Action::UnfocusInput)
        };
    }

    if code == KeyCode::Enter && mods.is_empty() {
        return if input_focused {
            Some(Action::Submit)
        } else {
            Some(Action::FocusInput)
        };
    }
    if code == KeyCode::Backspace {
        return Some(Action::Backspace);
    }

    if code == KeyCode::Up && mods.is_empty() {
        return if palette_visible {
            Some(Action::PaletteUp)
        } else {
            Some(Action::HistoryUp)
        };
    }
    if code == KeyCode::Down && mods.is_empty() {
        return if palette_visible {
            Some(Action::PaletteDown)
        } else {
            Some(Action::HistoryDown)
        };
    }

    if code == KeyCode::PageUp {
        return Some(Action::ChatScrollPageUp);
    }
    if code == KeyCode::PageDown {
        return Some(Action::ChatScrollPageDown);
    }
    if code == KeyCode::Tab && palette_visible {
        return Some(Action::PaletteSelect);
    }

    if code == KeyCode::Char('/') && input_empty {
        return Some(Action::PaletteShow);
    }

    if !input_focused && !mods.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('j') => return Some(Action::ChatScrollDown),
            KeyCode::Char('k') => return Some(Action::ChatScrollUp),
            KeyCode::Char('g') => return Some(Action::ChatScrollTop),
            KeyCode::Char('G') => return Some(Action::ChatScrollBottom),
            KeyCode::Char('i') => return Some(Action::FocusInput),
            _ => {}
        }
    }

    // Any other character goes to input (allow Alt for accented chars; only block Ctrl/Cmd).
    if let KeyCode::Char(c) = code {
        if !mods.contains(KeyModifiers::CONTROL) && !mods.contains(KeyModifiers::SUPER) {
            return Some(Action::Char(c));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_submits_only_when_focused() {
        assert_eq!(key_to_action(&key(KeyCode::Enter), false, true, false), Some(Action::Submit));
        assert_eq!(key_to_action(&key(KeyCode::Enter), false, false, false), Some(Action::FocusInput));
    }

    #[test]
    fn letters_are_text_while_focused() {
        assert_eq!(key_to_action(&key(KeyCode::Char('q')), false, true, true), Some(Action::Char('q')));
        assert_eq!(key_to_action(&key(KeyCode::Char('j')), false, true, false), Some(Action::Char('j')));
    }

    #[test]
    fn letters_are_shortcuts_while_unfocused() {
        assert_eq!(key_to_action(&key(KeyCode::Char('q')), false, false, true), Some(Action::Quit));
        assert_eq!(key_to_action(&key(KeyCode::Char('k')), false, false, true), Some(Action::ChatScrollUp));
        assert_eq!(
            key_to_action(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT), false, false, true),
            Some(Action::ChatScrollBottom)
        );
    }

    #[test]
    fn slash_opens_palette_only_on_empty_input() {
        assert_eq!(key_to_action(&key(KeyCode::Char('/')), false, true, true), Some(Action::PaletteShow));
        assert_eq!(key_to_action(&key(KeyCode::Char('/')), false, true, false), Some(Action::Char('/')));
    }

    #[test]
    fn arrows_follow_palette_visibility() {
        assert_eq!(key_to_action(&key(KeyCode::Up), true, true, false), Some(Action::PaletteUp));
        assert_eq!(key_to_action(&key(KeyCode::Up), false, true, false), Some(Action::HistoryUp));
        assert_eq!(key_to_action(&key(KeyCode::Esc), true, true, false), Some(Action::PaletteHide));
        assert_eq!(key_to_action(&key(KeyCode::Esc), false, true, false), Some(Action::UnfocusInput));
    }

    #[test]
    fn ctrl_c_quits_and_release_is_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(&ctrl_c, false, true, false), Some(Action::Quit));

        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_to_action(&release, false, true, false), None);
    }
}
