//! Keypress decoding.
//!
//! [`decode`] maps a [`KeyEvent`] to the closed set of [`Action`]s every prompt
//! understands. `None` means the keypress is rejected and the prompt should ring
//! the bell without changing state. Prompt variants layer their own bindings on
//! top with [`decode_with`]; they can add mappings but never shadow the base table.

use crate::key::{Key, KeyEvent};

/// A decoded user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    Cancel,
    Reset,
    /// Tab: adopt the suggested value, or advance to the next choice
    Next,
    MoveFirst,
    MoveLast,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Backspace,
    DeleteForward,
    NextPage,
    PrevPage,
    /// Literal character input
    Other(char),
}

/// Decode with the base table only.
pub fn decode(key: &KeyEvent) -> Option<Action> {
    if key.meta && key.key != Key::Escape {
        return None;
    }
    if let Some(action) = base_action(key) {
        return Some(action);
    }
    key.printable().map(Action::Other)
}

/// Decode with variant-specific bindings consulted after the base table but
/// before literal character fallback.
pub fn decode_with<F>(key: &KeyEvent, extra: F) -> Option<Action>
where
    F: FnOnce(&KeyEvent) -> Option<Action>,
{
    if key.meta && key.key != Key::Escape {
        return None;
    }
    if let Some(action) = base_action(key) {
        return Some(action);
    }
    extra(key).or_else(|| key.printable().map(Action::Other))
}

fn base_action(key: &KeyEvent) -> Option<Action> {
    if key.ctrl {
        match key.key {
            Key::Char('a') => return Some(Action::MoveFirst),
            Key::Char('c') | Key::Char('d') => return Some(Action::Cancel),
            Key::Char('e') => return Some(Action::MoveLast),
            Key::Char('g') => return Some(Action::Reset),
            _ => {}
        }
    }

    match key.key {
        Key::Enter => Some(Action::Submit),
        Key::Escape | Key::Cancel => Some(Action::Cancel),
        Key::Backspace => Some(Action::Backspace),
        Key::Delete => Some(Action::DeleteForward),
        Key::Tab => Some(Action::Next),
        Key::Home => Some(Action::MoveFirst),
        Key::End => Some(Action::MoveLast),
        Key::PageUp => Some(Action::PrevPage),
        Key::PageDown => Some(Action::NextPage),
        Key::Up => Some(Action::MoveUp),
        Key::Down => Some(Action::MoveDown),
        Key::Left => Some(Action::MoveLeft),
        Key::Right => Some(Action::MoveRight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_and_cancel() {
        assert_eq!(decode(&Key::Enter.into()), Some(Action::Submit));
        assert_eq!(decode(&Key::Escape.into()), Some(Action::Cancel));
        assert_eq!(decode(&Key::Cancel.into()), Some(Action::Cancel));
        assert_eq!(decode(&KeyEvent::ctrl('c')), Some(Action::Cancel));
        assert_eq!(decode(&KeyEvent::ctrl('d')), Some(Action::Cancel));
    }

    #[test]
    fn test_control_chords() {
        assert_eq!(decode(&KeyEvent::ctrl('a')), Some(Action::MoveFirst));
        assert_eq!(decode(&KeyEvent::ctrl('e')), Some(Action::MoveLast));
        assert_eq!(decode(&KeyEvent::ctrl('g')), Some(Action::Reset));
        // Unmapped chords ring the bell
        assert_eq!(decode(&KeyEvent::ctrl('x')), None);
    }

    #[test]
    fn test_navigation_and_editing() {
        let table = [
            (Key::Backspace, Action::Backspace),
            (Key::Delete, Action::DeleteForward),
            (Key::Tab, Action::Next),
            (Key::Home, Action::MoveFirst),
            (Key::End, Action::MoveLast),
            (Key::PageUp, Action::PrevPage),
            (Key::PageDown, Action::NextPage),
            (Key::Up, Action::MoveUp),
            (Key::Down, Action::MoveDown),
            (Key::Left, Action::MoveLeft),
            (Key::Right, Action::MoveRight),
        ];
        for (key, action) in table {
            assert_eq!(decode(&key.into()), Some(action), "{key:?}");
        }
    }

    #[test]
    fn test_meta_keys_are_ignored_except_escape() {
        assert_eq!(decode(&KeyEvent::meta(Key::Char('b'))), None);
        assert_eq!(decode(&KeyEvent::meta(Key::Enter)), None);
        assert_eq!(decode(&KeyEvent::meta(Key::Escape)), Some(Action::Cancel));
    }

    #[test]
    fn test_literal_characters() {
        assert_eq!(decode(&KeyEvent::char('x')), Some(Action::Other('x')));
        assert_eq!(decode(&KeyEvent::char(' ')), Some(Action::Other(' ')));
        assert_eq!(decode(&Key::F(1).into()), None);
        assert_eq!(decode(&Key::Unknown.into()), None);
    }

    #[test]
    fn test_extra_bindings_extend_but_never_shadow() {
        let vi = |key: &KeyEvent| match key.key {
            Key::Char('j') => Some(Action::MoveDown),
            Key::Char('k') => Some(Action::MoveUp),
            Key::Enter => Some(Action::Cancel),
            _ => None,
        };
        assert_eq!(decode_with(&KeyEvent::char('j'), vi), Some(Action::MoveDown));
        assert_eq!(decode_with(&KeyEvent::char('k'), vi), Some(Action::MoveUp));
        assert_eq!(decode_with(&Key::Enter.into(), vi), Some(Action::Submit));
        assert_eq!(decode_with(&KeyEvent::char('x'), vi), Some(Action::Other('x')));
        assert_eq!(decode_with(&KeyEvent::meta(Key::Char('j')), vi), None);
    }
}
