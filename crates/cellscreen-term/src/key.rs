// SPDX-License-Identifier: MIT
//
// Canonical key events.
//
// Every device translates its raw input into this shape before anything
// above the device layer sees it: a key identity (a character or a named
// special key) plus the modifier set held while it was pressed.

use std::fmt;

use bitflags::bitflags;

/// A key press: identity plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the press.
    pub modifiers: Modifiers,
}

impl Key {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key with the given modifiers.
    #[inline]
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Shorthand for an unmodified character key.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch))
    }

    /// The character, if this is a character key.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch) => Some(ch),
            _ => None,
        }
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// Identity of a key.
///
/// Printable characters use [`Char`](KeyCode::Char); special keys have
/// dedicated variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Shift+Tab as reported by most terminals.
    BackTab,
    Insert,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F24.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Char(ch) => return write!(f, "{ch}"),
            Self::F(n) => return write!(f, "f{n}"),
            Self::Enter => "enter",
            Self::Escape => "escape",
            Self::Backspace => "backspace",
            Self::Tab => "tab",
            Self::BackTab => "reverse-tab",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::PageUp => "page-up",
            Self::PageDown => "page-down",
        };
        f.write_str(name)
    }
}

/// Formats as `ctrl+alt+x` style chords.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::ALT, "alt"),
            (Modifiers::SHIFT, "shift"),
            (Modifiers::SUPER, "super"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.code)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_shorthand_has_no_modifiers() {
        let key = Key::char('q');
        assert_eq!(key.code, KeyCode::Char('q'));
        assert!(key.modifiers.is_empty());
        assert_eq!(key.as_char(), Some('q'));
    }

    #[test]
    fn named_key_has_no_char() {
        assert_eq!(Key::new(KeyCode::Enter).as_char(), None);
    }

    #[test]
    fn from_keycode() {
        assert_eq!(Key::from(KeyCode::Escape), Key::new(KeyCode::Escape));
    }

    #[test]
    fn display_plain_keys() {
        assert_eq!(Key::char('a').to_string(), "a");
        assert_eq!(Key::new(KeyCode::PageDown).to_string(), "page-down");
        assert_eq!(Key::new(KeyCode::F(5)).to_string(), "f5");
    }

    #[test]
    fn display_chord_orders_modifiers() {
        let key = Key::with(KeyCode::Char('x'), Modifiers::ALT | Modifiers::CTRL);
        assert_eq!(key.to_string(), "ctrl+alt+x");
    }
}
