//! Key definitions and key event structures for terminal input parsing.
//!
//! A [`KeyEvent`] is what a keypress source hands to a prompt: a named key (or a
//! literal character) plus the `ctrl` / `meta` / `shift` modifier flags and the raw
//! bytes that produced it.

/// Key represents every key the parser can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Carriage return (`return`) or line feed (`enter`).
    Enter,
    Escape,
    /// Explicit cancel request emitted by a host, not by any physical key.
    Cancel,
    Backspace,
    Delete,
    Tab,
    Insert,

    Home,
    End,
    PageUp,
    PageDown,

    Up,
    Down,
    Left,
    Right,

    /// Function keys F1-F12.
    F(u8),

    /// A literal character; for control chords this is the lowercase letter.
    Char(char),

    /// Sequence recognised as well-formed but not mapped to a key.
    Unknown,
}

impl Key {
    /// Canonical lowercase name, as a host keypress stream would report it.
    pub fn name(&self) -> String {
        match self {
            Key::Enter => "return".to_string(),
            Key::Escape => "escape".to_string(),
            Key::Cancel => "cancel".to_string(),
            Key::Backspace => "backspace".to_string(),
            Key::Delete => "delete".to_string(),
            Key::Tab => "tab".to_string(),
            Key::Insert => "insert".to_string(),
            Key::Home => "home".to_string(),
            Key::End => "end".to_string(),
            Key::PageUp => "pageup".to_string(),
            Key::PageDown => "pagedown".to_string(),
            Key::Up => "up".to_string(),
            Key::Down => "down".to_string(),
            Key::Left => "left".to_string(),
            Key::Right => "right".to_string(),
            Key::F(n) => format!("f{n}"),
            Key::Char(c) => c.to_lowercase().to_string(),
            Key::Unknown => "undefined".to_string(),
        }
    }
}

/// KeyEvent represents one physical keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    /// The raw bytes that were parsed to produce this event
    pub raw: Vec<u8>,
}

impl KeyEvent {
    /// Create an unmodified event for `key`.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
            raw: Vec::new(),
        }
    }

    /// A literal character keypress. Uppercase letters carry `shift`.
    pub fn char(c: char) -> Self {
        Self {
            shift: c.is_uppercase(),
            ..Self::new(Key::Char(c))
        }
    }

    /// Control chord such as `ctrl+c`.
    pub fn ctrl(c: char) -> Self {
        Self {
            ctrl: true,
            ..Self::new(Key::Char(c.to_ascii_lowercase()))
        }
    }

    /// Meta (alt) chord, delivered by terminals as ESC followed by the key.
    pub fn meta(key: Key) -> Self {
        Self {
            meta: true,
            ..Self::new(key)
        }
    }

    pub fn with_raw(mut self, raw: Vec<u8>) -> Self {
        self.raw = raw;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn name(&self) -> String {
        self.key.name()
    }

    /// The literal character this keypress would insert, if any.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.ctrl && !self.meta && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl Default for KeyEvent {
    fn default() -> Self {
        Self::new(Key::Unknown)
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}
