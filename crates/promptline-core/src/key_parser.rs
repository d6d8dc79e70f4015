//! State machine-based key parser for handling raw terminal input.
//!
//! The parser keeps state between calls so that escape sequences split across
//! reads are reassembled. A lone ESC is ambiguous until more bytes arrive, so
//! backends call [`KeyParser::flush`] when input goes idle.

use crate::key::{Key, KeyEvent};

/// Maximum buffer size to prevent unbounded memory growth
const MAX_BUFFER_SIZE: usize = 64;

/// Parser state for handling different types of input sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Plain bytes and single-byte control codes
    Normal,
    /// Seen ESC (0x1B)
    EscapeSequence,
    /// Control Sequence Introducer (ESC[)
    CsiSequence,
    /// Single Shift 3 (ESC O), used by application cursor mode
    Ss3Sequence,
    /// Inside a multi-byte UTF-8 character, with bytes still to come
    Utf8 { remaining: usize },
}

/// State machine parser for converting raw terminal input bytes to key events
pub struct KeyParser {
    state: ParserState,
    buffer: Vec<u8>,
}

impl KeyParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Normal,
            buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Feed raw bytes to the parser and return any complete key events
    pub fn feed(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        for &byte in data {
            if self.buffer.len() >= MAX_BUFFER_SIZE {
                log::trace!("key parser overflow, dropping {} bytes", self.buffer.len());
                events.push(KeyEvent::new(Key::Unknown).with_raw(std::mem::take(&mut self.buffer)));
                self.reset();
            }

            match self.state {
                ParserState::Normal => self.handle_normal_byte(byte, &mut events),
                ParserState::EscapeSequence => self.handle_escape_byte(byte, &mut events),
                ParserState::CsiSequence => self.handle_csi_byte(byte, &mut events),
                ParserState::Ss3Sequence => self.handle_ss3_byte(byte, &mut events),
                ParserState::Utf8 { remaining } => {
                    self.handle_utf8_byte(byte, remaining, &mut events)
                }
            }
        }

        events
    }

    /// Resolve any incomplete sequence. Called when no more bytes are pending.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        let pending = std::mem::take(&mut self.buffer);
        let state = std::mem::replace(&mut self.state, ParserState::Normal);

        match state {
            ParserState::Normal => {}
            ParserState::EscapeSequence => {
                events.push(KeyEvent::new(Key::Escape).with_raw(pending));
            }
            ParserState::CsiSequence | ParserState::Ss3Sequence => {
                // ESC followed by an unfinished introducer: report ESC, replay the rest
                events.push(KeyEvent::new(Key::Escape).with_raw(vec![0x1b]));
                for &byte in &pending[1..] {
                    self.handle_normal_byte(byte, &mut events);
                }
                events.extend(self.flush());
            }
            ParserState::Utf8 { .. } => {
                events.push(KeyEvent::new(Key::Unknown).with_raw(pending));
            }
        }

        events
    }

    /// Reset the parser state and clear all buffers
    pub fn reset(&mut self) {
        self.state = ParserState::Normal;
        self.buffer.clear();
    }

    fn handle_normal_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        match byte {
            0x1b => {
                self.buffer.push(byte);
                self.state = ParserState::EscapeSequence;
            }
            0xc0..=0xdf => self.begin_utf8(byte, 1),
            0xe0..=0xef => self.begin_utf8(byte, 2),
            0xf0..=0xf7 => self.begin_utf8(byte, 3),
            _ => events.push(single_byte_event(byte).with_raw(vec![byte])),
        }
    }

    fn begin_utf8(&mut self, byte: u8, remaining: usize) {
        self.buffer.push(byte);
        self.state = ParserState::Utf8 { remaining };
    }

    fn handle_utf8_byte(&mut self, byte: u8, remaining: usize, events: &mut Vec<KeyEvent>) {
        if byte & 0xc0 != 0x80 {
            // Not a continuation byte: the pending character is broken
            events.push(KeyEvent::new(Key::Unknown).with_raw(std::mem::take(&mut self.buffer)));
            self.reset();
            self.handle_normal_byte(byte, events);
            return;
        }

        self.buffer.push(byte);
        if remaining > 1 {
            self.state = ParserState::Utf8 {
                remaining: remaining - 1,
            };
            return;
        }

        let raw = std::mem::take(&mut self.buffer);
        let event = match std::str::from_utf8(&raw).ok().and_then(|s| s.chars().next()) {
            Some(c) => KeyEvent::char(c),
            None => KeyEvent::new(Key::Unknown),
        };
        events.push(event.with_raw(raw));
        self.reset();
    }

    fn handle_escape_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        match byte {
            b'[' => {
                self.buffer.push(byte);
                self.state = ParserState::CsiSequence;
            }
            b'O' => {
                self.buffer.push(byte);
                self.state = ParserState::Ss3Sequence;
            }
            0x1b => {
                // ESC ESC: the first one stands alone
                events.push(KeyEvent::new(Key::Escape).with_raw(vec![0x1b]));
            }
            0x20..=0x7e | 0x7f | 0x01..=0x1a => {
                let mut raw = std::mem::take(&mut self.buffer);
                raw.push(byte);
                let mut event = single_byte_event(byte);
                event.meta = true;
                events.push(event.with_raw(raw));
                self.reset();
            }
            _ => {
                events.push(KeyEvent::new(Key::Escape).with_raw(vec![0x1b]));
                self.reset();
                self.handle_normal_byte(byte, events);
            }
        }
    }

    fn handle_csi_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        self.buffer.push(byte);

        if is_csi_final_byte(byte) {
            let raw = std::mem::take(&mut self.buffer);
            let params = String::from_utf8_lossy(&raw[2..raw.len() - 1]).to_string();
            let event = decode_csi(&params, byte);
            if event.key == Key::Unknown {
                log::trace!("unmapped CSI sequence {raw:?}");
            }
            events.push(event.with_raw(raw));
            self.reset();
        } else if !is_csi_parameter_byte(byte) {
            log::trace!("malformed CSI sequence {:?}", self.buffer);
            events.push(KeyEvent::new(Key::Unknown).with_raw(std::mem::take(&mut self.buffer)));
            self.reset();
        }
    }

    fn handle_ss3_byte(&mut self, byte: u8, events: &mut Vec<KeyEvent>) {
        let mut raw = std::mem::take(&mut self.buffer);
        raw.push(byte);
        let key = match byte {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            b'P'..=b'S' => Key::F(byte - b'P' + 1),
            _ => Key::Unknown,
        };
        events.push(KeyEvent::new(key).with_raw(raw));
        self.reset();
    }
}

impl Default for KeyParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a byte that needs no further context to its key.
fn single_byte_event(byte: u8) -> KeyEvent {
    match byte {
        0x0d | 0x0a => KeyEvent::new(Key::Enter),
        0x09 => KeyEvent::new(Key::Tab),
        0x08 | 0x7f => KeyEvent::new(Key::Backspace),
        0x00 => KeyEvent::ctrl(' '),
        0x01..=0x1a => KeyEvent::ctrl((b'a' + byte - 1) as char),
        0x20..=0x7e => KeyEvent::char(byte as char),
        _ => KeyEvent::new(Key::Unknown),
    }
}

fn is_csi_parameter_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b';' | b':' | b'<' | b'=' | b'>' | b'?')
}

fn is_csi_final_byte(byte: u8) -> bool {
    matches!(byte, b'@'..=b'~')
}

/// Decode `ESC [ params final`. The optional second parameter is the xterm
/// modifier code: `1 + (shift | alt << 1 | ctrl << 2)`.
fn decode_csi(params: &str, final_byte: u8) -> KeyEvent {
    let mut parts = params.split(';');
    let first = parts.next().and_then(|p| p.parse::<u16>().ok());
    let modifier = parts
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .map(|m| m.saturating_sub(1))
        .unwrap_or(0);

    let key = match final_byte {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'Z' => {
            return KeyEvent::new(Key::Tab).with_shift(true);
        }
        b'P'..=b'S' => Key::F(final_byte - b'P' + 1),
        b'~' => match first {
            Some(1) | Some(7) => Key::Home,
            Some(2) => Key::Insert,
            Some(3) => Key::Delete,
            Some(4) | Some(8) => Key::End,
            Some(5) => Key::PageUp,
            Some(6) => Key::PageDown,
            Some(n @ 11..=15) => Key::F((n - 10) as u8),
            Some(n @ 17..=21) => Key::F((n - 11) as u8),
            Some(n @ 23..=24) => Key::F((n - 12) as u8),
            _ => Key::Unknown,
        },
        _ => Key::Unknown,
    };

    KeyEvent {
        key,
        shift: modifier & 1 != 0,
        meta: modifier & 2 != 0,
        ctrl: modifier & 4 != 0,
        raw: Vec::new(),
    }
}
