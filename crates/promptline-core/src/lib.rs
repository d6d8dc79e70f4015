//! Promptline Core Library
//!
//! Terminal-independent building blocks for keypress-driven prompts: key
//! definitions, the raw-byte key parser, the keypress-to-action decoder, and the
//! console traits that I/O backends implement.

pub mod action;
pub mod console;
pub mod key;
pub mod key_parser;
pub mod unicode;

pub use action::{decode, decode_with, Action};
pub use console::{
    ClearType, Color, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, EventLoopError,
    RawModeGuard, TextStyle,
};
pub use key::{Key, KeyEvent};
pub use key_parser::{KeyParser, ParserState};
pub use unicode::{display_width, prefix_width, rows_for, rune_count};
