//! Console input/output abstraction traits and types
//!
//! A prompt never talks to a terminal directly. It asks a [`ConsoleInput`] for raw
//! mode and a keypress stream, and writes its frames through a [`ConsoleOutput`].
//! Backends live in `promptline-io`.

use crate::KeyEvent;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use thiserror::Error;

/// Keypress source
pub trait ConsoleInput: Send + Sync {
    /// Enable raw terminal mode. The returned guard restores the previous mode
    /// when dropped or explicitly restored.
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard>;

    /// Current terminal window size (columns, rows)
    fn get_window_size(&self) -> ConsoleResult<(u16, u16)>;

    /// Start delivering keypresses to the registered listener
    fn start_event_loop(&self) -> ConsoleResult<()>;

    /// Stop delivering keypresses. Stopping a stopped loop is an error.
    fn stop_event_loop(&self) -> ConsoleResult<()>;

    /// Register the keypress listener, replacing any previous one
    fn on_key_pressed(&self, callback: Box<dyn FnMut(KeyEvent) + Send>);

    /// Drop the keypress listener. No events are delivered afterwards.
    fn remove_key_listener(&self);

    fn is_running(&self) -> bool;
}

/// Frame sink
pub trait ConsoleOutput: Send + Sync {
    /// Write text at current cursor position
    fn write_text(&self, text: &str) -> ConsoleResult<()>;

    /// Write text with specific styling, resetting the style afterwards
    fn write_styled_text(&self, text: &str, style: &TextStyle) -> ConsoleResult<()> {
        self.set_style(style)?;
        self.write_text(text)?;
        self.reset_style()
    }

    /// Move cursor relative to current position
    fn move_cursor_relative(&self, row_delta: i16, col_delta: i16) -> ConsoleResult<()>;

    /// Move cursor to a 0-based column on the current row
    fn move_cursor_to_column(&self, col: u16) -> ConsoleResult<()>;

    fn clear(&self, clear_type: ClearType) -> ConsoleResult<()>;

    /// Set text styling for subsequent writes
    fn set_style(&self, style: &TextStyle) -> ConsoleResult<()>;

    /// Reset all styling to default
    fn reset_style(&self) -> ConsoleResult<()>;

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()>;

    /// Audible bell
    fn bell(&self) -> ConsoleResult<()>;

    /// Flush buffered output to terminal
    fn flush(&self) -> ConsoleResult<()>;
}

/// RAII guard for terminal raw mode
pub struct RawModeGuard {
    restore_fn: Option<Box<dyn FnOnce() + Send>>,
    platform_info: String,
    is_active: Arc<AtomicBool>,
}

impl RawModeGuard {
    pub fn new<F>(restore_fn: F, platform_info: String) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            restore_fn: Some(Box::new(restore_fn)),
            platform_info,
            is_active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn platform_info(&self) -> &str {
        &self.platform_info
    }

    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }

    /// Restore terminal mode now instead of on drop
    pub fn restore(mut self) -> ConsoleResult<()> {
        match self.restore_fn.take() {
            Some(restore_fn) => {
                self.is_active.store(false, Ordering::Relaxed);
                restore_fn();
                Ok(())
            }
            None => Err(ConsoleError::Terminal("already restored".to_string())),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(restore_fn) = self.restore_fn.take() {
            self.is_active.store(false, Ordering::Relaxed);
            restore_fn();
        }
    }
}

impl std::fmt::Debug for RawModeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawModeGuard")
            .field("platform_info", &self.platform_info)
            .field("is_active", &self.is_active())
            .finish()
    }
}

/// Text styling configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub foreground: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub underline: bool,
}

impl TextStyle {
    pub fn fg(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::default()
        }
    }

    pub fn dimmed() -> Self {
        Self {
            dim: true,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// SGR parameter list for this style, e.g. `"1;36"`. Empty for the default style.
    pub fn sgr_params(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if self.bold {
            params.push("1".to_string());
        }
        if self.dim {
            params.push("2".to_string());
        }
        if self.underline {
            params.push("4".to_string());
        }
        if let Some(color) = self.foreground {
            params.push(color.sgr_foreground());
        }
        params.join(";")
    }
}

/// Foreground or background color for styled text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
}

impl Color {
    fn sgr_foreground(self) -> String {
        let code = match self {
            Color::Black => 30,
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
            Color::Cyan => 36,
            Color::White => 37,
            Color::BrightBlack => 90,
        };
        code.to_string()
    }
}

/// Screen clearing options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearType {
    /// Clear from cursor to end of screen
    FromCursor,
    /// Clear current line
    CurrentLine,
    /// Clear from cursor to end of line
    FromCursorToEndOfLine,
}

/// Console operation errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Event loop specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventLoopError {
    #[error("event loop already running")]
    AlreadyRunning,
    #[error("event loop not running")]
    NotRunning,
    #[error("event loop thread failed: {0}")]
    Thread(String),
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_raw_mode_guard_restores_once_on_drop() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = restored.clone();
        let guard = RawModeGuard::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            "test".to_string(),
        );
        assert!(guard.is_active());
        assert_eq!(guard.platform_info(), "test");
        drop(guard);
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_raw_mode_guard_explicit_restore() {
        let restored = Arc::new(AtomicUsize::new(0));
        let counter = restored.clone();
        let guard = RawModeGuard::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            "test".to_string(),
        );
        guard.restore().unwrap();
        assert_eq!(restored.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sgr_params() {
        assert_eq!(TextStyle::default().sgr_params(), "");
        assert_eq!(TextStyle::fg(Color::Cyan).sgr_params(), "36");
        assert_eq!(TextStyle::fg(Color::Green).bold().sgr_params(), "1;32");
        assert_eq!(TextStyle::dimmed().sgr_params(), "2");
        assert_eq!(TextStyle::fg(Color::BrightBlack).underline().sgr_params(), "4;90");
    }

    #[test]
    fn test_error_display() {
        let err = ConsoleError::from(EventLoopError::NotRunning);
        assert_eq!(err.to_string(), "event loop error: event loop not running");
        let err = ConsoleError::UnsupportedFeature {
            feature: "raw mode".to_string(),
            platform: "windows".to_string(),
        };
        assert!(err.to_string().contains("raw mode"));
    }
}
