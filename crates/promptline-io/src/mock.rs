//! Mock console implementations for testing
//!
//! Both mocks are cheap to clone and share their state, so a test can hand one
//! clone to a prompt and keep another to drive keys and inspect what was drawn.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    ClearType, ConsoleInput, ConsoleOutput, ConsoleResult, EventLoopError, RawModeGuard,
    TextStyle,
};
use promptline_core::{Key, KeyEvent};

type KeyCallback = Arc<Mutex<Option<Box<dyn FnMut(KeyEvent) + Send>>>>;

/// Mock console input for testing
#[derive(Clone)]
pub struct MockConsoleInput {
    input_queue: Arc<Mutex<VecDeque<KeyEvent>>>,
    running: Arc<AtomicBool>,
    key_callback: KeyCallback,
    window_size: Arc<Mutex<(u16, u16)>>,
    raw_enabled: Arc<AtomicUsize>,
    raw_restored: Arc<AtomicUsize>,
}

impl Default for MockConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConsoleInput {
    pub fn new() -> Self {
        Self {
            input_queue: Arc::new(Mutex::new(VecDeque::new())),
            running: Arc::new(AtomicBool::new(false)),
            key_callback: Arc::new(Mutex::new(None)),
            window_size: Arc::new(Mutex::new((80, 24))),
            raw_enabled: Arc::new(AtomicUsize::new(0)),
            raw_restored: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_window_size(&self, cols: u16, rows: u16) {
        if let Ok(mut size) = self.window_size.lock() {
            *size = (cols, rows);
        }
    }

    /// Queue a key event; queued events are delivered when the event loop starts
    pub fn queue_key_event(&self, event: KeyEvent) {
        if let Ok(mut queue) = self.input_queue.lock() {
            queue.push_back(event);
        }
    }

    /// Queue text input as a sequence of character key events
    pub fn queue_text_input(&self, text: &str) {
        for ch in text.chars() {
            self.queue_key_event(KeyEvent::char(ch).with_raw(ch.to_string().into_bytes()));
        }
    }

    /// Queue multiple key events at once
    pub fn queue_key_events(&self, events: &[KeyEvent]) {
        for event in events {
            self.queue_key_event(event.clone());
        }
    }

    /// Queue a named key
    pub fn queue_key(&self, key: Key) {
        self.queue_key_event(KeyEvent::new(key));
    }

    /// Get the number of queued events
    pub fn queued_event_count(&self) -> usize {
        self.input_queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    /// Deliver a keypress now if the loop is running, otherwise queue it
    pub fn press(&self, event: KeyEvent) {
        if self.is_running() && self.has_listener() {
            self.queue_key_event(event);
            self.process_queued_events();
        } else {
            self.queue_key_event(event);
        }
    }

    pub fn has_listener(&self) -> bool {
        self.key_callback
            .lock()
            .map(|cb| cb.is_some())
            .unwrap_or(false)
    }

    /// Deliver every queued event to the listener
    pub fn process_queued_events(&self) {
        let events: Vec<KeyEvent> = match self.input_queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => return,
        };
        if let Ok(mut callback) = self.key_callback.lock() {
            if let Some(cb) = callback.as_mut() {
                for event in events {
                    // Use catch_unwind to prevent panics in callbacks from crashing tests
                    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        cb(event);
                    }));
                }
            }
        }
    }

    /// How many times raw mode was entered
    pub fn raw_mode_enabled_count(&self) -> usize {
        self.raw_enabled.load(Ordering::SeqCst)
    }

    /// How many raw mode guards have restored the terminal
    pub fn raw_mode_restored_count(&self) -> usize {
        self.raw_restored.load(Ordering::SeqCst)
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode_enabled_count() > self.raw_mode_restored_count()
    }
}

impl ConsoleInput for MockConsoleInput {
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        self.raw_enabled.fetch_add(1, Ordering::SeqCst);
        let restored = self.raw_restored.clone();
        let restore_fn = move || {
            restored.fetch_add(1, Ordering::SeqCst);
        };
        Ok(RawModeGuard::new(restore_fn, "Mock".to_string()))
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(self.window_size.lock().map(|s| *s).unwrap_or((80, 24)))
    }

    fn start_event_loop(&self) -> ConsoleResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(EventLoopError::AlreadyRunning.into());
        }
        self.process_queued_events();
        Ok(())
    }

    fn stop_event_loop(&self) -> ConsoleResult<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(EventLoopError::NotRunning.into());
        }
        Ok(())
    }

    fn on_key_pressed(&self, callback: Box<dyn FnMut(KeyEvent) + Send>) {
        if let Ok(mut cb) = self.key_callback.lock() {
            *cb = Some(callback);
        }
    }

    fn remove_key_listener(&self) {
        if let Ok(mut cb) = self.key_callback.lock() {
            *cb = None;
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Mock console output for testing.
///
/// Text is recorded without escape sequences; control operations are counted.
#[derive(Clone, Default)]
pub struct MockConsoleOutput {
    output_buffer: Arc<Mutex<String>>,
    styled_segments: Arc<Mutex<Vec<(String, TextStyle)>>>,
    current_style: Arc<Mutex<TextStyle>>,
    cursor_hidden: Arc<AtomicBool>,
    bells: Arc<AtomicUsize>,
    line_clears: Arc<AtomicUsize>,
    flushes: Arc<AtomicUsize>,
}

impl MockConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text written so far
    pub fn get_output(&self) -> String {
        self.output_buffer
            .lock()
            .map(|b| b.clone())
            .unwrap_or_default()
    }

    /// Return and forget the text written so far
    pub fn take_output(&self) -> String {
        self.output_buffer
            .lock()
            .map(|mut b| std::mem::take(&mut *b))
            .unwrap_or_default()
    }

    /// Text segments written under a non-default style
    pub fn styled_segments(&self) -> Vec<(String, TextStyle)> {
        self.styled_segments
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn bell_count(&self) -> usize {
        self.bells.load(Ordering::SeqCst)
    }

    pub fn line_clear_count(&self) -> usize {
        self.line_clears.load(Ordering::SeqCst)
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn is_cursor_visible(&self) -> bool {
        !self.cursor_hidden.load(Ordering::SeqCst)
    }
}

impl ConsoleOutput for MockConsoleOutput {
    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        if let Ok(mut buffer) = self.output_buffer.lock() {
            buffer.push_str(text);
        }
        if let Ok(style) = self.current_style.lock() {
            if *style != TextStyle::default() {
                if let Ok(mut segments) = self.styled_segments.lock() {
                    segments.push((text.to_string(), style.clone()));
                }
            }
        }
        Ok(())
    }

    fn move_cursor_relative(&self, _row_delta: i16, _col_delta: i16) -> ConsoleResult<()> {
        Ok(())
    }

    fn move_cursor_to_column(&self, _col: u16) -> ConsoleResult<()> {
        Ok(())
    }

    fn clear(&self, clear_type: ClearType) -> ConsoleResult<()> {
        if clear_type == ClearType::CurrentLine {
            self.line_clears.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn set_style(&self, style: &TextStyle) -> ConsoleResult<()> {
        if let Ok(mut current) = self.current_style.lock() {
            *current = style.clone();
        }
        Ok(())
    }

    fn reset_style(&self) -> ConsoleResult<()> {
        self.set_style(&TextStyle::default())
    }

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
        self.cursor_hidden.store(!visible, Ordering::SeqCst);
        Ok(())
    }

    fn bell(&self) -> ConsoleResult<()> {
        self.bells.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&self) -> ConsoleResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
