//! Exclusive access to a keypress source and an output sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::{ConsoleInput, ConsoleOutput, KeyEvent, PromptError, PromptResult, RawModeGuard};

/// A terminal that prompts attach to one at a time.
///
/// Cloning shares the underlying console and its attachment flag.
#[derive(Clone)]
pub struct Terminal {
    input: Arc<dyn ConsoleInput>,
    output: Arc<dyn ConsoleOutput>,
    attached: Arc<AtomicBool>,
}

impl Terminal {
    pub fn new<I, O>(input: I, output: O) -> Self
    where
        I: ConsoleInput + 'static,
        O: ConsoleOutput + 'static,
    {
        Self::from_arcs(Arc::new(input), Arc::new(output))
    }

    pub fn from_boxed(input: Box<dyn ConsoleInput>, output: Box<dyn ConsoleOutput>) -> Self {
        Self::from_arcs(Arc::from(input), Arc::from(output))
    }

    fn from_arcs(input: Arc<dyn ConsoleInput>, output: Arc<dyn ConsoleOutput>) -> Self {
        Self {
            input,
            output,
            attached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The process's own terminal. Installs the debug logger when
    /// `PROMPTLINE_DEBUG` asks for it.
    pub fn stdio() -> PromptResult<Self> {
        promptline_io::debug::init();
        let (input, output) = promptline_io::create_console_io()?;
        Ok(Self::from_boxed(input, output))
    }

    /// Whether a prompt currently owns this terminal
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn input(&self) -> &Arc<dyn ConsoleInput> {
        &self.input
    }

    pub fn output(&self) -> &Arc<dyn ConsoleOutput> {
        &self.output
    }

    /// Columns of the window, 80 when the backend cannot tell
    pub(crate) fn columns(&self) -> u16 {
        match self.input.get_window_size() {
            Ok((cols, _)) if cols > 0 => cols,
            _ => 80,
        }
    }

    /// Take the terminal: raw mode on, keypresses routed into a channel.
    pub(crate) fn attach(&self) -> PromptResult<Attachment> {
        if self
            .attached
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PromptError::TerminalBusy);
        }

        let raw_guard = match self.input.enable_raw_mode() {
            Ok(guard) => guard,
            Err(e) => {
                self.attached.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        let (tx, keys) = mpsc::unbounded_channel();
        self.input.on_key_pressed(Box::new(move |event| {
            // The receiver is gone once the prompt has closed
            let _ = tx.send(event);
        }));

        let mut attachment = Attachment {
            terminal: self.clone(),
            raw_guard: Some(raw_guard),
            keys,
            closed: false,
        };
        if let Err(e) = self.input.start_event_loop() {
            attachment.close();
            return Err(e.into());
        }
        debug!("terminal attached");
        Ok(attachment)
    }
}

/// A live attachment. Closing or dropping it hands the terminal back.
pub(crate) struct Attachment {
    terminal: Terminal,
    raw_guard: Option<RawModeGuard>,
    keys: mpsc::UnboundedReceiver<KeyEvent>,
    closed: bool,
}

impl Attachment {
    pub fn keys(&mut self) -> &mut mpsc::UnboundedReceiver<KeyEvent> {
        &mut self.keys
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Restore the terminal. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let input = &self.terminal.input;
        input.remove_key_listener();
        if input.is_running() {
            if let Err(e) = input.stop_event_loop() {
                warn!("failed to stop key reader: {e}");
            }
        }
        self.keys.close();
        if let Some(guard) = self.raw_guard.take() {
            if let Err(e) = guard.restore() {
                warn!("failed to restore terminal mode: {e}");
            }
        }

        let output = &self.terminal.output;
        if let Err(e) = output.set_cursor_visible(true).and_then(|_| output.flush()) {
            warn!("failed to restore cursor: {e}");
        }
        self.terminal.attached.store(false, Ordering::SeqCst);
        debug!("terminal detached");
    }
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.close();
    }
}
