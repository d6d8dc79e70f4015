use std::io;
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::{
    ClearType, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, EventLoopError,
    RawModeGuard, TextStyle,
};
use promptline_core::{KeyEvent, KeyParser};

type KeyCallback = Arc<Mutex<Option<Box<dyn FnMut(KeyEvent) + Send>>>>;

/// Poll timeout. Also the idle period after which a pending lone ESC is
/// reported as the Escape key.
const POLL_INTERVAL_MS: i32 = 50;

struct EventLoopHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

pub struct UnixConsoleInput {
    stdin_fd: i32,
    running: Arc<AtomicBool>,
    wake_fds: (i32, i32), // (read, write)
    key_cb: KeyCallback,
    handle: Mutex<Option<EventLoopHandle>>,
}

impl UnixConsoleInput {
    pub fn new() -> io::Result<Self> {
        // Self-pipe for waking up poll on stop
        let mut fds = [0i32; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let flags = unsafe { libc::fcntl(fds[0], libc::F_GETFL) };
        if flags != -1 {
            unsafe { libc::fcntl(fds[0], libc::F_SETFL, flags | libc::O_NONBLOCK) };
        }

        Ok(Self {
            stdin_fd: io::stdin().as_raw_fd(),
            running: Arc::new(AtomicBool::new(false)),
            wake_fds: (fds[0], fds[1]),
            key_cb: Arc::new(Mutex::new(None)),
            handle: Mutex::new(None),
        })
    }

    fn enter_raw_mode(fd: i32) -> io::Result<(libc::termios, i32)> {
        let mut original_termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original_termios;
        raw.c_lflag &= !(libc::ICANON
            | libc::ECHO
            | libc::ECHOE
            | libc::ECHOK
            | libc::ECHONL
            | libc::ISIG
            | libc::IEXTEN);
        raw.c_iflag &= !(libc::IXON
            | libc::IXOFF
            | libc::ICRNL
            | libc::INLCR
            | libc::IGNCR
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP);
        raw.c_oflag &= !libc::OPOST;
        raw.c_cflag &= !libc::CSIZE;
        raw.c_cflag |= libc::CS8;
        raw.c_cc[libc::VMIN] = 0; // non-blocking
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags == -1 {
            return Err(io::Error::last_os_error());
        }
        if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok((original_termios, flags))
    }

    fn dispatch(key_cb: &KeyCallback, events: Vec<KeyEvent>) {
        if events.is_empty() {
            return;
        }
        if let Ok(mut g) = key_cb.lock() {
            if let Some(cb) = g.as_mut() {
                for ev in events {
                    log::trace!("key {:?} raw={:?}", ev.key, ev.raw);
                    (cb)(ev);
                }
            }
        }
    }

    fn poll_loop(stdin_fd: i32, wake_read: i32, stop: Arc<AtomicBool>, key_cb: KeyCallback) {
        let mut parser = KeyParser::new();

        while !stop.load(Ordering::Relaxed) {
            let mut fds = [
                libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                },
                libc::pollfd {
                    fd: wake_read,
                    events: libc::POLLIN,
                    revents: 0,
                },
            ];
            let rc = unsafe {
                libc::poll(
                    fds.as_mut_ptr(),
                    fds.len() as libc::nfds_t,
                    POLL_INTERVAL_MS,
                )
            };
            if rc < 0 {
                // Interrupted; continue
                continue;
            }

            if fds[1].revents & libc::POLLIN != 0 {
                let mut buf = [0u8; 64];
                unsafe { libc::read(wake_read, buf.as_mut_ptr() as *mut _, buf.len()) };
            }
            if stop.load(Ordering::Relaxed) {
                break;
            }

            if rc == 0 {
                // Idle: resolve a dangling ESC or partial sequence
                Self::dispatch(&key_cb, parser.flush());
                continue;
            }

            if fds[0].revents & libc::POLLIN != 0 {
                let mut buf = [0u8; 1024];
                loop {
                    let n =
                        unsafe { libc::read(stdin_fd, buf.as_mut_ptr() as *mut _, buf.len()) };
                    if n <= 0 {
                        break;
                    }
                    Self::dispatch(&key_cb, parser.feed(&buf[..n as usize]));
                }
            } else if fds[0].revents & (libc::POLLHUP | libc::POLLERR) != 0 {
                log::debug!("stdin closed, leaving event loop");
                break;
            }
        }
    }

    fn query_window_size() -> io::Result<(u16, u16)> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok((ws.ws_col, ws.ws_row))
    }
}

impl Drop for UnixConsoleInput {
    fn drop(&mut self) {
        if self.running.load(Ordering::Relaxed) {
            let _ = self.stop_event_loop();
        }
        unsafe {
            libc::close(self.wake_fds.0);
            libc::close(self.wake_fds.1);
        }
    }
}

impl ConsoleInput for UnixConsoleInput {
    fn enable_raw_mode(&self) -> ConsoleResult<RawModeGuard> {
        let stdin_fd = self.stdin_fd;
        let (original_termios, original_flags) = Self::enter_raw_mode(stdin_fd)?;

        let restore_fn = move || unsafe {
            let _ = libc::tcsetattr(stdin_fd, libc::TCSANOW, &original_termios);
            let _ = libc::fcntl(stdin_fd, libc::F_SETFL, original_flags);
        };

        Ok(RawModeGuard::new(restore_fn, "Unix VT".to_string()))
    }

    fn get_window_size(&self) -> ConsoleResult<(u16, u16)> {
        Ok(Self::query_window_size()?)
    }

    fn start_event_loop(&self) -> ConsoleResult<()> {
        if self.running.swap(true, Ordering::Relaxed) {
            return Err(EventLoopError::AlreadyRunning.into());
        }
        let stdin_fd = self.stdin_fd;
        let wake_read = self.wake_fds.0;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let key_cb = self.key_cb.clone();

        let thread = thread::Builder::new()
            .name("promptline-input".to_string())
            .spawn(move || Self::poll_loop(stdin_fd, wake_read, thread_stop, key_cb))
            .map_err(|e| {
                self.running.store(false, Ordering::Relaxed);
                EventLoopError::Thread(e.to_string())
            })?;

        if let Ok(mut handle) = self.handle.lock() {
            *handle = Some(EventLoopHandle { stop, thread });
        }
        log::debug!("unix event loop started");
        Ok(())
    }

    fn stop_event_loop(&self) -> ConsoleResult<()> {
        if !self.running.swap(false, Ordering::Relaxed) {
            return Err(EventLoopError::NotRunning.into());
        }
        let handle = self.handle.lock().ok().and_then(|mut h| h.take());
        if let Some(EventLoopHandle { stop, thread }) = handle {
            stop.store(true, Ordering::Relaxed);
            // Wake the poll by writing a byte
            let _ = unsafe { libc::write(self.wake_fds.1, &1u8 as *const _ as *const _, 1) };
            // A listener may stop the loop from inside its own callback
            if thread.thread().id() != thread::current().id() {
                thread
                    .join()
                    .map_err(|_| EventLoopError::Thread("input thread panicked".to_string()))?;
            }
        }
        log::debug!("unix event loop stopped");
        Ok(())
    }

    fn on_key_pressed(&self, callback: Box<dyn FnMut(KeyEvent) + Send>) {
        if let Ok(mut g) = self.key_cb.lock() {
            *g = Some(callback);
        }
    }

    fn remove_key_listener(&self) {
        if let Ok(mut g) = self.key_cb.lock() {
            *g = None;
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Unix console output implementation using ANSI escape sequences.
///
/// Writes are buffered until [`ConsoleOutput::flush`] so a whole frame reaches
/// the terminal in one `write`.
pub struct UnixConsoleOutput {
    stdout_fd: i32,
    buffer: Mutex<Vec<u8>>,
}

impl UnixConsoleOutput {
    pub fn new() -> ConsoleResult<Self> {
        if unsafe { libc::isatty(libc::STDOUT_FILENO) } == 0 {
            return Err(ConsoleError::Terminal("stdout is not a TTY".to_string()));
        }
        Ok(Self {
            stdout_fd: libc::STDOUT_FILENO,
            buffer: Mutex::new(Vec::new()),
        })
    }

    fn write_ansi(&self, sequence: &str) -> ConsoleResult<()> {
        match self.buffer.lock() {
            Ok(mut buffer) => {
                buffer.extend_from_slice(sequence.as_bytes());
                Ok(())
            }
            Err(_) => Err(ConsoleError::Terminal(
                "output buffer lock poisoned".to_string(),
            )),
        }
    }

    fn write_bytes_direct(&self, bytes: &[u8]) -> ConsoleResult<()> {
        let mut written = 0;
        while written < bytes.len() {
            let result = unsafe {
                libc::write(
                    self.stdout_fd,
                    bytes[written..].as_ptr() as *const libc::c_void,
                    bytes.len() - written,
                )
            };
            if result == -1 {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EINTR) => continue, // Interrupted by signal, retry
                    _ => return Err(error.into()),
                }
            }
            written += result as usize;
        }
        Ok(())
    }
}

impl ConsoleOutput for UnixConsoleOutput {
    fn write_text(&self, text: &str) -> ConsoleResult<()> {
        self.write_ansi(text)
    }

    fn move_cursor_relative(&self, row_delta: i16, col_delta: i16) -> ConsoleResult<()> {
        if row_delta > 0 {
            self.write_ansi(&format!("\x1b[{row_delta}B"))?;
        } else if row_delta < 0 {
            self.write_ansi(&format!("\x1b[{}A", -row_delta))?;
        }
        if col_delta > 0 {
            self.write_ansi(&format!("\x1b[{col_delta}C"))?;
        } else if col_delta < 0 {
            self.write_ansi(&format!("\x1b[{}D", -col_delta))?;
        }
        Ok(())
    }

    fn move_cursor_to_column(&self, col: u16) -> ConsoleResult<()> {
        // ANSI columns are 1-based
        self.write_ansi(&format!("\x1b[{}G", col + 1))
    }

    fn clear(&self, clear_type: ClearType) -> ConsoleResult<()> {
        let ansi_seq = match clear_type {
            ClearType::FromCursor => "\x1b[0J",
            ClearType::CurrentLine => "\x1b[2K",
            ClearType::FromCursorToEndOfLine => "\x1b[0K",
        };
        self.write_ansi(ansi_seq)
    }

    fn set_style(&self, style: &TextStyle) -> ConsoleResult<()> {
        let params = style.sgr_params();
        if params.is_empty() {
            Ok(())
        } else {
            self.write_ansi(&format!("\x1b[{params}m"))
        }
    }

    fn reset_style(&self) -> ConsoleResult<()> {
        self.write_ansi("\x1b[0m")
    }

    fn set_cursor_visible(&self, visible: bool) -> ConsoleResult<()> {
        if visible {
            self.write_ansi("\x1b[?25h")
        } else {
            self.write_ansi("\x1b[?25l")
        }
    }

    fn bell(&self) -> ConsoleResult<()> {
        self.write_ansi("\x07")
    }

    fn flush(&self) -> ConsoleResult<()> {
        let pending = match self.buffer.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => {
                return Err(ConsoleError::Terminal(
                    "output buffer lock poisoned".to_string(),
                ))
            }
        };
        if pending.is_empty() {
            return Ok(());
        }
        self.write_bytes_direct(&pending)
    }
}

impl Drop for UnixConsoleOutput {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
