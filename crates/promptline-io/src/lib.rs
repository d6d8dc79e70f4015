//! Terminal backends for promptline.
//!
//! - `UnixConsoleInput` / `UnixConsoleOutput`: POSIX termios raw mode, a poll
//!   thread feeding the key parser, and ANSI escape output
//! - `MockConsoleInput` / `MockConsoleOutput`: in-memory doubles for tests

pub use promptline_core::{
    ClearType, Color, ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, EventLoopError,
    KeyEvent, KeyParser, RawModeGuard, TextStyle,
};

pub mod debug;
pub mod mock;

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::{UnixConsoleInput, UnixConsoleOutput};

pub use mock::{MockConsoleInput, MockConsoleOutput};

/// Create both console input and output for the current platform
pub fn create_console_io() -> ConsoleResult<(Box<dyn ConsoleInput>, Box<dyn ConsoleOutput>)> {
    let input = create_console_input()?;
    let output = create_console_output()?;
    Ok((input, output))
}

/// Create console input for the current platform
pub fn create_console_input() -> ConsoleResult<Box<dyn ConsoleInput>> {
    #[cfg(unix)]
    {
        let input = unix::UnixConsoleInput::new()?;
        Ok(Box::new(input))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console input".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create console output for the current platform
pub fn create_console_output() -> ConsoleResult<Box<dyn ConsoleOutput>> {
    #[cfg(unix)]
    {
        let output = unix::UnixConsoleOutput::new()?;
        Ok(Box::new(output))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "console output".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}

/// Create mock console I/O for testing
pub fn create_mock_console_io() -> (MockConsoleInput, MockConsoleOutput) {
    (MockConsoleInput::new(), MockConsoleOutput::new())
}
