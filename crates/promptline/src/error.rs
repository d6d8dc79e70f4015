//! Error types for prompt operations.
//!
//! Cancelling a prompt is not an error; it is reported as
//! [`Outcome::Cancelled`](crate::Outcome::Cancelled).

use crate::ConsoleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The terminal backend failed
    #[error("console error: {0}")]
    Console(#[from] ConsoleError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Rejected at construction: bad options or a callback that panics
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Another prompt is still attached to this terminal
    #[error("terminal is already attached to another prompt")]
    TerminalBusy,
}

/// Result type for prompt operations
pub type PromptResult<T> = Result<T, PromptError>;
