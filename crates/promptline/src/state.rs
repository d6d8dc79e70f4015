//! Prompt lifecycle, outcomes and state snapshots.

use std::sync::Arc;

/// Terminal result of a prompt interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome", content = "value", rename_all = "snake_case"))]
pub enum Outcome<T> {
    Submitted(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Outcome::Submitted(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The submitted value, if any
    pub fn submitted(self) -> Option<T> {
        match self {
            Outcome::Submitted(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Submitted(value) => Outcome::Submitted(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}

/// Where a prompt is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Nothing drawn yet
    Initial,
    Active,
    Submitted,
    Cancelled,
}

impl Lifecycle {
    pub fn is_submitted(self) -> bool {
        self == Lifecycle::Submitted
    }

    pub fn is_cancelled(self) -> bool {
        self == Lifecycle::Cancelled
    }

    pub fn is_completed(self) -> bool {
        self.is_submitted() || self.is_cancelled()
    }
}

/// Read-only view of a prompt, emitted on every render.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateSnapshot<T> {
    pub value: Option<T>,
    pub display_value: String,
    /// Character offset into `display_value`
    pub cursor: usize,
    pub error_message: Option<String>,
    pub is_error: bool,
    pub is_submitted: bool,
    pub is_cancelled: bool,
    pub is_completed: bool,
}

impl<T> StateSnapshot<T> {
    pub(crate) fn new(
        value: Option<T>,
        display_value: String,
        cursor: usize,
        error_message: Option<String>,
        lifecycle: Lifecycle,
    ) -> Self {
        let cursor = cursor.min(display_value.chars().count());
        Self {
            value,
            display_value,
            cursor,
            is_error: error_message.is_some(),
            error_message,
            is_submitted: lifecycle.is_submitted(),
            is_cancelled: lifecycle.is_cancelled(),
            is_completed: lifecycle.is_completed(),
        }
    }
}

pub type StateCallback<T> = Arc<dyn Fn(&StateSnapshot<T>) + Send + Sync>;
