//! The value pipeline: parse, validate, format, mask.
//!
//! Every edit runs the raw input through the configured parser, formats the
//! resulting value, and masks the formatted text to produce the display value.
//! Validation runs separately and may be asynchronous.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

use crate::{PromptError, PromptResult};

pub type Parser<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;
pub type Formatter<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub type Mask = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub type ValidationFuture = Pin<Box<dyn Future<Output = Validation> + Send>>;

/// Error text used when a validator rejects a value without saying why
pub const DEFAULT_ERROR: &str = "Please enter a valid value";

/// What a validator returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Rejected; the prompt shows its default error text
    Invalid,
    /// Rejected with a message
    Message(String),
}

impl Validation {
    /// Collapse to the error message the prompt should show, if any
    pub fn into_error(self, default_error: &str) -> Option<String> {
        match self {
            Validation::Valid => None,
            Validation::Invalid => Some(default_error.to_string()),
            Validation::Message(msg) => Some(msg),
        }
    }
}

impl From<bool> for Validation {
    fn from(ok: bool) -> Self {
        if ok {
            Validation::Valid
        } else {
            Validation::Invalid
        }
    }
}

impl From<()> for Validation {
    fn from(_: ()) -> Self {
        Validation::Valid
    }
}

impl From<String> for Validation {
    fn from(msg: String) -> Self {
        Validation::Message(msg)
    }
}

impl From<&str> for Validation {
    fn from(msg: &str) -> Self {
        Validation::Message(msg.to_string())
    }
}

impl From<Option<String>> for Validation {
    fn from(msg: Option<String>) -> Self {
        match msg {
            Some(msg) => Validation::Message(msg),
            None => Validation::Valid,
        }
    }
}

impl<E: Into<String>> From<Result<(), E>> for Validation {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Validation::Valid,
            Err(msg) => Validation::Message(msg.into()),
        }
    }
}

/// A configured validator.
pub enum Validator<T> {
    Sync(Arc<dyn Fn(&T) -> Validation + Send + Sync>),
    Async(Arc<dyn Fn(T) -> ValidationFuture + Send + Sync>),
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        match self {
            Validator::Sync(f) => Validator::Sync(f.clone()),
            Validator::Async(f) => Validator::Async(f.clone()),
        }
    }
}

/// The callbacks of one prompt, split out of its configuration.
pub struct Pipeline<T> {
    pub(crate) parser: Option<Parser<T>>,
    pub(crate) formatter: Option<Formatter<T>>,
    pub(crate) mask: Option<Mask>,
    pub(crate) validator: Option<Validator<T>>,
    pub(crate) default_error: String,
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self {
            parser: None,
            formatter: None,
            mask: None,
            validator: None,
            default_error: DEFAULT_ERROR.to_string(),
        }
    }
}

impl<T: Clone + Send + 'static> Pipeline<T> {
    /// Parse raw input with the configured parser, or `fallback` when none is set
    pub fn parse_or(&self, raw: &str, fallback: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        match &self.parser {
            Some(parser) => parser(raw),
            None => fallback(raw),
        }
    }

    pub fn format_or(&self, value: &T, fallback: impl FnOnce(&T) -> String) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => fallback(value),
        }
    }

    pub fn mask_or(&self, text: &str, fallback: impl FnOnce(&str) -> String) -> String {
        match &self.mask {
            Some(mask) => mask(text),
            None => fallback(text),
        }
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// Start validating `value`. Synchronous validators run immediately; the
    /// returned future resolves to the error message, if any.
    pub fn validation(&self, value: T) -> Pin<Box<dyn Future<Output = Option<String>> + Send>> {
        let default_error = self.default_error.clone();
        match &self.validator {
            None => Box::pin(async { None }),
            Some(Validator::Sync(validate)) => {
                let error = validate(&value).into_error(&default_error);
                Box::pin(async move { error })
            }
            Some(Validator::Async(validate)) => {
                let pending = validate(value);
                Box::pin(async move { pending.await.into_error(&default_error) })
            }
        }
    }

    /// Exercise every callback once against `sample` so that a callback which
    /// panics is reported now, not halfway through an interaction.
    pub fn probe(&self, sample: Option<&T>, raw: &str) -> PromptResult<()> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            if let Some(parser) = &self.parser {
                let _ = parser(raw);
            }
            let text = match (sample, &self.formatter) {
                (Some(value), Some(formatter)) => formatter(value),
                _ => raw.to_string(),
            };
            if let Some(mask) = &self.mask {
                let _ = mask(&text);
            }
            match (sample, &self.validator) {
                (Some(value), Some(Validator::Sync(validate))) => {
                    let _ = validate(value);
                }
                (Some(value), Some(Validator::Async(validate))) => {
                    drop(validate(value.clone()));
                }
                _ => {}
            }
        }));

        outcome.map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "callback panicked".to_string());
            PromptError::InvalidConfiguration(format!("prompt callback failed: {reason}"))
        })
    }
}
