//! Prompt configuration
//!
//! [`PromptConfig`] carries everything the shared engine needs; variant-specific
//! settings live in small option structs.
//!
//! # Examples
//!
//! ```
//! use promptline::PromptConfig;
//! use std::time::Duration;
//!
//! let config = PromptConfig::new("Project name")
//!     .with_description("lowercase letters and dashes")
//!     .with_initial("my-app".to_string())
//!     .with_validator(|name: &String| {
//!         if name.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
//!             Ok(())
//!         } else {
//!             Err("only lowercase letters and dashes")
//!         }
//!     })
//!     .with_timeout(Duration::from_secs(30));
//! assert_eq!(config.message(), "Project name");
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::{Pipeline, Validation, ValidationFuture, Validator, DEFAULT_ERROR};
use crate::state::{StateCallback, StateSnapshot};

/// Creation parameters shared by every prompt variant.
pub struct PromptConfig<T> {
    message: String,
    description: Option<String>,
    initial: Option<T>,
    timeout: Option<Duration>,
    on_state: Option<StateCallback<T>>,
    pipeline: Pipeline<T>,
}

impl<T> PromptConfig<T> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
            initial: None,
            timeout: None,
            on_state: None,
            pipeline: Pipeline::default(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Footer line shown while the prompt is active and has no error
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value used whenever the input is empty
    pub fn with_initial(mut self, initial: T) -> Self {
        self.initial = Some(initial);
        self
    }

    /// Synchronous validator. Anything convertible into [`Validation`] works:
    /// `bool`, `Result<(), impl Into<String>>`, `Option<String>`, a message.
    pub fn with_validator<F, R>(mut self, validate: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: Into<Validation>,
    {
        self.pipeline.validator = Some(Validator::Sync(Arc::new(move |value: &T| {
            validate(value).into()
        })));
        self
    }

    /// Asynchronous validator. A result that arrives after the value changed
    /// again is discarded.
    pub fn with_async_validator<F, Fut, R>(mut self, validate: F) -> Self
    where
        T: 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<Validation>,
    {
        self.pipeline.validator = Some(Validator::Async(Arc::new(
            move |value: T| -> ValidationFuture {
                let pending = validate(value);
                Box::pin(async move { pending.await.into() })
            },
        )));
        self
    }

    /// Turns typed input into a value (text and numeric prompts)
    pub fn with_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.pipeline.parser = Some(Arc::new(parse));
        self
    }

    pub fn with_formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.pipeline.formatter = Some(Arc::new(format));
        self
    }

    /// Transforms formatted text into what is actually drawn
    pub fn with_mask<F>(mut self, mask: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.pipeline.mask = Some(Arc::new(mask));
        self
    }

    /// Error text shown when a validator rejects without a message.
    /// Defaults to [`DEFAULT_ERROR`].
    pub fn with_default_error(mut self, text: impl Into<String>) -> Self {
        self.pipeline.default_error = text.into();
        self
    }

    /// Cancel the prompt if it is still active after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Called with a state snapshot on every render
    pub fn with_on_state<F>(mut self, callback: F) -> Self
    where
        F: Fn(&StateSnapshot<T>) + Send + Sync + 'static,
    {
        self.on_state = Some(Arc::new(callback));
        self
    }

    pub fn initial(&self) -> Option<&T> {
        self.initial.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Settings<T>, Pipeline<T>) {
        let settings = Settings {
            message: self.message,
            description: self.description,
            timeout: self.timeout,
            on_state: self.on_state,
        };
        (settings, self.pipeline)
    }

    pub(crate) fn take_initial(&mut self) -> Option<T> {
        self.initial.take()
    }
}

impl<T> Default for PromptConfig<T> {
    fn default() -> Self {
        Self::new("")
    }
}

/// Engine-facing part of a [`PromptConfig`]
pub(crate) struct Settings<T> {
    pub message: String,
    pub description: Option<String>,
    pub timeout: Option<Duration>,
    pub on_state: Option<StateCallback<T>>,
}

/// Numeric prompt settings
#[derive(Debug, Clone, PartialEq)]
pub struct NumericOptions {
    pub min: f64,
    pub max: f64,
    /// Step for Up/Down
    pub increment: f64,
    /// Accept a decimal point
    pub float: bool,
    /// Decimal places kept for float values, at most 15
    pub round: u32,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            increment: 1.0,
            float: false,
            round: 2,
        }
    }
}

impl NumericOptions {
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }
}

/// Toggle prompt labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOptions {
    pub active: String,
    pub inactive: String,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self {
            active: "on".to_string(),
            inactive: "off".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config: PromptConfig<String> = PromptConfig::new("Name");
        assert_eq!(config.message(), "Name");
        assert!(config.initial().is_none());
        let (settings, pipeline) = config.into_parts();
        assert!(settings.description.is_none());
        assert!(settings.timeout.is_none());
        assert!(pipeline.validator.is_none());
        assert_eq!(pipeline.default_error, DEFAULT_ERROR);
    }

    #[test]
    fn test_builder_collects_settings() {
        let config = PromptConfig::new("Age")
            .with_description("in years")
            .with_initial(30.0)
            .with_default_error("not an age")
            .with_timeout(Duration::from_millis(250))
            .with_validator(|age: &f64| *age >= 0.0);
        assert_eq!(config.initial(), Some(&30.0));
        let (settings, pipeline) = config.into_parts();
        assert_eq!(settings.description.as_deref(), Some("in years"));
        assert_eq!(settings.timeout, Some(Duration::from_millis(250)));
        assert_eq!(pipeline.default_error, "not an age");
        assert!(matches!(pipeline.validator, Some(Validator::Sync(_))));
    }

    #[test]
    fn test_option_defaults() {
        let numeric = NumericOptions::default();
        assert_eq!(numeric.increment, 1.0);
        assert!(numeric.min.is_infinite() && numeric.min < 0.0);
        assert!(!numeric.float);

        let toggle = ToggleOptions::default();
        assert_eq!(toggle.active, "on");
        assert_eq!(toggle.inactive, "off");
    }
}
