//! Numeric entry with range clamping and Up/Down stepping.

use super::{Effect, Variant};
use crate::config::NumericOptions;
use crate::pipeline::Pipeline;
use crate::renderer::{Body, Span};
use crate::{Action, PromptError, PromptResult, TextStyle};
use promptline_core::unicode::display_width;

/// Most decimal places an f64 can meaningfully round to
const MAX_ROUND: u32 = 15;

pub struct NumericPrompt {
    options: NumericOptions,
    /// Characters typed since the last step, kept as entered
    typed: String,
    /// `typed` parsed, rounded and clamped
    value: Option<f64>,
    initial: Option<f64>,
}

impl NumericPrompt {
    pub fn new(initial: Option<f64>, options: NumericOptions) -> PromptResult<Self> {
        if options.min.is_nan() || options.max.is_nan() || options.min > options.max {
            return Err(PromptError::InvalidConfiguration(format!(
                "numeric range {}..={} is empty",
                options.min, options.max
            )));
        }
        if !(options.increment.is_finite() && options.increment > 0.0) {
            return Err(PromptError::InvalidConfiguration(format!(
                "numeric increment must be positive, got {}",
                options.increment
            )));
        }
        if options.round > MAX_ROUND {
            return Err(PromptError::InvalidConfiguration(format!(
                "numeric round must be at most {MAX_ROUND}, got {}",
                options.round
            )));
        }
        Ok(Self {
            options,
            typed: String::new(),
            value: None,
            initial,
        })
    }

    fn round(&self, v: f64) -> f64 {
        if self.options.float {
            let factor = 10f64.powi(self.options.round as i32);
            (v * factor).round() / factor
        } else {
            v.trunc()
        }
    }

    fn clamp(&self, v: f64) -> f64 {
        v.max(self.options.min).min(self.options.max)
    }

    /// Where Up/Down land when nothing has been entered yet
    fn start_point(&self) -> f64 {
        let start = if self.options.min < 0.0 {
            0.0
        } else {
            self.options.min
        };
        self.clamp(start)
    }

    fn accepts(&self, c: char) -> bool {
        match c {
            '0'..='9' => true,
            '-' => self.typed.is_empty(),
            '.' => self.options.float && !self.typed.contains('.'),
            _ => false,
        }
    }

    fn reparse(&mut self, pipeline: &Pipeline<f64>) {
        if self.typed.is_empty() {
            self.value = None;
            return;
        }
        self.value = match pipeline.parse_or(&self.typed, |s| s.parse::<f64>().ok()) {
            Some(v) if v.is_finite() => Some(self.clamp(self.round(v))),
            _ => None,
        };
    }

    fn step(&mut self, up: bool) -> Effect {
        self.typed.clear();
        let Some(current) = self.value else {
            self.value = Some(self.start_point());
            return Effect::Changed;
        };
        if (up && current >= self.options.max) || (!up && current <= self.options.min) {
            return Effect::Bell;
        }
        let delta = if up {
            self.options.increment
        } else {
            -self.options.increment
        };
        self.value = Some(self.clamp(self.round(current + delta)));
        Effect::Changed
    }

    fn format(&self, pipeline: &Pipeline<f64>, v: f64) -> String {
        pipeline.format_or(&v, |v| self.round(*v).to_string())
    }

    fn is_placeholder(&self) -> bool {
        self.typed.is_empty() && self.value.is_none() && self.initial.is_some()
    }
}

impl Variant for NumericPrompt {
    type Value = f64;

    fn apply(&mut self, action: Action, pipeline: &Pipeline<f64>) -> Effect {
        match action {
            Action::Other(c) if self.accepts(c) => {
                self.typed.push(c);
                self.reparse(pipeline);
                Effect::Changed
            }
            Action::Backspace => {
                if self.typed.is_empty() {
                    match self.value {
                        Some(v) => self.typed = self.round(v).to_string(),
                        None => return Effect::Bell,
                    }
                }
                self.typed.pop();
                self.reparse(pipeline);
                Effect::Changed
            }
            Action::MoveUp => self.step(true),
            Action::MoveDown => self.step(false),
            _ => Effect::Bell,
        }
    }

    fn value(&self, _pipeline: &Pipeline<f64>) -> Option<f64> {
        self.value.or(self.initial)
    }

    fn display_value(&self, pipeline: &Pipeline<f64>) -> String {
        let text = if self.typed.is_empty() {
            self.value
                .or(self.initial)
                .map(|v| self.format(pipeline, v))
                .unwrap_or_default()
        } else {
            self.typed.clone()
        };
        pipeline.mask_or(&text, |s| s.to_string())
    }

    fn body(&self, pipeline: &Pipeline<f64>, done: bool) -> Body {
        let display = self.display_value(pipeline);
        if done {
            return Body::new(vec![Span::plain(display)]);
        }
        let width = display_width(&display);
        let style = if self.is_placeholder() {
            TextStyle::dimmed()
        } else {
            TextStyle::default()
        };
        Body::new(vec![Span::styled(display, style)]).with_cursor(width)
    }

    fn finish_editing(&mut self) {
        // Show the bounded value from now on
        if self.value.is_some() {
            self.typed.clear();
        }
    }

    fn reset(&mut self) {
        self.typed.clear();
        self.value = None;
    }
}
