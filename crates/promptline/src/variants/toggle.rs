//! Boolean prompts: a two-label toggle and a y/n confirmation.

use super::{Effect, Variant};
use crate::config::ToggleOptions;
use crate::pipeline::Pipeline;
use crate::renderer::{Body, Span};
use crate::{Action, Color, TextStyle};

pub struct TogglePrompt {
    value: bool,
    initial: bool,
    labels: ToggleOptions,
}

impl TogglePrompt {
    pub fn new(initial: Option<bool>, labels: ToggleOptions) -> Self {
        let initial = initial.unwrap_or(false);
        Self {
            value: initial,
            initial,
            labels,
        }
    }

    fn set(&mut self, value: bool) -> Effect {
        if self.value == value {
            return Effect::Bell;
        }
        self.value = value;
        Effect::Changed
    }

    fn label(&self, value: bool) -> &str {
        if value {
            &self.labels.active
        } else {
            &self.labels.inactive
        }
    }

    fn label_span(&self, value: bool) -> Span {
        let style = if self.value == value {
            TextStyle::fg(Color::Cyan).underline()
        } else {
            TextStyle::dimmed()
        };
        Span::styled(self.label(value), style)
    }
}

impl Variant for TogglePrompt {
    type Value = bool;

    fn apply(&mut self, action: Action, _pipeline: &Pipeline<bool>) -> Effect {
        match action {
            Action::MoveLeft | Action::MoveDown | Action::Other('0') => self.set(false),
            Action::MoveRight | Action::MoveUp | Action::Other('1') => self.set(true),
            Action::Next | Action::Other(' ') => self.set(!self.value),
            _ => Effect::Bell,
        }
    }

    fn value(&self, _pipeline: &Pipeline<bool>) -> Option<bool> {
        Some(self.value)
    }

    fn display_value(&self, pipeline: &Pipeline<bool>) -> String {
        let text = pipeline.format_or(&self.value, |v| self.label(*v).to_string());
        pipeline.mask_or(&text, |s| s.to_string())
    }

    fn body(&self, pipeline: &Pipeline<bool>, done: bool) -> Body {
        if done {
            return Body::new(vec![Span::plain(self.display_value(pipeline))]);
        }
        Body::new(vec![
            self.label_span(false),
            Span::styled(" / ", TextStyle::fg(Color::BrightBlack)),
            self.label_span(true),
        ])
    }

    fn reset(&mut self) {
        self.value = self.initial;
    }
}

/// Yes/no question answered with a single key
pub struct ConfirmPrompt {
    value: bool,
    initial: bool,
}

impl ConfirmPrompt {
    pub fn new(initial: Option<bool>) -> Self {
        let initial = initial.unwrap_or(false);
        Self {
            value: initial,
            initial,
        }
    }

    fn answer(c: char) -> Option<bool> {
        match c.to_ascii_lowercase() {
            'y' | 't' | '0' => Some(true),
            'n' | 'f' | '1' => Some(false),
            _ => None,
        }
    }
}

impl Variant for ConfirmPrompt {
    type Value = bool;

    fn apply(&mut self, action: Action, _pipeline: &Pipeline<bool>) -> Effect {
        match action {
            Action::Other(c) => match Self::answer(c) {
                Some(value) => {
                    self.value = value;
                    Effect::Submit
                }
                None => Effect::Bell,
            },
            _ => Effect::Bell,
        }
    }

    fn value(&self, _pipeline: &Pipeline<bool>) -> Option<bool> {
        Some(self.value)
    }

    fn display_value(&self, pipeline: &Pipeline<bool>) -> String {
        let text = pipeline.format_or(&self.value, |v| {
            if *v { "yes" } else { "no" }.to_string()
        });
        pipeline.mask_or(&text, |s| s.to_string())
    }

    fn cursor(&self, _pipeline: &Pipeline<bool>) -> usize {
        0
    }

    fn body(&self, pipeline: &Pipeline<bool>, done: bool) -> Body {
        if done {
            return Body::new(vec![Span::plain(self.display_value(pipeline))]);
        }
        let choices = if self.initial { "(Y/n)" } else { "(y/N)" };
        Body::new(vec![Span::styled(choices, TextStyle::dimmed())])
    }

    fn reset(&mut self) {
        self.value = self.initial;
    }
}
