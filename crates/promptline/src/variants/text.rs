//! Free text and password entry.

use super::{Effect, Variant};
use crate::pipeline::Pipeline;
use crate::renderer::{Body, Span};
use crate::{Action, TextStyle};
use promptline_core::unicode::prefix_width;

/// Asterisks drawn for any non-empty password
const PASSWORD_MASK: &str = "********";

/// Single-line edit buffer with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the cursor at the end
    pub fn with_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the character under the cursor
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_first(&mut self) {
        self.cursor = 0;
    }

    pub fn move_last(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}

/// Text prompt; with `masked` set it becomes a password prompt
pub struct TextPrompt {
    buffer: EditBuffer,
    initial: Option<String>,
    masked: bool,
}

impl TextPrompt {
    pub fn text(initial: Option<String>) -> Self {
        Self {
            buffer: EditBuffer::new(),
            initial,
            masked: false,
        }
    }

    pub fn password(initial: Option<String>) -> Self {
        Self {
            masked: true,
            ..Self::text(initial)
        }
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Empty input with an initial value to fall back on
    fn is_placeholder(&self) -> bool {
        self.buffer.is_empty() && self.initial.as_deref().is_some_and(|s| !s.is_empty())
    }

    fn default_mask(&self, formatted: &str) -> String {
        if !self.masked {
            formatted.to_string()
        } else if formatted.is_empty() {
            String::new()
        } else {
            PASSWORD_MASK.to_string()
        }
    }
}

impl Variant for TextPrompt {
    type Value = String;

    fn apply(&mut self, action: Action, _pipeline: &Pipeline<String>) -> Effect {
        match action {
            Action::Other(c) => {
                self.buffer.insert(c);
                Effect::Changed
            }
            Action::Backspace if self.buffer.backspace() => Effect::Changed,
            Action::DeleteForward if self.buffer.delete_forward() => Effect::Changed,
            Action::MoveLeft if self.buffer.move_left() => Effect::Moved,
            Action::MoveRight if self.buffer.move_right() => Effect::Moved,
            Action::MoveFirst => {
                self.buffer.move_first();
                Effect::Moved
            }
            Action::MoveLast => {
                self.buffer.move_last();
                Effect::Moved
            }
            Action::Next if self.is_placeholder() => {
                let initial = self.initial.clone().unwrap_or_default();
                self.buffer = EditBuffer::with_text(&initial);
                Effect::Changed
            }
            _ => Effect::Bell,
        }
    }

    fn value(&self, pipeline: &Pipeline<String>) -> Option<String> {
        if self.buffer.is_empty() {
            return Some(self.initial.clone().unwrap_or_default());
        }
        let raw = self.buffer.text();
        pipeline
            .parse_or(&raw, |s| Some(s.to_string()))
            .or(Some(raw))
    }

    fn display_value(&self, pipeline: &Pipeline<String>) -> String {
        let formatted = self
            .value(pipeline)
            .map(|v| pipeline.format_or(&v, |v| v.clone()))
            .unwrap_or_default();
        pipeline.mask_or(&formatted, |s| self.default_mask(s))
    }

    fn cursor(&self, pipeline: &Pipeline<String>) -> usize {
        let len = self.display_value(pipeline).chars().count();
        if self.is_placeholder() {
            0
        } else if self.masked {
            len
        } else {
            self.buffer.cursor().min(len)
        }
    }

    fn body(&self, pipeline: &Pipeline<String>, done: bool) -> Body {
        let display = self.display_value(pipeline);
        if done {
            return Body::new(vec![Span::plain(display)]);
        }
        if self.is_placeholder() {
            return Body::new(vec![Span::styled(display, TextStyle::dimmed())]).with_cursor(0);
        }
        let cursor = prefix_width(&display, self.cursor(pipeline));
        Body::new(vec![Span::plain(display)]).with_cursor(cursor)
    }

    fn finish_editing(&mut self) {
        self.buffer.move_last();
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn type_text(prompt: &mut TextPrompt, pipeline: &Pipeline<String>, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.apply(Action::Other(c), pipeline), Effect::Changed);
        }
    }

    #[test]
    fn test_type_then_backspace_round_trip() {
        let pipeline = Pipeline::default();
        let mut prompt = TextPrompt::text(None);
        type_text(&mut prompt, &pipeline, "abc");
        assert_eq!(prompt.display_value(&pipeline), "abc");
        assert_eq!(prompt.cursor(&pipeline), 3);
        for _ in 0..3 {
            assert_eq!(prompt.apply(Action::Backspace, &pipeline), Effect::Changed);
        }
        assert_eq!(prompt.display_value(&pipeline), "");
        assert_eq!(prompt.cursor(&pipeline), 0);
        assert_eq!(prompt.apply(Action::Backspace, &pipeline), Effect::Bell);
    }

    #[test]
    fn test_mid_line_editing() {
        let pipeline = Pipeline::default();
        let mut prompt = TextPrompt::text(None);
        type_text(&mut prompt, &pipeline, "ac");
        assert_eq!(prompt.apply(Action::MoveLeft, &pipeline), Effect::Moved);
        type_text(&mut prompt, &pipeline, "b");
        assert_eq!(prompt.display_value(&pipeline), "abc");
        assert_eq!(prompt.cursor(&pipeline), 2);

        prompt.apply(Action::MoveFirst, &pipeline);
        assert_eq!(prompt.apply(Action::MoveLeft, &pipeline), Effect::Bell);
        assert_eq!(prompt.apply(Action::DeleteForward, &pipeline), Effect::Changed);
        assert_eq!(prompt.display_value(&pipeline), "bc");
        prompt.apply(Action::MoveLast, &pipeline);
        assert_eq!(prompt.apply(Action::DeleteForward, &pipeline), Effect::Bell);
        assert_eq!(prompt.apply(Action::MoveUp, &pipeline), Effect::Bell);
    }

    #[test]
    fn test_empty_input_falls_back_to_initial() {
        let pipeline = Pipeline::default();
        let mut prompt = TextPrompt::text(Some("guest".to_string()));
        assert_eq!(prompt.value(&pipeline), Some("guest".to_string()));
        assert_eq!(prompt.cursor(&pipeline), 0);
        let body = prompt.body(&pipeline, false);
        assert!(body.spans[0].style.dim);

        // Tab adopts the placeholder into the buffer
        assert_eq!(prompt.apply(Action::Next, &pipeline), Effect::Changed);
        assert_eq!(prompt.buffer().text(), "guest");
        assert_eq!(prompt.cursor(&pipeline), 5);
        assert_eq!(prompt.apply(Action::Next, &pipeline), Effect::Bell);
    }

    #[test]
    fn test_password_mask_is_fixed_length() {
        let pipeline = Pipeline::default();
        let mut prompt = TextPrompt::password(None);
        assert_eq!(prompt.display_value(&pipeline), "");
        type_text(&mut prompt, &pipeline, "a");
        assert_eq!(prompt.display_value(&pipeline), PASSWORD_MASK);
        type_text(&mut prompt, &pipeline, "very long secret");
        assert_eq!(prompt.display_value(&pipeline), PASSWORD_MASK);
        assert_eq!(prompt.cursor(&pipeline), PASSWORD_MASK.len());
        assert_eq!(prompt.value(&pipeline), Some("avery long secret".to_string()));
    }

    #[test]
    fn test_parser_formatter_and_mask() {
        let pipeline: Pipeline<String> = Pipeline {
            parser: Some(Arc::new(|s: &str| Some(s.trim().to_string()))),
            formatter: Some(Arc::new(|v: &String| v.to_uppercase())),
            mask: Some(Arc::new(|s: &str| format!("[{s}]"))),
            ..Pipeline::default()
        };
        let mut prompt = TextPrompt::text(None);
        type_text(&mut prompt, &pipeline, " hi");
        assert_eq!(prompt.value(&pipeline), Some("hi".to_string()));
        assert_eq!(prompt.display_value(&pipeline), "[HI]");
        assert!(prompt.cursor(&pipeline) <= 4);
    }

    #[test]
    fn test_reset_and_finish_editing() {
        let pipeline = Pipeline::default();
        let mut prompt = TextPrompt::text(None);
        type_text(&mut prompt, &pipeline, "xyz");
        prompt.apply(Action::MoveFirst, &pipeline);
        prompt.finish_editing();
        assert_eq!(prompt.cursor(&pipeline), 3);
        prompt.reset();
        assert_eq!(prompt.display_value(&pipeline), "");
        assert_eq!(prompt.cursor(&pipeline), 0);
    }
}
