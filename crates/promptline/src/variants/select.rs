//! Single choice from a paginated list.

use super::{Effect, Variant};
use crate::pipeline::Pipeline;
use crate::renderer::{Body, Span};
use crate::{Action, Color, KeyEvent, PromptError, PromptResult, TextStyle};

/// Options visible at once unless configured otherwise
pub const DEFAULT_PER_PAGE: usize = 8;

/// One choice of a select prompt
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption<T> {
    pub label: String,
    pub value: T,
    /// Footer text while the option is highlighted
    pub description: Option<String>,
    /// Glyph drawn before the label
    pub icon: Option<String>,
    /// Highlighted when the prompt opens
    pub selected: bool,
    /// Can be highlighted but not submitted
    pub disabled: bool,
    index: usize,
}

impl<T> SelectOption<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
            description: None,
            icon: None,
            selected: false,
            disabled: false,
            index: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Position after sorting by label
    pub fn index(&self) -> usize {
        self.index
    }
}

impl From<&str> for SelectOption<String> {
    fn from(label: &str) -> Self {
        SelectOption::new(label, label.to_string())
    }
}

impl From<String> for SelectOption<String> {
    fn from(label: String) -> Self {
        SelectOption::new(label.clone(), label)
    }
}

/// Select prompt settings
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOptions<T> {
    pub options: Vec<SelectOption<T>>,
    pub per_page: usize,
}

impl<T> SelectOptions<T> {
    pub fn new<I, O>(options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption<T>>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }
}

pub struct SelectPrompt<T> {
    options: Vec<SelectOption<T>>,
    cursor: usize,
    initial_cursor: usize,
    per_page: usize,
}

impl<T: Clone + Send + Sync + 'static> SelectPrompt<T> {
    pub fn new(config: SelectOptions<T>) -> PromptResult<Self> {
        let SelectOptions {
            mut options,
            per_page,
        } = config;
        if options.is_empty() {
            return Err(PromptError::InvalidConfiguration(
                "select needs at least one option".to_string(),
            ));
        }
        if let Some(position) = options.iter().position(|o| o.label.trim().is_empty()) {
            return Err(PromptError::InvalidConfiguration(format!(
                "select option #{position} has an empty label"
            )));
        }
        if per_page == 0 {
            return Err(PromptError::InvalidConfiguration(
                "select per_page must be at least 1".to_string(),
            ));
        }

        // Case-insensitive first, then ordinal so the order is total
        options.sort_by(|a, b| {
            a.label
                .to_lowercase()
                .cmp(&b.label.to_lowercase())
                .then_with(|| a.label.cmp(&b.label))
        });
        for (index, option) in options.iter_mut().enumerate() {
            option.index = index;
        }
        let cursor = options.iter().position(|o| o.selected).unwrap_or(0);

        Ok(Self {
            options,
            cursor,
            initial_cursor: cursor,
            per_page,
        })
    }

    pub fn options(&self) -> &[SelectOption<T>] {
        &self.options
    }

    /// Index of the highlighted option
    pub fn highlighted(&self) -> usize {
        self.cursor
    }

    /// Visible range of options, centered on the cursor where possible
    pub fn window(&self) -> (usize, usize) {
        let total = self.options.len();
        let visible = self.per_page.min(total);
        let start = self
            .cursor
            .saturating_sub(visible / 2)
            .min(total - visible);
        (start, start + visible)
    }

    fn move_to(&mut self, index: usize) -> Effect {
        if index == self.cursor {
            return Effect::Bell;
        }
        self.cursor = index;
        Effect::Changed
    }

    fn option_span(&self, option: &SelectOption<T>) -> Span {
        let text = match &option.icon {
            Some(icon) => format!("{icon} {}", option.label),
            None => option.label.clone(),
        };
        let highlighted = option.index == self.cursor;
        let style = match (highlighted, option.disabled) {
            (true, false) => TextStyle::fg(Color::Cyan).underline(),
            (true, true) => TextStyle::dimmed().underline(),
            (false, true) => TextStyle::dimmed(),
            (false, false) => TextStyle::default(),
        };
        Span::styled(text, style)
    }
}

impl<T: Clone + Send + Sync + 'static> Variant for SelectPrompt<T> {
    type Value = T;

    fn decode_extra(&self, key: &KeyEvent) -> Option<Action> {
        match key.printable() {
            Some('j') => Some(Action::MoveDown),
            Some('k') => Some(Action::MoveUp),
            _ => None,
        }
    }

    fn apply(&mut self, action: Action, _pipeline: &Pipeline<T>) -> Effect {
        let last = self.options.len() - 1;
        match action {
            Action::MoveUp => {
                let index = if self.cursor == 0 { last } else { self.cursor - 1 };
                self.move_to(index)
            }
            Action::MoveDown | Action::Next => {
                let index = if self.cursor == last { 0 } else { self.cursor + 1 };
                self.move_to(index)
            }
            Action::MoveFirst => self.move_to(0),
            Action::MoveLast => self.move_to(last),
            Action::NextPage => self.move_to((self.cursor + self.per_page).min(last)),
            Action::PrevPage => self.move_to(self.cursor.saturating_sub(self.per_page)),
            _ => Effect::Bell,
        }
    }

    fn value(&self, _pipeline: &Pipeline<T>) -> Option<T> {
        self.options.get(self.cursor).map(|o| o.value.clone())
    }

    fn display_value(&self, pipeline: &Pipeline<T>) -> String {
        let Some(option) = self.options.get(self.cursor) else {
            return String::new();
        };
        let text = pipeline.format_or(&option.value, |_| option.label.clone());
        pipeline.mask_or(&text, |s| s.to_string())
    }

    fn body(&self, pipeline: &Pipeline<T>, done: bool) -> Body {
        if done {
            return Body::new(vec![Span::plain(self.display_value(pipeline))]);
        }
        let (start, end) = self.window();
        let mut spans = Vec::new();
        if start > 0 {
            spans.push(Span::styled("↑ ", TextStyle::fg(Color::BrightBlack)));
        }
        for (i, option) in self.options[start..end].iter().enumerate() {
            if i > 0 {
                spans.push(Span::plain("  "));
            }
            spans.push(self.option_span(option));
        }
        if end < self.options.len() {
            spans.push(Span::styled(" ↓", TextStyle::fg(Color::BrightBlack)));
        }
        Body::new(spans)
    }

    fn hint(&self) -> Option<String> {
        self.options
            .get(self.cursor)
            .and_then(|o| o.description.clone())
    }

    fn can_submit(&self) -> bool {
        self.options.get(self.cursor).is_some_and(|o| !o.disabled)
    }

    fn reset(&mut self) {
        self.cursor = self.initial_cursor;
    }
}
