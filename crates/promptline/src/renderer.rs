//! Terminal rendering for prompts
//!
//! A frame is the prompt line (`{icon} {message} {separator} {body}`) followed
//! by an optional footer line. Every redraw erases the whole previous frame,
//! including rows produced by line wrapping, and paints the new one in place.

use std::sync::Arc;

use crate::{ClearType, Color, ConsoleOutput, ConsoleResult, TextStyle};
use promptline_core::unicode::{display_width, rows_for};

/// A run of text drawn with one style
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn width(&self) -> usize {
        display_width(&self.text)
    }
}

/// Variant-specific part of the prompt line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    pub spans: Vec<Span>,
    /// Column of the text cursor within the body; `None` hides the cursor
    pub cursor: Option<usize>,
}

impl Body {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Concatenated text without styles
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Which icon and separator a frame carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Error,
    Submitted,
    Cancelled,
}

impl Status {
    fn icon(self) -> Span {
        match self {
            Status::Active => Span::styled("?", TextStyle::fg(Color::Cyan).bold()),
            Status::Error => Span::styled("!", TextStyle::fg(Color::Yellow).bold()),
            Status::Submitted => Span::styled("✔", TextStyle::fg(Color::Green)),
            Status::Cancelled => Span::styled("✖", TextStyle::fg(Color::Red)),
        }
    }

    fn separator(self) -> Span {
        match self {
            Status::Active | Status::Error => Span::styled("›", TextStyle::fg(Color::BrightBlack)),
            Status::Submitted | Status::Cancelled => {
                Span::styled("·", TextStyle::fg(Color::BrightBlack))
            }
        }
    }
}

/// One full redraw
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub status: Status,
    pub message: String,
    pub body: Body,
    pub footer: Option<Span>,
}

impl Frame {
    /// Icon, message and separator, each followed by a space
    fn header(&self) -> Vec<Span> {
        vec![
            self.status.icon(),
            Span::plain(" "),
            Span::styled(self.message.clone(), TextStyle::default().bold()),
            Span::plain(" "),
            self.status.separator(),
            Span::plain(" "),
        ]
    }

    /// Visible widths of each line of the frame
    pub fn line_widths(&self) -> Vec<usize> {
        let header: usize = self.header().iter().map(Span::width).sum();
        let mut widths = vec![header + self.body.width()];
        if let Some(footer) = &self.footer {
            widths.push(footer.width());
        }
        widths
    }
}

/// Terminal renderer for prompt frames
pub struct Renderer {
    console: Arc<dyn ConsoleOutput>,
    /// Line widths of the frame currently on screen
    previous_lines: Vec<usize>,
    /// Row of the cursor within the frame currently on screen
    cursor_row: usize,
}

impl Renderer {
    pub fn new(console: Arc<dyn ConsoleOutput>) -> Self {
        Self {
            console,
            previous_lines: Vec::new(),
            cursor_row: 0,
        }
    }

    /// Rows the frame on screen occupies in a window `columns` wide
    pub fn previous_rows(&self, columns: u16) -> usize {
        self.previous_lines
            .iter()
            .map(|width| rows_for(*width, columns))
            .sum()
    }

    /// Replace whatever is on screen with `frame`
    pub fn draw(&mut self, frame: &Frame, columns: u16) -> ConsoleResult<()> {
        let columns = columns.max(1);
        self.console.set_cursor_visible(false)?;
        self.erase(columns)?;

        for span in frame.header().iter().chain(frame.body.spans.iter()) {
            self.write_span(span)?;
        }
        if let Some(footer) = &frame.footer {
            self.console.write_text("\r\n")?;
            self.write_span(footer)?;
        }
        self.console.clear(ClearType::FromCursor)?;

        let widths = frame.line_widths();
        let total_rows: usize = widths.iter().map(|w| rows_for(*w, columns)).sum();
        let prompt_rows = rows_for(widths[0], columns);
        let cols = usize::from(columns);

        // The cursor sits at the end of the last row
        self.cursor_row = total_rows - 1;
        if let Some(offset) = frame.body.cursor {
            let header: usize = frame.header().iter().map(Span::width).sum();
            let column = header + offset;
            let target_row = (column / cols).min(prompt_rows - 1);
            let target_col = (column - target_row * cols).min(cols - 1);
            let up = self.cursor_row - target_row;
            if up > 0 {
                self.console.move_cursor_relative(-(up as i16), 0)?;
            }
            self.console.move_cursor_to_column(target_col as u16)?;
            self.cursor_row = target_row;
            self.console.set_cursor_visible(true)?;
        }

        self.previous_lines = widths;
        self.console.flush()
    }

    /// Erase the frame on screen and leave the cursor at its first column
    fn erase(&mut self, columns: u16) -> ConsoleResult<()> {
        let rows = self.previous_rows(columns);
        if rows == 0 {
            return Ok(());
        }
        let cursor_row = self.cursor_row.min(rows - 1);
        let below = rows - 1 - cursor_row;
        if below > 0 {
            self.console.move_cursor_relative(below as i16, 0)?;
        }
        for row in 0..rows {
            self.console.clear(ClearType::CurrentLine)?;
            if row + 1 < rows {
                self.console.move_cursor_relative(-1, 0)?;
            }
        }
        self.console.move_cursor_to_column(0)?;
        self.previous_lines.clear();
        self.cursor_row = 0;
        Ok(())
    }

    /// Leave the last frame on screen and move below it
    pub fn finish(&mut self) -> ConsoleResult<()> {
        self.console.write_text("\r\n")?;
        self.console.set_cursor_visible(true)?;
        self.previous_lines.clear();
        self.cursor_row = 0;
        self.console.flush()
    }

    pub fn bell(&self) -> ConsoleResult<()> {
        self.console.bell()?;
        self.console.flush()
    }

    fn write_span(&self, span: &Span) -> ConsoleResult<()> {
        if span.style == TextStyle::default() {
            self.console.write_text(&span.text)
        } else {
            self.console.write_styled_text(&span.text, &span.style)
        }
    }
}
