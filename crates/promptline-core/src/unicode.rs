//! Unicode utilities for prompt rendering.
//!
//! Values are edited by rune (character) index, but the terminal lays them out
//! by display column. These helpers translate between the two.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Count the number of Unicode characters (runes) in a string.
///
/// # Examples
///
/// ```
/// use promptline_core::unicode::rune_count;
///
/// assert_eq!(rune_count("hello"), 5);
/// assert_eq!(rune_count("こんにちは"), 5);
/// ```
pub fn rune_count(s: &str) -> usize {
    s.chars().count()
}

/// Get the display width of a string, accounting for wide characters.
///
/// # Examples
///
/// ```
/// use promptline_core::unicode::display_width;
///
/// assert_eq!(display_width("hello"), 5);
/// assert_eq!(display_width("こんにちは"), 10);
/// ```
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Display width of the first `runes` characters of `s`.
pub fn prefix_width(s: &str, runes: usize) -> usize {
    s.chars()
        .take(runes)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Number of terminal rows a line of `width` columns occupies in a window
/// `columns` wide. An empty line still occupies one row.
///
/// # Examples
///
/// ```
/// use promptline_core::unicode::rows_for;
///
/// assert_eq!(rows_for(0, 80), 1);
/// assert_eq!(rows_for(80, 80), 1);
/// assert_eq!(rows_for(81, 80), 2);
/// ```
pub fn rows_for(width: usize, columns: u16) -> usize {
    let columns = usize::from(columns.max(1));
    1 + width.saturating_sub(1) / columns
}
