// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! A single grid position: a printed code point, a style, a display width,
//! and a continuation flag.

use unicode_width::UnicodeWidthChar;

use crate::style::Style;

/// One column x row position in the character grid.
///
/// Invariant: if the cell at `(x, y)` has `width == 2`, the cell at
/// `(x + 1, y)` exists, has `width == 0`, and `continuation == true`. No
/// continuation cell exists without a wide parent immediately to its left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
    pub width: u8,
    pub continuation: bool,
}

impl Cell {
    /// An empty (space) cell with default style, used to fill new or
    /// resized grid regions.
    #[must_use]
    pub fn empty() -> Self {
        Self { ch: ' ', style: Style::default(), width: 1, continuation: false }
    }

    /// Build a narrow or wide cell for `ch`, computing its display width via
    /// [`unicode_width`]. Control characters and combining marks (width 0 by
    /// `unicode-width`'s accounting) are clamped to width 1 so every cell in
    /// the grid occupies at least one column — a glyph that takes zero
    /// columns would otherwise let `(x+1, y)` silently never get written.
    #[must_use]
    pub fn new(ch: char, style: Style) -> Self {
        let width = UnicodeWidthChar::width(ch).unwrap_or(1).max(1).min(2) as u8;
        Self { ch, style, width: width as u8, continuation: false }
    }

    /// The continuation half of a wide cell: carries no glyph of its own.
    #[must_use]
    pub fn continuation_of(style: Style) -> Self {
        Self { ch: '\0', style, width: 0, continuation: true }
    }

    #[must_use]
    pub fn is_wide(&self) -> bool { self.width == 2 }
}

impl Default for Cell {
    fn default() -> Self { Self::empty() }
}

/// Display width, in columns, of a single `char`. Exposed so callers that
/// need to lay out text before touching the grid (e.g. the layout engine
/// measuring [`crate::view::text::Text`]) use the same width rule the grid
/// itself uses when placing glyphs.
#[must_use]
pub fn char_display_width(ch: char) -> u8 {
    UnicodeWidthChar::width(ch).unwrap_or(1).max(1).min(2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_char_is_width_one() {
        assert_eq!(Cell::new('a', Style::default()).width, 1);
    }

    #[test]
    fn wide_char_is_width_two() {
        // A CJK ideograph.
        assert_eq!(Cell::new('漢', Style::default()).width, 2);
    }

    #[test]
    fn continuation_cell_has_zero_width() {
        let c = Cell::continuation_of(Style::default());
        assert_eq!(c.width, 0);
        assert!(c.continuation);
    }
}
