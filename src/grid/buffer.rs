// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The double-buffered cell grid: a `front` buffer holding the image
//! currently on the terminal and a `back` buffer holding the image being
//! composed.

use std::collections::HashMap;

use crate::grid::{cell::char_display_width, Cell, DirtyRegion};
use crate::style::{LinkId, Style};

/// A single WxH grid of [`Cell`]s, stored row-major.
#[derive(Debug, Clone)]
struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(width: u16, height: u16) -> Self {
        let cells = vec![Cell::empty(); usize::from(width) * usize::from(height)];
        Self { width, height, cells }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    fn get(&self, x: u16, y: u16) -> Cell {
        self.cells[self.index(x, y)]
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let i = self.index(x, y);
        self.cells[i] = cell;
    }

    /// Resize in place, preserving the content of the overlapping region and
    /// space-filling any newly exposed cells with an empty-style space.
    fn resize(&mut self, new_width: u16, new_height: u16) {
        let mut next = Grid::new(new_width, new_height);
        let copy_w = self.width.min(new_width);
        let copy_h = self.height.min(new_height);
        for y in 0..copy_h {
            for x in 0..copy_w {
                next.set(x, y, self.get(x, y));
            }
        }
        *self = next;
    }
}

/// The double buffer a [`crate::terminal::driver::TerminalDriver`] draws
/// into: a `back` grid under active composition and a `front` grid mirroring
/// what is actually on the terminal screen.
#[derive(Debug, Clone)]
pub struct OffscreenBuffer {
    front: Grid,
    back: Grid,
    dirty: DirtyRegion,
    links: Vec<Box<str>>,
    link_lookup: HashMap<Box<str>, LinkId>,
}

impl OffscreenBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            front: Grid::new(width, height),
            back: Grid::new(width, height),
            dirty: DirtyRegion::new(),
            links: Vec::new(),
            link_lookup: HashMap::new(),
        }
    }

    /// Intern `url` into this buffer's hyperlink table, returning a stable
    /// [`LinkId`] that a [`Style`] can carry. Repeated interning of the same
    /// URL returns the same id, so two cells in the same OSC 8 link still
    /// compare equal across frames and the diff writer doesn't needlessly
    /// reopen the link.
    pub fn intern_link(&mut self, url: &str) -> LinkId {
        if let Some(&id) = self.link_lookup.get(url) {
            return id;
        }
        let id = LinkId(self.links.len() as u32);
        self.links.push(url.into());
        self.link_lookup.insert(url.into(), id);
        id
    }

    #[must_use]
    pub fn link_url(&self, id: LinkId) -> &str {
        &self.links[id.0 as usize]
    }

    #[must_use]
    pub fn width(&self) -> u16 { self.back.width }
    #[must_use]
    pub fn height(&self) -> u16 { self.back.height }

    /// Resize both buffers, preserving overlapping content independently in
    /// each.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.front.resize(width, height);
        self.back.resize(width, height);
    }

    #[must_use]
    pub fn front_cell(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.front.width && y < self.front.height).then(|| self.front.get(x, y))
    }

    #[must_use]
    pub fn back_cell(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.back.width && y < self.back.height).then(|| self.back.get(x, y))
    }

    #[must_use]
    pub fn dirty(&self) -> &DirtyRegion { &self.dirty }

    fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.back.width && y < self.back.height
    }

    /// If the cell currently at `(x, y)` in the back buffer is half of a
    /// wide pair, blank its partner — it is about to be orphaned by a write
    /// to this position.
    fn break_wide_pair_at(&mut self, x: u16, y: u16) {
        let cell = self.back.get(x, y);
        if cell.continuation && x > 0 {
            self.back.set(x - 1, y, Cell::empty());
            self.dirty.mark(x - 1, y);
        } else if cell.is_wide() && x + 1 < self.back.width {
            self.back.set(x + 1, y, Cell::empty());
            self.dirty.mark(x + 1, y);
        }
    }

    /// Write a single (possibly wide) character at `(x, y)` in the back
    /// buffer. Fails silently if `(x, y)` is outside the buffer. A width-2
    /// character that would spill past the right edge is clipped: the cell
    /// at `(x, y)` is left untouched.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if !self.in_bounds(x, y) {
            return;
        }
        let width = char_display_width(ch);
        if width == 2 && x + 1 >= self.back.width {
            return;
        }
        self.break_wide_pair_at(x, y);
        if width == 2 {
            self.break_wide_pair_at(x + 1, y);
            self.back.set(x, y, Cell { ch, style, width: 2, continuation: false });
            self.back.set(x + 1, y, Cell::continuation_of(style));
            self.dirty.mark_rect(x, y, 2, 1);
        } else {
            self.back.set(x, y, Cell::new(ch, style));
            self.dirty.mark(x, y);
        }
    }

    /// Fill a rectangle with a repeated (narrow) glyph and style. A zero
    /// width or height is a no-op.
    pub fn fill_styled(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        if w == 0 || h == 0 {
            return;
        }
        for row in y..y.saturating_add(h).min(self.back.height) {
            for col in x..x.saturating_add(w).min(self.back.width) {
                self.set_cell(col, row, ch, style);
            }
        }
    }

    /// Copy the dirty region of the back buffer into the front buffer and
    /// clear the dirty flag. Called by
    /// [`crate::terminal::driver::TerminalDriver::end_frame`] after the
    /// diff has been flushed to the terminal, so the front buffer always
    /// mirrors what the terminal actually displays.
    pub fn commit(&mut self) {
        if let Some((x0, y0, x1, y1)) = self.dirty.bounds() {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let cell = self.back.get(x, y);
                    self.front.set(x, y, cell);
                }
            }
        }
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cell_out_of_bounds_is_noop() {
        let mut buf = OffscreenBuffer::new(5, 5);
        buf.set_cell(10, 10, 'x', Style::default());
        assert!(!buf.dirty().is_dirty());
    }

    #[test]
    fn wide_glyph_at_last_column_clips() {
        let mut buf = OffscreenBuffer::new(3, 1);
        buf.set_cell(2, 0, '漢', Style::default());
        assert!(!buf.dirty().is_dirty());
        assert_eq!(buf.back_cell(2, 0).unwrap().ch, ' ');
    }

    #[test]
    fn overwriting_wide_left_half_blanks_right() {
        let mut buf = OffscreenBuffer::new(5, 1);
        buf.set_cell(0, 0, '漢', Style::default());
        buf.set_cell(0, 0, 'x', Style::default());
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, 'x');
        assert_eq!(buf.back_cell(1, 0).unwrap().ch, ' ');
        assert_eq!(buf.back_cell(1, 0).unwrap().width, 1);
    }

    #[test]
    fn overwriting_continuation_blanks_left_half() {
        let mut buf = OffscreenBuffer::new(5, 1);
        buf.set_cell(0, 0, '漢', Style::default());
        buf.set_cell(1, 0, 'y', Style::default());
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, ' ');
        assert_eq!(buf.back_cell(1, 0).unwrap().ch, 'y');
    }

    #[test]
    fn resize_preserves_overlap_and_spaces_new_cells() {
        let mut buf = OffscreenBuffer::new(10, 3);
        for (i, ch) in "HELLO".chars().enumerate() {
            buf.set_cell(i as u16, 0, ch, Style::default());
        }
        buf.commit();
        buf.resize(5, 5);
        assert_eq!(buf.front_cell(0, 0).unwrap().ch, 'H');
        assert_eq!(buf.front_cell(4, 0).unwrap().ch, 'O');
        for x in 0..5 {
            assert_eq!(buf.front_cell(x, 4).unwrap().ch, ' ');
        }
    }

    #[test]
    fn commit_copies_only_dirty_region_then_clears() {
        let mut buf = OffscreenBuffer::new(5, 1);
        buf.set_cell(0, 0, 'a', Style::default());
        buf.commit();
        assert!(!buf.dirty().is_dirty());
        assert_eq!(buf.front_cell(0, 0).unwrap().ch, 'a');
    }
}
