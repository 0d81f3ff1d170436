// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The render frame: a [`View`](crate::view::traits::View)'s window onto the
//! shared [`OffscreenBuffer`], clipped and translated so a view only ever
//! addresses its own local coordinate space.

use crate::geometry::{Pos, Rect};
use crate::grid::OffscreenBuffer;
use crate::style::{LinkId, Style};

/// A clipped, translated handle onto the back buffer. Every coordinate a
/// [`View`](crate::view::traits::View) writes through a `RenderFrame` is
/// local to that view's own bounds; the frame translates into absolute grid
/// coordinates and silently drops anything outside its clip rectangle.
pub struct RenderFrame<'a> {
    buffer: &'a mut OffscreenBuffer,
    /// Absolute bounds, in grid coordinates, this frame is allowed to touch.
    bounds: Rect,
}

impl<'a> RenderFrame<'a> {
    #[must_use]
    pub fn new(buffer: &'a mut OffscreenBuffer, bounds: Rect) -> Self {
        Self { buffer, bounds }
    }

    /// Bounds of this frame, in the coordinate space its caller addressed
    /// it with — i.e. with the origin already subtracted out, so a view
    /// always sees `(0, 0, width, height)`.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.bounds.width(), self.bounds.height())
    }

    fn to_absolute(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        let abs_x = self.bounds.x().checked_add(x)?;
        let abs_y = self.bounds.y().checked_add(y)?;
        (abs_x < self.bounds.right() && abs_y < self.bounds.bottom()).then_some((abs_x, abs_y))
    }

    /// Write a single glyph at local `(x, y)`. Out-of-bounds writes (negative
    /// in effect, since coordinates are unsigned, or past this frame's clip
    /// rectangle) are silently dropped.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some((ax, ay)) = self.to_absolute(x, y) {
            self.buffer.set_cell(ax, ay, ch, style);
        }
    }

    /// Fill a local rectangle with a repeated glyph, clipped to this frame.
    pub fn fill_styled(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: Style) {
        let clipped_w = w.min(self.bounds.width().saturating_sub(x));
        let clipped_h = h.min(self.bounds.height().saturating_sub(y));
        if clipped_w == 0 || clipped_h == 0 {
            return;
        }
        if let Some((ax, ay)) = self.to_absolute(x, y) {
            self.buffer.fill_styled(ax, ay, clipped_w, clipped_h, ch, style);
        }
    }

    /// Print a string starting at local `(x, y)`, advancing by each
    /// character's display width and stopping at the frame's right edge.
    /// Characters that would straddle the edge are dropped, not truncated
    /// mid-glyph.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let mut col = x;
        for ch in text.chars() {
            let w = u16::from(crate::grid::cell::char_display_width(ch));
            if col.saturating_add(w) > self.bounds.width() {
                break;
            }
            self.set_cell(col, y, ch, style);
            col += w;
        }
    }

    /// Print a string, appending `…` if it would otherwise overflow
    /// `max_width` columns.
    pub fn print_truncated(&mut self, x: u16, y: u16, text: &str, max_width: u16, style: Style) {
        let full_width: u16 = text
            .chars()
            .map(|c| u16::from(crate::grid::cell::char_display_width(c)))
            .sum();
        if full_width <= max_width {
            self.print(x, y, text, style);
            return;
        }
        let budget = max_width.saturating_sub(1);
        let mut col = x;
        let mut used = 0u16;
        for ch in text.chars() {
            let w = u16::from(crate::grid::cell::char_display_width(ch));
            if used + w > budget {
                break;
            }
            self.set_cell(col, y, ch, style);
            col += w;
            used += w;
        }
        self.set_cell(col, y, '\u{2026}', style);
    }

    /// Intern `url` in the underlying buffer's hyperlink table.
    pub fn intern_link(&mut self, url: &str) -> LinkId {
        self.buffer.intern_link(url)
    }

    /// Print `text` at local `(x, y)` wrapped in an OSC 8 hyperlink to
    /// `url`, used by [`crate::view::widgets::Link`].
    pub fn print_linked(&mut self, x: u16, y: u16, text: &str, style: Style, url: &str) {
        let id = self.intern_link(url);
        self.print(x, y, text, Style { link: Some(id), ..style });
    }

    /// Carve out a child frame clipped to `rect` (local to this frame) and
    /// further clipped to this frame's own bounds, so a nested view can
    /// never draw outside its parent's area regardless of the size it
    /// reports from `size()`.
    #[must_use]
    pub fn sub_frame(&mut self, rect: Rect) -> RenderFrame<'_> {
        let absolute = Rect::new(
            self.bounds.x().saturating_add(rect.x()),
            self.bounds.y().saturating_add(rect.y()),
            rect.width(),
            rect.height(),
        );
        let clipped = absolute.intersect(&self.bounds);
        RenderFrame { buffer: self.buffer, bounds: clipped }
    }

    /// The absolute rectangle this frame ultimately writes into, used by the
    /// interactive registry to record click targets in grid coordinates.
    #[must_use]
    pub fn absolute_bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn absolute_origin(&self) -> Pos {
        self.bounds.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cell_clips_to_sub_frame() {
        let mut buf = OffscreenBuffer::new(10, 10);
        let mut root = RenderFrame::new(&mut buf, Rect::new(0, 0, 10, 10));
        let mut child = root.sub_frame(Rect::new(2, 2, 3, 3));
        child.set_cell(0, 0, 'a', Style::default());
        child.set_cell(5, 5, 'b', Style::default());
        assert_eq!(buf.back_cell(2, 2).unwrap().ch, 'a');
        assert_eq!(buf.back_cell(7, 7), Some(crate::grid::Cell::empty()));
    }

    #[test]
    fn print_truncated_adds_ellipsis() {
        let mut buf = OffscreenBuffer::new(5, 1);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 1));
        frame.print_truncated(0, 0, "HELLOWORLD", 5, Style::default());
        let rendered: String = (0..5).map(|x| buf.back_cell(x, 0).unwrap().ch).collect();
        assert_eq!(rendered, "HELL\u{2026}");
    }

    #[test]
    fn sub_frame_clips_to_parent_bounds() {
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut root = RenderFrame::new(&mut buf, Rect::new(0, 0, 3, 3));
        let child = root.sub_frame(Rect::new(1, 1, 10, 10));
        assert_eq!(child.absolute_bounds(), Rect::new(1, 1, 2, 2));
    }
}
