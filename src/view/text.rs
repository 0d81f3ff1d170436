// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! [`Text`]: the leaf view that prints a styled string.

use unicode_width::UnicodeWidthStr;

use crate::frame::RenderFrame;
use crate::registry::InteractiveRegistry;
use crate::style::{Color, Style};
use crate::view::traits::View;

/// A single line of styled text. Measures to its own display width (clamped
/// to whatever room the layout offers) and one row tall; wrapping is the
/// caller's job, not this view's.
#[derive(Debug, Clone)]
pub struct Text {
    content: String,
    style: Style,
}

impl Text {
    #[must_use]
    pub fn new(content: impl Into<String>, style: Style) -> Self { Self { content: content.into(), style } }

    #[must_use]
    pub fn bold(mut self) -> Self { self.style.attrs.bold = true; self }
    #[must_use]
    pub fn dim(mut self) -> Self { self.style.attrs.dim = true; self }
    #[must_use]
    pub fn italic(mut self) -> Self { self.style.attrs.italic = true; self }
    #[must_use]
    pub fn underline(mut self) -> Self { self.style.attrs.underline = true; self }
    #[must_use]
    pub fn fg(mut self, color: Color) -> Self { self.style.fg = color; self }
    #[must_use]
    pub fn bg(mut self, color: Color) -> Self { self.style.bg = color; self }
}

impl View for Text {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        if max_height == 0 {
            return (0, 0);
        }
        let width = UnicodeWidthStr::width(self.content.as_str()) as u16;
        (width.min(max_width), 1)
    }

    fn render(&self, frame: &mut RenderFrame<'_>, _registry: &InteractiveRegistry) {
        let (_, max_height) = frame.size();
        if max_height == 0 {
            return;
        }
        frame.print(0, 0, &self.content, self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::grid::OffscreenBuffer;

    #[test]
    fn size_clamps_to_max_width() {
        let text = Text::new("hello world", Style::default());
        assert_eq!(text.size(5, 1), (5, 1));
    }

    #[test]
    fn zero_height_yields_nothing() {
        let text = Text::new("hi", Style::default());
        assert_eq!(text.size(10, 0), (0, 0));
    }

    #[test]
    fn render_writes_glyphs_into_frame() {
        let text = Text::new("hi", Style::default());
        let mut buf = OffscreenBuffer::new(5, 1);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 1));
        let registry = InteractiveRegistry::new();
        text.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, 'h');
        assert_eq!(buf.back_cell(1, 0).unwrap().ch, 'i');
    }
}
