// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The built-in leaf and wrapper views beyond [`crate::view::text::Text`]
//! and the layout containers in [`crate::view::layout`].

use crate::frame::RenderFrame;
use crate::geometry::Rect;
use crate::registry::InteractiveRegistry;
use crate::style::Style;
use crate::view::traits::View;

/// Occupies no space and draws nothing. Useful as the inert branch of
/// [`if_view`] or [`switch`].
pub struct Empty;

impl View for Empty {
    fn size(&self, _max_width: u16, _max_height: u16) -> (u16, u16) { (0, 0) }
    fn render(&self, _frame: &mut RenderFrame<'_>, _registry: &InteractiveRegistry) {}
}

/// Consumes whatever space a layout container offers it; paired with
/// [`crate::view::layout::Child::flex`] to push siblings apart. Fills its
/// area with `style`'s background if given.
#[derive(Default)]
pub struct Spacer {
    style: Style,
}

impl Spacer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn styled(style: Style) -> Self { Self { style } }
}

impl View for Spacer {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) { (max_width, max_height) }

    fn render(&self, frame: &mut RenderFrame<'_>, _registry: &InteractiveRegistry) {
        let (w, h) = frame.size();
        if !self.style.is_empty() {
            frame.fill_styled(0, 0, w, h, ' ', self.style);
        }
    }
}

/// The box-drawing glyph set a [`Bordered`] view outlines its child with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Single,
    Double,
    Rounded,
    Thick,
}

struct BorderGlyphs {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

impl BorderStyle {
    fn glyphs(self) -> BorderGlyphs {
        match self {
            BorderStyle::Single => BorderGlyphs { top_left: '┌', top_right: '┐', bottom_left: '└', bottom_right: '┘', horizontal: '─', vertical: '│' },
            BorderStyle::Double => BorderGlyphs { top_left: '╔', top_right: '╗', bottom_left: '╚', bottom_right: '╝', horizontal: '═', vertical: '║' },
            BorderStyle::Rounded => BorderGlyphs { top_left: '╭', top_right: '╮', bottom_left: '╰', bottom_right: '╯', horizontal: '─', vertical: '│' },
            BorderStyle::Thick => BorderGlyphs { top_left: '┏', top_right: '┓', bottom_left: '┗', bottom_right: '┛', horizontal: '━', vertical: '┃' },
        }
    }
}

/// Draws a one-cell-thick border around `child`, shrinking its available
/// space by one cell on every side.
pub struct Bordered {
    child: Box<dyn View>,
    border: BorderStyle,
    style: Style,
}

impl Bordered {
    #[must_use]
    pub fn new(child: impl View + 'static, border: BorderStyle) -> Self {
        Self { child: Box::new(child), border, style: Style::default() }
    }

    #[must_use]
    pub fn styled(mut self, style: Style) -> Self { self.style = style; self }
}

impl View for Bordered {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        if max_width < 2 || max_height < 2 {
            return (max_width.min(2), max_height.min(2));
        }
        let (w, h) = self.child.size(max_width - 2, max_height - 2);
        (w + 2, h + 2)
    }

    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry) {
        let (w, h) = frame.size();
        if w < 2 || h < 2 {
            return;
        }
        let g = self.border.glyphs();
        frame.set_cell(0, 0, g.top_left, self.style);
        frame.set_cell(w - 1, 0, g.top_right, self.style);
        frame.set_cell(0, h - 1, g.bottom_left, self.style);
        frame.set_cell(w - 1, h - 1, g.bottom_right, self.style);
        for x in 1..w - 1 {
            frame.set_cell(x, 0, g.horizontal, self.style);
            frame.set_cell(x, h - 1, g.horizontal, self.style);
        }
        for y in 1..h - 1 {
            frame.set_cell(0, y, g.vertical, self.style);
            frame.set_cell(w - 1, y, g.vertical, self.style);
        }
        let mut inner = frame.sub_frame(Rect::new(1, 1, w - 2, h - 2));
        self.child.render(&mut inner, registry);
    }
}

/// Wraps `child`, registering its full rendered area as an interactive
/// region under `id`. The runtime loop's [`crate::registry::InteractiveRegistry`]
/// resolves a mouse click landing inside this area back to `id`.
pub struct Clickable {
    child: Box<dyn View>,
    id: u64,
}

impl Clickable {
    #[must_use]
    pub fn new(child: impl View + 'static, id: u64) -> Self { Self { child: Box::new(child), id } }
}

impl View for Clickable {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) { self.child.size(max_width, max_height) }

    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry) {
        registry.register(frame.absolute_bounds(), self.id);
        self.child.render(frame, registry);
    }
}

/// A single-line text field: renders its current `value`, with the cell at
/// `cursor` (a character index, clamped to `value`'s length) shown in
/// reverse video when `focused`. Editing is the application's job — this
/// view only displays state an `Application` owns and mutates in response
/// to `Key` events.
pub struct Input {
    value: String,
    cursor: usize,
    focused: bool,
    style: Style,
}

impl Input {
    #[must_use]
    pub fn new(value: impl Into<String>, cursor: usize, focused: bool) -> Self {
        Self { value: value.into(), cursor, focused, style: Style::default() }
    }

    #[must_use]
    pub fn styled(mut self, style: Style) -> Self { self.style = style; self }
}

impl View for Input {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        if max_height == 0 {
            return (0, 0);
        }
        (max_width, 1)
    }

    fn render(&self, frame: &mut RenderFrame<'_>, _registry: &InteractiveRegistry) {
        let (w, h) = frame.size();
        if h == 0 {
            return;
        }
        frame.fill_styled(0, 0, w, 1, ' ', self.style);
        frame.print(0, 0, &self.value, self.style);
        if self.focused {
            let chars: Vec<char> = self.value.chars().collect();
            let col = self.cursor.min(chars.len()) as u16;
            if col < w {
                let ch = chars.get(col as usize).copied().unwrap_or(' ');
                frame.set_cell(col, 0, ch, self.style.reverse());
            }
        }
    }
}

/// Escapes the view protocol's declarative model for a single leaf that
/// draws however the caller likes; `measure` and `draw` both receive the
/// space the layout engine has negotiated.
pub struct Canvas<M, D> {
    measure: M,
    draw: D,
}

impl<M, D> Canvas<M, D>
where
    M: Fn(u16, u16) -> (u16, u16),
    D: Fn(&mut RenderFrame<'_>),
{
    pub fn new(measure: M, draw: D) -> Self { Self { measure, draw } }
}

impl<M, D> View for Canvas<M, D>
where
    M: Fn(u16, u16) -> (u16, u16),
    D: Fn(&mut RenderFrame<'_>),
{
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) { (self.measure)(max_width, max_height) }
    fn render(&self, frame: &mut RenderFrame<'_>, _registry: &InteractiveRegistry) { (self.draw)(frame) }
}

/// Renders `url` as an OSC 8 hyperlink wrapping `content`. Terminals that
/// don't understand OSC 8 simply show the plain text.
pub struct Link {
    content: String,
    url: String,
    style: Style,
}

impl Link {
    #[must_use]
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self { content: content.into(), url: url.into(), style: Style::new().underline() }
    }

    #[must_use]
    pub fn styled(mut self, style: Style) -> Self { self.style = style; self }
}

impl View for Link {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        if max_height == 0 {
            return (0, 0);
        }
        let width = unicode_width::UnicodeWidthStr::width(self.content.as_str()) as u16;
        (width.min(max_width), 1)
    }

    fn render(&self, frame: &mut RenderFrame<'_>, _registry: &InteractiveRegistry) {
        if frame.size().1 == 0 {
            return;
        }
        frame.print_linked(0, 0, &self.content, self.style, &self.url);
    }
}

/// Renders `view` only when `condition` is true; otherwise occupies no
/// space.
#[must_use]
pub fn if_view(condition: bool, view: impl View + 'static) -> Box<dyn View> {
    if condition { Box::new(view) } else { Box::new(Empty) }
}

/// Renders `then_view` when `condition` is true, `else_view` otherwise.
#[must_use]
pub fn if_else(condition: bool, then_view: impl View + 'static, else_view: impl View + 'static) -> Box<dyn View> {
    if condition { Box::new(then_view) } else { Box::new(else_view) }
}

/// One arm of a [`switch`].
pub struct Case<T> {
    pub value: T,
    pub view: Box<dyn View>,
}

impl<T> Case<T> {
    pub fn new(value: T, view: impl View + 'static) -> Self { Self { value, view: Box::new(view) } }
}

/// Renders the first `case` whose value equals `tag`, falling back to
/// `default` if none match.
#[must_use]
pub fn switch<T: PartialEq>(tag: &T, cases: Vec<Case<T>>, default: impl View + 'static) -> Box<dyn View> {
    cases.into_iter().find(|c| &c.value == tag).map_or_else(|| Box::new(default) as Box<dyn View>, |c| c.view)
}

/// Builds a [`crate::view::layout::VStack`] with one child per item,
/// produced by `build`.
pub fn for_each<T>(items: impl IntoIterator<Item = T>, build: impl Fn(&T) -> Box<dyn View>) -> crate::view::layout::VStack {
    let mut stack = crate::view::layout::VStack::new();
    for item in items {
        stack = stack.child(crate::view::layout::Child::fixed(build(&item)));
    }
    stack
}

/// Builds a [`crate::view::layout::HStack`] with one child per item,
/// produced by `build`.
pub fn h_for_each<T>(items: impl IntoIterator<Item = T>, build: impl Fn(&T) -> Box<dyn View>) -> crate::view::layout::HStack {
    let mut stack = crate::view::layout::HStack::new();
    for item in items {
        stack = stack.child(crate::view::layout::Child::fixed(build(&item)));
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OffscreenBuffer;
    use crate::view::text::Text;

    #[test]
    fn bordered_shrinks_child_area_by_one_cell_each_side() {
        let bordered = Bordered::new(Text::new("hi", Style::default()), BorderStyle::Single);
        let (w, h) = bordered.size(10, 10);
        assert_eq!((w, h), (4, 3));
    }

    #[test]
    fn bordered_draws_corners() {
        let bordered = Bordered::new(Empty, BorderStyle::Single);
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 5));
        let registry = InteractiveRegistry::new();
        bordered.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, '┌');
        assert_eq!(buf.back_cell(4, 4).unwrap().ch, '┘');
    }

    #[test]
    fn clickable_registers_its_bounds() {
        let clickable = Clickable::new(Text::new("x", Style::default()), 42);
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(1, 1, 3, 3));
        let registry = InteractiveRegistry::new();
        clickable.render(&mut frame, &registry);
        assert_eq!(registry.hit_test(crate::geometry::Pos::new(2, 2)), Some(42));
    }

    #[test]
    fn input_shows_reverse_video_cursor_when_focused() {
        let input = Input::new("ab", 1, true);
        let mut buf = OffscreenBuffer::new(5, 1);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 1));
        let registry = InteractiveRegistry::new();
        input.render(&mut frame, &registry);
        assert!(buf.back_cell(1, 0).unwrap().style.attrs.reverse);
        assert!(!buf.back_cell(0, 0).unwrap().style.attrs.reverse);
    }

    #[test]
    fn switch_falls_back_to_default() {
        let view = switch(&3, vec![Case::new(1, Text::new("one", Style::default()))], Text::new("other", Style::default()));
        let mut buf = OffscreenBuffer::new(5, 1);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 1));
        let registry = InteractiveRegistry::new();
        view.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, 'o');
    }

    #[test]
    fn link_assigns_a_link_id_to_its_cells() {
        let link = Link::new("click", "https://example.com");
        let mut buf = OffscreenBuffer::new(10, 1);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 10, 1));
        let registry = InteractiveRegistry::new();
        link.render(&mut frame, &registry);
        let id = buf.back_cell(0, 0).unwrap().style.link.expect("link id");
        assert_eq!(buf.link_url(id), "https://example.com");
    }
}
