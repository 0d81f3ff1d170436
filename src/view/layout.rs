// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Flexbox-like container views: [`VStack`] and [`HStack`] lay children out
//! along one axis with optional flex weights, a fixed gap between
//! neighbors, inset padding, and cross-axis alignment; [`ZStack`] layers
//! children on top of one another within a padded inset.

use crate::frame::RenderFrame;
use crate::geometry::Rect;
use crate::registry::InteractiveRegistry;
use crate::view::traits::View;

/// A child slot in a [`VStack`] or [`HStack`]: either a fixed size taken
/// from the child's own measurement, or a flex share of whatever space is
/// left after every fixed child has been measured.
pub struct Child {
    view: Box<dyn View>,
    flex: u16,
}

impl Child {
    #[must_use]
    pub fn fixed(view: impl View + 'static) -> Self { Self { view: Box::new(view), flex: 0 } }

    #[must_use]
    pub fn flex(view: impl View + 'static, weight: u16) -> Self { Self { view: Box::new(view), flex: weight.max(1) } }
}

/// Inset space reserved on each side of a container before its children are
/// laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Padding {
    #[must_use]
    pub fn all(n: u16) -> Self { Self { top: n, right: n, bottom: n, left: n } }

    #[must_use]
    pub fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self { top: vertical, bottom: vertical, left: horizontal, right: horizontal }
    }

    fn horizontal(self) -> u16 { self.left.saturating_add(self.right) }

    fn vertical(self) -> u16 { self.top.saturating_add(self.bottom) }
}

/// Where a child sits across a container's cross axis when it measures
/// smaller than the space available to it: the column a `VStack` child sits
/// in, or the row an `HStack` child sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    fn offset(self, available: u16, needed: u16) -> u16 {
        if needed >= available {
            return 0;
        }
        match self {
            Align::Start => 0,
            Align::Center => (available - needed) / 2,
            Align::End => available - needed,
        }
    }
}

/// Distribute `available` units among `weights`, giving the last nonzero
/// weight the remainder so the parts always sum to exactly `available`.
fn distribute(available: u16, weights: &[u16]) -> Vec<u16> {
    let total: u32 = weights.iter().map(|w| u32::from(*w)).sum();
    if total == 0 {
        return vec![0; weights.len()];
    }
    let mut shares: Vec<u16> = weights
        .iter()
        .map(|w| (u32::from(available) * u32::from(*w) / total) as u16)
        .collect();
    let used: u32 = shares.iter().map(|s| u32::from(*s)).sum();
    let mut remainder = u32::from(available).saturating_sub(used);
    for (share, weight) in shares.iter_mut().zip(weights).rev() {
        if remainder == 0 {
            break;
        }
        if *weight > 0 {
            *share += 1;
            remainder -= 1;
        }
    }
    shares
}

/// Lays children out top to bottom. Non-flex children get exactly the
/// height they report from [`View::size`]; the remaining vertical space is
/// split among flex children proportionally to their weight. `gap` inserts
/// fixed space between consecutive children; `padding` insets the whole
/// stack; `align` positions each child horizontally within the stack's
/// width when that child measures narrower than it.
#[derive(Default)]
pub struct VStack {
    children: Vec<Child>,
    gap: u16,
    padding: Padding,
    align: Align,
}

impl VStack {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn child(mut self, child: Child) -> Self { self.children.push(child); self }

    #[must_use]
    pub fn gap(mut self, gap: u16) -> Self { self.gap = gap; self }

    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self { self.padding = padding; self }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self { self.align = align; self }

    fn total_gap(&self) -> u16 {
        if self.children.len() > 1 { self.gap.saturating_mul((self.children.len() - 1) as u16) } else { 0 }
    }
}

impl View for VStack {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        let inner_width = max_width.saturating_sub(self.padding.horizontal());
        let inner_height = max_height.saturating_sub(self.padding.vertical());
        let mut width = 0u16;
        let mut height = self.total_gap();
        let mut has_flex = false;
        for child in &self.children {
            if child.flex > 0 {
                has_flex = true;
                continue;
            }
            let (w, h) = child.view.size(inner_width, inner_height.saturating_sub(height));
            width = width.max(w);
            height = height.saturating_add(h).min(inner_height);
        }
        if has_flex {
            height = inner_height;
        }
        (width.saturating_add(self.padding.horizontal()), height.saturating_add(self.padding.vertical()))
    }

    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry) {
        let (frame_width, frame_height) = frame.size();
        let inset = Rect::new(
            self.padding.left.min(frame_width),
            self.padding.top.min(frame_height),
            frame_width.saturating_sub(self.padding.horizontal()),
            frame_height.saturating_sub(self.padding.vertical()),
        );
        let mut inner = frame.sub_frame(inset);
        let (max_width, max_height) = inner.size();

        let gaps = self.total_gap();
        let mut fixed_heights = vec![0u16; self.children.len()];
        let mut weights = vec![0u16; self.children.len()];
        let mut used = gaps;
        for (i, child) in self.children.iter().enumerate() {
            if child.flex == 0 {
                let (_, h) = child.view.size(max_width, max_height.saturating_sub(used));
                fixed_heights[i] = h;
                used = used.saturating_add(h);
            } else {
                weights[i] = child.flex;
            }
        }
        let leftover = max_height.saturating_sub(used);
        let flex_shares = distribute(leftover, &weights);

        let mut y = 0u16;
        for (i, child) in self.children.iter().enumerate() {
            let height = if child.flex == 0 { fixed_heights[i] } else { flex_shares[i] };
            if height == 0 || y >= max_height {
                continue;
            }
            let (child_width, _) = child.view.size(max_width, height);
            let x = self.align.offset(max_width, child_width);
            let mut sub = inner.sub_frame(Rect::new(x, y, max_width.saturating_sub(x), height));
            child.view.render(&mut sub, registry);
            y = y.saturating_add(height).saturating_add(self.gap);
        }
    }
}

/// Lays children out left to right, mirroring [`VStack`] on the horizontal
/// axis.
#[derive(Default)]
pub struct HStack {
    children: Vec<Child>,
    gap: u16,
    padding: Padding,
    align: Align,
}

impl HStack {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn child(mut self, child: Child) -> Self { self.children.push(child); self }

    #[must_use]
    pub fn gap(mut self, gap: u16) -> Self { self.gap = gap; self }

    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self { self.padding = padding; self }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self { self.align = align; self }

    fn total_gap(&self) -> u16 {
        if self.children.len() > 1 { self.gap.saturating_mul((self.children.len() - 1) as u16) } else { 0 }
    }
}

impl View for HStack {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        let inner_width = max_width.saturating_sub(self.padding.horizontal());
        let inner_height = max_height.saturating_sub(self.padding.vertical());
        let mut width = self.total_gap();
        let mut height = 0u16;
        let mut has_flex = false;
        for child in &self.children {
            if child.flex > 0 {
                has_flex = true;
                continue;
            }
            let (w, h) = child.view.size(inner_width.saturating_sub(width), inner_height);
            height = height.max(h);
            width = width.saturating_add(w).min(inner_width);
        }
        if has_flex {
            width = inner_width;
        }
        (width.saturating_add(self.padding.horizontal()), height.saturating_add(self.padding.vertical()))
    }

    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry) {
        let (frame_width, frame_height) = frame.size();
        let inset = Rect::new(
            self.padding.left.min(frame_width),
            self.padding.top.min(frame_height),
            frame_width.saturating_sub(self.padding.horizontal()),
            frame_height.saturating_sub(self.padding.vertical()),
        );
        let mut inner = frame.sub_frame(inset);
        let (max_width, max_height) = inner.size();

        let gaps = self.total_gap();
        let mut fixed_widths = vec![0u16; self.children.len()];
        let mut weights = vec![0u16; self.children.len()];
        let mut used = gaps;
        for (i, child) in self.children.iter().enumerate() {
            if child.flex == 0 {
                let (w, _) = child.view.size(max_width.saturating_sub(used), max_height);
                fixed_widths[i] = w;
                used = used.saturating_add(w);
            } else {
                weights[i] = child.flex;
            }
        }
        let leftover = max_width.saturating_sub(used);
        let flex_shares = distribute(leftover, &weights);

        let mut x = 0u16;
        for (i, child) in self.children.iter().enumerate() {
            let width = if child.flex == 0 { fixed_widths[i] } else { flex_shares[i] };
            if width == 0 || x >= max_width {
                continue;
            }
            let (_, child_height) = child.view.size(width, max_height);
            let y = self.align.offset(max_height, child_height);
            let mut sub = inner.sub_frame(Rect::new(x, y, width, max_height.saturating_sub(y)));
            child.view.render(&mut sub, registry);
            x = x.saturating_add(width).saturating_add(self.gap);
        }
    }
}

/// Layers children on top of one another within a padded inset. Rendered in
/// registration order, so a later child — and any interactive region it
/// registers — visually and logically sits above earlier ones.
#[derive(Default)]
pub struct ZStack {
    children: Vec<Box<dyn View>>,
    padding: Padding,
}

impl ZStack {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn child(mut self, view: impl View + 'static) -> Self { self.children.push(Box::new(view)); self }

    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self { self.padding = padding; self }
}

impl View for ZStack {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) {
        let inner_width = max_width.saturating_sub(self.padding.horizontal());
        let inner_height = max_height.saturating_sub(self.padding.vertical());
        let (w, h) = self.children.iter().fold((0, 0), |(w, h), child| {
            let (cw, ch) = child.size(inner_width, inner_height);
            (w.max(cw), h.max(ch))
        });
        (w.saturating_add(self.padding.horizontal()), h.saturating_add(self.padding.vertical()))
    }

    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry) {
        let (frame_width, frame_height) = frame.size();
        let inset = Rect::new(
            self.padding.left.min(frame_width),
            self.padding.top.min(frame_height),
            frame_width.saturating_sub(self.padding.horizontal()),
            frame_height.saturating_sub(self.padding.vertical()),
        );
        let mut inner = frame.sub_frame(inset);
        let (max_width, max_height) = inner.size();
        for child in &self.children {
            let mut sub = inner.sub_frame(Rect::new(0, 0, max_width, max_height));
            child.render(&mut sub, registry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OffscreenBuffer;
    use crate::style::Style;
    use crate::view::text::Text;

    #[test]
    fn distribute_gives_remainder_to_last_weighted_child() {
        let shares = distribute(10, &[1, 1, 1]);
        assert_eq!(shares.iter().sum::<u16>(), 10);
    }

    #[test]
    fn vstack_fixed_children_stack_by_natural_height() {
        let stack = VStack::new()
            .child(Child::fixed(Text::new("a", Style::default())))
            .child(Child::fixed(Text::new("b", Style::default())));
        let (_, h) = stack.size(10, 10);
        assert_eq!(h, 2);
    }

    #[test]
    fn vstack_flex_child_fills_leftover_space() {
        let stack = VStack::new()
            .child(Child::fixed(Text::new("a", Style::default())))
            .child(Child::flex(Text::new("b", Style::default()), 1));
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 5));
        let registry = InteractiveRegistry::new();
        stack.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, 'a');
        assert_eq!(buf.back_cell(0, 1).unwrap().ch, 'b');
    }

    #[test]
    fn vstack_gap_inserts_blank_rows_between_children() {
        let stack = VStack::new()
            .gap(1)
            .child(Child::fixed(Text::new("a", Style::default())))
            .child(Child::fixed(Text::new("b", Style::default())));
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 5));
        let registry = InteractiveRegistry::new();
        stack.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, 'a');
        assert_eq!(buf.back_cell(0, 1).unwrap().ch, ' ');
        assert_eq!(buf.back_cell(0, 2).unwrap().ch, 'b');
    }

    #[test]
    fn vstack_padding_insets_every_side() {
        let stack = VStack::new().padding(Padding::all(1)).child(Child::fixed(Text::new("a", Style::default())));
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 5));
        let registry = InteractiveRegistry::new();
        stack.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, ' ');
        assert_eq!(buf.back_cell(1, 1).unwrap().ch, 'a');
    }

    #[test]
    fn hstack_end_align_pushes_short_child_to_the_bottom_row() {
        let stack = HStack::new().align(Align::End).child(Child::fixed(Text::new("a", Style::default())));
        let mut buf = OffscreenBuffer::new(5, 3);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 3));
        let registry = InteractiveRegistry::new();
        stack.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 2).unwrap().ch, 'a');
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn zstack_renders_children_in_order_later_on_top() {
        let stack = ZStack::new().child(Text::new("a", Style::default())).child(Text::new("b", Style::default()));
        let mut buf = OffscreenBuffer::new(5, 5);
        let mut frame = RenderFrame::new(&mut buf, Rect::new(0, 0, 5, 5));
        let registry = InteractiveRegistry::new();
        stack.render(&mut frame, &registry);
        assert_eq!(buf.back_cell(0, 0).unwrap().ch, 'b');
    }
}
