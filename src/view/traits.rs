// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The view protocol: every renderable piece of UI implements [`View`].

use crate::frame::RenderFrame;
use crate::registry::InteractiveRegistry;

/// A single node in the view tree. `size` is a pure measurement — it must
/// not register interactive regions or otherwise have side effects, since
/// the layout engine may call it more than once while negotiating space
/// among siblings. `render` is where a view actually writes cells and
/// registers any clickable regions it owns.
pub trait View {
    /// Given the maximum space available, report how much of it this view
    /// actually wants. Must satisfy `width <= max_width && height <=
    /// max_height`.
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16);

    /// Draw into `frame`, whose bounds are exactly the space the layout
    /// engine allotted this view. Register any clickable regions with
    /// `registry`, using `frame.absolute_bounds()` (or a sub-rectangle of
    /// it) so hit-testing happens in grid coordinates.
    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry);
}

impl<T: View + ?Sized> View for Box<T> {
    fn size(&self, max_width: u16, max_height: u16) -> (u16, u16) { (**self).size(max_width, max_height) }
    fn render(&self, frame: &mut RenderFrame<'_>, registry: &InteractiveRegistry) { (**self).render(frame, registry) }
}
