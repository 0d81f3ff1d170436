// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The interactive region registry: a per-frame table of clickable
//! rectangles the layout engine populates while rendering and the runtime
//! loop consults to route mouse clicks.

use std::sync::Mutex;

use crate::geometry::{Pos, Rect};

/// One clickable region registered during a render pass.
struct Region {
    bounds: Rect,
    id: u64,
}

/// Collects interactive regions for the frame currently being rendered.
/// Cleared at the start of every frame (spec: a region only exists for the
/// frame that registered it — stale regions from a previous layout never
/// receive clicks).
///
/// Registration order matters for overlapping regions: later registrations
/// are on top (rendered later, per `ZStack`'s top-to-bottom drawing order),
/// so [`InteractiveRegistry::hit_test`] scans in reverse, returning the
/// most recently registered region that contains the point.
#[derive(Default)]
pub struct InteractiveRegistry {
    regions: Mutex<Vec<Region>>,
}

impl InteractiveRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Discard all regions, called once per frame before the view tree
    /// renders.
    pub fn clear(&self) {
        self.regions.lock().expect("registry lock poisoned").clear();
    }

    /// Register a clickable rectangle (in absolute grid coordinates) for
    /// this frame, identified by `id` — typically a
    /// [`crate::view::widgets::Clickable`]'s index in its parent or a
    /// caller-assigned handle.
    pub fn register(&self, bounds: Rect, id: u64) {
        if bounds.is_empty() {
            return;
        }
        self.regions.lock().expect("registry lock poisoned").push(Region { bounds, id });
    }

    /// Find the topmost registered region containing `pos`, if any.
    #[must_use]
    pub fn hit_test(&self, pos: Pos) -> Option<u64> {
        self.regions
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .rev()
            .find(|r| r.bounds.contains(pos))
            .map(|r| r.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_prefers_most_recently_registered() {
        let registry = InteractiveRegistry::new();
        registry.register(Rect::new(0, 0, 10, 10), 1);
        registry.register(Rect::new(2, 2, 4, 4), 2);
        assert_eq!(registry.hit_test(Pos::new(3, 3)), Some(2));
        assert_eq!(registry.hit_test(Pos::new(8, 8)), Some(1));
        assert_eq!(registry.hit_test(Pos::new(20, 20)), None);
    }

    #[test]
    fn empty_bounds_are_never_registered() {
        let registry = InteractiveRegistry::new();
        registry.register(Rect::default(), 1);
        assert_eq!(registry.hit_test(Pos::new(0, 0)), None);
    }

    #[test]
    fn clear_removes_all_regions() {
        let registry = InteractiveRegistry::new();
        registry.register(Rect::new(0, 0, 5, 5), 1);
        registry.clear();
        assert_eq!(registry.hit_test(Pos::new(1, 1)), None);
    }
}
