// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Decoded input event types: keys, mouse actions, and the modifier sets
//! that ride along with them.

use crate::geometry::Pos;

/// A single logical key, independent of how many bytes its encoding took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

/// Modifier keys held down during a key or mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// The Super/Cmd/Windows key, reported by CSI modifier bit 8.
    pub super_key: bool,
}

impl KeyModifiers {
    #[must_use]
    pub fn none(&self) -> bool { !self.shift && !self.ctrl && !self.alt && !self.super_key }
}

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    #[must_use]
    pub fn new(key: Key, modifiers: KeyModifiers) -> Self { Self { key, modifiers } }

    #[must_use]
    pub fn plain(key: Key) -> Self { Self { key, modifiers: KeyModifiers::default() } }
}

/// Which mouse button (or wheel direction) an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    /// Reported during a drag with no button currently held (SGR motion
    /// reports button 35 this way).
    None,
}

/// The kind of mouse action a [`MouseEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    Press,
    Release,
    /// Press and release on the same interactive region with no drag in
    /// between; synthesized by the runtime loop, never produced by the
    /// decoder directly.
    Click,
    Drag,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub button: MouseButton,
    pub pos: Pos,
    pub modifiers: KeyModifiers,
    /// The interactive region id this position hit-tested to, filled in by
    /// the runtime loop against the current frame's
    /// [`crate::registry::InteractiveRegistry`]. `None` until the loop has
    /// had a chance to do that lookup, e.g. on an event fresh off the
    /// decoder.
    pub region: Option<u64>,
}
