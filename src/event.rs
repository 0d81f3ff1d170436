// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The event type the runtime loop delivers to
//! [`Application::handle_event`](crate::runtime::app::Application).

use std::time::Instant;

use crate::error::TermError;
use crate::geometry::{Pos, Size};
use crate::input::types::{KeyEvent, MouseEvent};

/// Everything an [`Application`](crate::runtime::app::Application) can
/// react to. A single `HandleEvent` call never sees more than one of these
/// at a time — batching multiple occurrences into one tick is the runtime
/// loop's job via [`Event::Batch`], not the application's.
#[derive(Debug, Clone)]
pub enum Event {
    /// A decoded keypress.
    Key(KeyEvent),
    /// A decoded mouse action.
    Mouse(MouseEvent),
    /// A pasted block of text, delivered whole once the terminal's
    /// bracketed-paste end marker arrives.
    Paste(String),
    /// The terminal's window size changed; carries the new size.
    Resize(Size),
    /// A periodic tick driven by the runtime loop's configured frame rate.
    /// `frame` counts ticks since the loop started (starting at 0); `time`
    /// is when this tick fired, so an application can measure elapsed time
    /// without keeping its own clock.
    Tick { frame: u64, time: Instant },
    /// A fatal error surfaced by the terminal driver, the decoder, or a
    /// command thunk. Applications that don't override handling of this
    /// variant cause the runtime loop to quit after delivering it.
    Error(TermError),
    /// Delivered once, immediately before the runtime loop tears down the
    /// terminal and returns.
    Quit,
    /// Several events that occurred since the last delivery, collapsed into
    /// one so the application can, for example, drop all but the last
    /// resize in a burst.
    Batch(Vec<Event>),
}

impl Event {
    /// Construct a synthetic mouse click event at `pos`, used by the
    /// runtime loop when a press and a release land on the same
    /// interactive region without an intervening drag. `region` is that
    /// region's id, so an `Application` can dispatch off it directly
    /// instead of re-deriving which [`crate::view::widgets::Clickable`] was
    /// hit from raw coordinates.
    #[must_use]
    pub fn synthetic_click(pos: Pos, button: crate::input::types::MouseButton, region: Option<u64>) -> Event {
        Event::Mouse(MouseEvent {
            kind: crate::input::types::MouseKind::Click,
            button,
            pos,
            modifiers: crate::input::types::KeyModifiers::default(),
            region,
        })
    }
}
