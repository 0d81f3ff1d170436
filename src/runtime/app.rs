// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The application contract the runtime loop drives.

use crate::command::Command;
use crate::event::Event;
use crate::view::View;

/// Implemented once per program. `view` and `handle_event` are never called
/// concurrently with each other or with themselves — the runtime loop
/// serializes every call onto a single task, so an `Application` never
/// needs interior synchronization of its own state.
pub trait Application {
    /// Build the view tree for the current state. Called once per frame,
    /// immediately before rendering.
    fn view(&self) -> Box<dyn View>;

    /// React to `event`, updating state and optionally returning a
    /// [`Command`] for the runtime loop to run. The default implementation
    /// ignores every event and does nothing.
    fn handle_event(&mut self, event: Event) -> Command {
        let _ = event;
        Command::None
    }
}
