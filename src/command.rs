// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Commands: the side-effectful half of the update cycle. `handle_event`
//! returns a [`Command`] describing work to run rather than running it
//! inline, keeping `View`/`HandleEvent` itself synchronous and
//! single-threaded.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::event::Event;

/// A boxed future that resolves to the [`Event`] it wants delivered back to
/// the application, run on the command executor task.
pub type Thunk = Pin<Box<dyn Future<Output = Event> + Send + 'static>>;

/// Work an [`Application`](crate::runtime::app::Application) asks the
/// runtime loop to perform outside of `handle_event`'s synchronous call.
pub enum Command {
    /// Do nothing.
    None,
    /// Run an async thunk; its result is delivered as a regular event on a
    /// future tick.
    Run(Thunk),
    /// Run several commands concurrently.
    Batch(Vec<Command>),
    /// Run several commands one after another, waiting for each to
    /// complete (including any events it produces being delivered) before
    /// starting the next.
    Sequence(Vec<Command>),
    /// Deliver `event` after `delay` with no other work.
    After(Duration, Event),
    /// Re-arm the runtime loop's periodic ticker to fire every `Duration`
    /// from now on, replacing whatever interval `RuntimeOptions` started it
    /// with.
    Tick(Duration),
    /// Tear down the terminal and exit the runtime loop.
    Quit,
}

impl Command {
    #[must_use]
    pub fn run<F>(fut: F) -> Command
    where
        F: Future<Output = Event> + Send + 'static,
    {
        Command::Run(Box::pin(fut))
    }

    #[must_use]
    pub fn batch(cmds: impl IntoIterator<Item = Command>) -> Command {
        Command::Batch(cmds.into_iter().collect())
    }

    #[must_use]
    pub fn sequence(cmds: impl IntoIterator<Item = Command>) -> Command {
        Command::Sequence(cmds.into_iter().collect())
    }

    #[must_use]
    pub fn is_noop(&self) -> bool { matches!(self, Command::None) }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => write!(f, "Command::None"),
            Command::Run(_) => write!(f, "Command::Run(..)"),
            Command::Batch(cmds) => f.debug_tuple("Command::Batch").field(cmds).finish(),
            Command::Sequence(cmds) => f.debug_tuple("Command::Sequence").field(cmds).finish(),
            Command::After(d, e) => f.debug_tuple("Command::After").field(d).field(e).finish(),
            Command::Tick(d) => f.debug_tuple("Command::Tick").field(d).finish(),
            Command::Quit => write!(f, "Command::Quit"),
        }
    }
}
