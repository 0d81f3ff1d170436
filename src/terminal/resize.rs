// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! `SIGWINCH` watcher: a dedicated OS thread polls for the terminal resize
//! signal via `mio` and `signal-hook-mio`, then re-queries the window size
//! and forwards a [`crate::event::Event::Resize`] to the runtime loop.
//!
//! This runs on its own thread rather than inside the tokio runtime because
//! `signal-hook`'s self-pipe needs a blocking `poll` loop, and parking a
//! tokio worker on it would starve other tasks on a single-threaded runtime.

use mio::{Events, Interest, Poll, Token};
use signal_hook::consts::SIGWINCH;
use signal_hook_mio::v1_0::Signals;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;
use crate::geometry::Size;

const SIGNAL_TOKEN: Token = Token(0);

/// Query the kernel for the controlling terminal's current size via
/// `TIOCGWINSZ`.
#[must_use]
pub fn current_size() -> Option<Size> {
    let stdout = std::io::stdout();
    rustix::termios::tcgetwinsize(&stdout)
        .ok()
        .map(|ws| Size::new(ws.ws_col, ws.ws_row))
}

/// Spawn the watcher thread. Returns once the signal handler is registered;
/// the thread runs until `sender`'s receiver is dropped.
pub fn spawn_resize_watcher(sender: UnboundedSender<Event>) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGWINCH])?;
    let mut poll = Poll::new()?;
    poll.registry().register(&mut signals, SIGNAL_TOKEN, Interest::READABLE)?;

    std::thread::Builder::new().name("resize-watcher".into()).spawn(move || {
        let _span = tracing::info_span!("resize-watcher").entered();
        let mut events = Events::with_capacity(4);
        loop {
            if poll.poll(&mut events, None).is_err() {
                continue;
            }
            for event in &events {
                if event.token() != SIGNAL_TOKEN {
                    continue;
                }
                for _ in signals.pending() {
                    if let Some(size) = current_size() {
                        if sender.send(Event::Resize(size)).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    })?;
    Ok(())
}
