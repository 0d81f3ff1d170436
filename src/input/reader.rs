// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The stdin reader thread: polls the terminal's file descriptor via `mio`
//! and feeds whatever arrives to a [`Decoder`], forwarding decoded events to
//! the runtime loop.
//!
//! A lone pending `ESC` changes how the next `poll` call is made: instead
//! of blocking indefinitely, it blocks for a short bounded window. If
//! nothing arrives in that window, the byte is resolved as a standalone
//! `Escape` key. If the rest of a sequence is already queued up (the usual
//! case — a terminal emits an entire escape sequence in one write), `poll`
//! returns immediately with data and the wait never actually elapses.

use std::io::Read;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;
use crate::input::Decoder;

const STDIN_TOKEN: Token = Token(0);
const ESCAPE_WAIT: Duration = Duration::from_millis(35);

/// Spawn the reader thread. Returns once the poller is registered; the
/// thread runs until stdin closes or `sender`'s receiver is dropped.
pub fn spawn_input_reader(sender: UnboundedSender<Event>) -> std::io::Result<()> {
    let mut poll = Poll::new()?;
    let stdin_fd = std::io::stdin().as_raw_fd();
    let mut source = SourceFd(&stdin_fd);
    poll.registry().register(&mut source, STDIN_TOKEN, Interest::READABLE)?;

    std::thread::Builder::new().name("input-reader".into()).spawn(move || {
        let _span = tracing::info_span!("input-reader").entered();
        let mut decoder = Decoder::new();
        let mut events = Events::with_capacity(8);
        let mut buf = [0u8; 1024];
        let mut stdin = std::io::stdin();

        loop {
            let timeout = decoder.has_pending_escape().then_some(ESCAPE_WAIT);
            if poll.poll(&mut events, timeout).is_err() {
                continue;
            }
            if events.is_empty() {
                if let Some(event) = decoder.resolve_pending() {
                    if sender.send(event).is_err() {
                        return;
                    }
                }
                continue;
            }
            match stdin.read(&mut buf) {
                Ok(0) => {
                    if let Some(event) = decoder.flush_pending_paste() {
                        let _ = sender.send(event);
                    }
                    let _ = sender.send(Event::Quit);
                    return;
                }
                Ok(n) => {
                    for event in decoder.feed(&buf[..n]) {
                        if sender.send(event).is_err() {
                            return;
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(_) => return,
            }
        }
    })?;
    Ok(())
}
