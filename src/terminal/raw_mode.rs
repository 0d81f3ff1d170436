// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Raw terminal mode: disable line buffering, echo, and signal generation so
//! every byte typed reaches the decoder untouched.
//!
//! Entering raw mode is a global, process-wide change to the controlling
//! terminal's line discipline — it is not scoped to a file descriptor the
//! way a socket option would be. [`RawModeGuard`] exists so that whatever
//! happens (normal shutdown, an early return, a panic unwinding past it),
//! the terminal gets restored to cooked mode before the process gives control
//! back to the shell.

use std::sync::{LazyLock, Mutex};

use rustix::termios::{self, Termios};

use crate::error::{Result, TermError};

/// The terminal settings in effect before raw mode was entered, stashed so
/// [`disable_raw_mode`] can restore them exactly. A single slot is
/// sufficient: a process has exactly one controlling terminal, and raw mode
/// is never nested.
static SAVED: LazyLock<Mutex<Option<Termios>>> = LazyLock::new(|| Mutex::new(None));

/// Put the controlling terminal (stdin) into raw mode: canonical mode,
/// echo, and signal-generating control characters (`Ctrl-C`, `Ctrl-Z`, …)
/// are all disabled, and reads become unbuffered at one byte per `read(2)`.
pub fn enable_raw_mode() -> Result<()> {
    let stdin = std::io::stdin();
    let original = termios::tcgetattr(&stdin).map_err(|e| TermError::RawMode(e.to_string()))?;

    let mut raw = original.clone();
    raw.make_raw();

    termios::tcsetattr(&stdin, termios::OptionalActions::Flush, &raw)
        .map_err(|e| TermError::RawMode(e.to_string()))?;

    *SAVED.lock().expect("raw mode lock poisoned") = Some(original);
    Ok(())
}

/// Restore the terminal settings captured by [`enable_raw_mode`]. A no-op if
/// raw mode was never entered (or has already been disabled), so callers can
/// invoke it unconditionally during teardown.
pub fn disable_raw_mode() -> Result<()> {
    let mut slot = SAVED.lock().expect("raw mode lock poisoned");
    if let Some(original) = slot.take() {
        let stdin = std::io::stdin();
        termios::tcsetattr(&stdin, termios::OptionalActions::Flush, &original)
            .map_err(|e| TermError::RawMode(e.to_string()))?;
    }
    Ok(())
}

/// RAII guard that enables raw mode on construction and restores cooked
/// mode on drop, including on an unwinding panic.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::error!(error = %e, "failed to restore terminal mode");
        }
    }
}
