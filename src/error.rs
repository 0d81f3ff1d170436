// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Error taxonomy for the rendering substrate, decoder, and runtime.
//!
//! Geometry errors (out-of-bounds draws, empty rectangles, wide-glyph
//! clipping) are deliberately *not* represented here: they are silent
//! no-ops, so there is no variant for them. Everything else in the
//! taxonomy gets a [`TermError`] variant.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the rendering substrate, the input decoder, and the
/// runtime's command executor.
#[derive(Debug, Error, Diagnostic)]
pub enum TermError {
    /// I/O failure writing to or reading from the terminal.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Raw mode or alternate-screen setup/teardown failed.
    #[error("raw mode error: {0}")]
    RawMode(String),

    /// The input decoder hit a condition it could not recover from locally
    /// (malformed sequences are otherwise dropped silently).
    #[error("decode error: {0}")]
    Decode(String),

    /// A command thunk panicked; the executor recovered it and converts it
    /// to an [`crate::event::Event::Error`] for `HandleEvent` to see.
    #[error("command panicked: {0}")]
    Command(String),

    /// Recording or playback of an asciinema-format session failed.
    #[error("recording error: {0}")]
    Recording(String),

    /// The driver already recorded a fatal error on a previous operation;
    /// this call short-circuited without touching the terminal. Carries the
    /// original error's message rather than the error itself, since the
    /// sticky flag has to be `Clone` to hand a copy to every task sharing
    /// the driver.
    #[error("driver already failed: {0}")]
    Poisoned(String),
}

pub type Result<T> = std::result::Result<T, TermError>;
