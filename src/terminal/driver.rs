// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The terminal driver: owns the double buffer, the raw-mode guard, and the
//! write side of the frame transaction (`begin_frame` / `end_frame`).
//!
//! A driver is opened once per session. Once any operation sets the sticky
//! error flag, every subsequent call becomes a no-op that returns the same
//! error, so a runtime loop can keep calling into the driver during
//! shutdown without checking a result at every step.

use std::io::Write as _;
use std::sync::{Arc, Mutex as StdMutex};

use crate::error::{Result, TermError};
use crate::frame::RenderFrame;
use crate::geometry::{Rect, Size};
use crate::grid::OffscreenBuffer;
use crate::style::ColorSupport;
use crate::terminal::ansi;
use crate::terminal::raw_mode::RawModeGuard;

/// Terminal features a session negotiates once at [`TerminalDriver::open`]
/// and keeps for the lifetime of the driver.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeCapabilities {
    pub color_support: ColorSupport,
    pub alt_screen: bool,
    pub hide_cursor: bool,
    pub mouse_tracking: bool,
    pub bracketed_paste: bool,
}

impl Default for RuntimeCapabilities {
    fn default() -> Self {
        Self {
            color_support: ColorSupport::detect(),
            alt_screen: true,
            hide_cursor: true,
            mouse_tracking: false,
            bracketed_paste: true,
        }
    }
}

/// Owns the terminal for the session: the raw-mode guard, the alternate
/// screen, the double buffer, and the sticky error flag every fallible
/// operation checks and sets.
pub struct TerminalDriver {
    _raw_mode: RawModeGuard,
    buffer: OffscreenBuffer,
    caps: RuntimeCapabilities,
    sticky_error: Arc<StdMutex<Option<String>>>,
    stdout: std::io::Stdout,
}

impl TerminalDriver {
    /// Enable raw mode, enter the alternate screen (if requested), hide the
    /// cursor, and allocate a buffer sized to the terminal's current
    /// dimensions.
    pub fn open(caps: RuntimeCapabilities) -> Result<Self> {
        let raw_mode = RawModeGuard::new()?;
        let size = crate::terminal::resize::current_size().unwrap_or(Size::new(80, 24));

        let mut driver = Self {
            _raw_mode: raw_mode,
            buffer: OffscreenBuffer::new(size.width, size.height),
            caps,
            sticky_error: Arc::new(StdMutex::new(None)),
            stdout: std::io::stdout(),
        };

        let mut setup = String::new();
        if caps.alt_screen {
            setup.push_str(ansi::ENTER_ALT_SCREEN);
        }
        if caps.hide_cursor {
            setup.push_str(ansi::HIDE_CURSOR);
        }
        if caps.mouse_tracking {
            setup.push_str(ansi::ENABLE_MOUSE);
        }
        if caps.bracketed_paste {
            setup.push_str(ansi::ENABLE_BRACKETED_PASTE);
        }
        driver.write_raw(&setup)?;
        Ok(driver)
    }

    /// Reverse everything [`open`](Self::open) did: show the cursor, leave
    /// the alternate screen, disable mouse tracking and bracketed paste.
    /// Raw mode is restored separately when the guard drops. Safe to call
    /// even if the driver already recorded a sticky error — restoring the
    /// terminal takes priority over surfacing that error.
    pub fn restore(&mut self) -> Result<()> {
        let mut teardown = String::new();
        if self.caps.bracketed_paste {
            teardown.push_str(ansi::DISABLE_BRACKETED_PASTE);
        }
        if self.caps.mouse_tracking {
            teardown.push_str(ansi::DISABLE_MOUSE);
        }
        if self.caps.hide_cursor {
            teardown.push_str(ansi::SHOW_CURSOR);
        }
        if self.caps.alt_screen {
            teardown.push_str(ansi::LEAVE_ALT_SCREEN);
        }
        let result = self.stdout.write_all(teardown.as_bytes()).and_then(|()| self.stdout.flush());
        result.map_err(TermError::Io)
    }

    #[must_use]
    pub fn capabilities(&self) -> RuntimeCapabilities { self.caps }

    #[must_use]
    pub fn size(&self) -> Size { Size::new(self.buffer.width(), self.buffer.height()) }

    /// A clone of the sticky error flag, shared with the runtime loop's
    /// other tasks so any of them can observe a fatal error raised by
    /// another.
    #[must_use]
    pub fn sticky_error(&self) -> Arc<StdMutex<Option<String>>> { Arc::clone(&self.sticky_error) }

    fn check_sticky(&self) -> Result<()> {
        if let Some(msg) = self.sticky_error.lock().expect("sticky error lock poisoned").clone() {
            return Err(TermError::Poisoned(msg));
        }
        Ok(())
    }

    fn set_sticky(&self, err: TermError) -> TermError {
        *self.sticky_error.lock().expect("sticky error lock poisoned") = Some(err.to_string());
        err
    }

    fn write_raw(&mut self, s: &str) -> Result<()> {
        self.stdout
            .write_all(s.as_bytes())
            .and_then(|()| self.stdout.flush())
            .map_err(|e| self.set_sticky(TermError::Io(e)))
    }

    /// Resize the backing buffer, preserving overlapping content. Called by
    /// the runtime loop when it observes a [`crate::event::Event::Resize`].
    pub fn resize(&mut self, size: Size) {
        self.buffer.resize(size.width, size.height);
    }

    /// Begin composing a frame: hand back a [`RenderFrame`] spanning the
    /// whole terminal for the view tree to draw into.
    pub fn begin_frame(&mut self) -> Result<RenderFrame<'_>> {
        self.check_sticky()?;
        let bounds = Rect::new(0, 0, self.buffer.width(), self.buffer.height());
        Ok(RenderFrame::new(&mut self.buffer, bounds))
    }

    /// Diff the back buffer against the front buffer, flush the minimal
    /// ANSI sequence that reconciles them, and commit the back buffer into
    /// the front buffer.
    pub fn end_frame(&mut self) -> Result<()> {
        self.check_sticky()?;
        let mut out = String::new();
        ansi::flush_diff(&mut out, &self.buffer, self.caps.color_support);
        if !out.is_empty() {
            self.write_raw(&out)?;
        }
        self.buffer.commit();
        Ok(())
    }
}
