// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Runtime configuration: the knobs a program sets once before
//! [`crate::runtime::loop_::run`] takes over the terminal.

use std::time::Duration;

/// Options controlling how the runtime loop drives the terminal. Defaults
/// favor the common full-screen interactive case: 30 frames per second, the
/// alternate screen, a hidden cursor, bracketed paste on, and mouse
/// tracking off (most text-only applications never need it, and leaving it
/// off avoids surprising a user who selects text with the mouse expecting
/// the usual terminal selection behavior).
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    pub fps: u32,
    pub alt_screen: bool,
    pub hide_cursor: bool,
    pub mouse_tracking: bool,
    pub bracketed_paste: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self { fps: 30, alt_screen: true, hide_cursor: true, mouse_tracking: false, bracketed_paste: true }
    }
}

impl RuntimeOptions {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn fps(mut self, fps: u32) -> Self { self.fps = fps; self }

    #[must_use]
    pub fn mouse_tracking(mut self, enabled: bool) -> Self { self.mouse_tracking = enabled; self }

    #[must_use]
    pub fn alt_screen(mut self, enabled: bool) -> Self { self.alt_screen = enabled; self }

    #[must_use]
    pub fn hide_cursor(mut self, enabled: bool) -> Self { self.hide_cursor = enabled; self }

    #[must_use]
    pub fn bracketed_paste(mut self, enabled: bool) -> Self { self.bracketed_paste = enabled; self }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_interval_matches_fps() {
        let opts = RuntimeOptions::new().fps(60);
        assert_eq!(opts.tick_interval(), Duration::from_nanos(16_666_667));
    }

    #[test]
    fn defaults_favor_full_screen_interactive_use() {
        let opts = RuntimeOptions::default();
        assert_eq!(opts.fps, 30);
        assert!(opts.alt_screen);
        assert!(!opts.mouse_tracking);
    }

    #[test]
    fn every_flag_is_independently_settable() {
        let opts = RuntimeOptions::new().hide_cursor(false).bracketed_paste(false).mouse_tracking(true).alt_screen(false);
        assert!(!opts.hide_cursor);
        assert!(!opts.bracketed_paste);
        assert!(opts.mouse_tracking);
        assert!(!opts.alt_screen);
    }
}
