// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Terminal ownership: raw mode, the alternate screen, ANSI sequence
//! generation, and `SIGWINCH` handling.

pub mod ansi;
pub mod driver;
pub mod raw_mode;
pub mod resize;

pub use driver::{RuntimeCapabilities, TerminalDriver};
