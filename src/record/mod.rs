// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Session recording and playback, asciinema v2 compatible.

pub mod asciinema;

pub use asciinema::{Player, Recorder, Recording};
