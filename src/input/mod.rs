// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Input decoding: the byte-stream state machine and the event types it
//! produces.

pub mod decoder;
pub mod reader;
pub mod types;

pub use decoder::Decoder;
pub use reader::spawn_input_reader;
