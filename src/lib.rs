// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! A terminal user-interface engine: a double-buffered cell grid with
//! minimal-diff ANSI output, a hand-rolled VT input decoder, and an async
//! declarative view runtime built on three cooperating tasks (the event
//! loop, the input reader, and the command executor).
//!
//! ```no_run
//! use termstage::runtime::{run, Application, RuntimeOptions};
//! use termstage::view::{Text, View};
//! use termstage::command::Command;
//! use termstage::event::Event;
//! use termstage::style::Style;
//!
//! struct Hello;
//!
//! impl Application for Hello {
//!     fn view(&self) -> Box<dyn View> {
//!         Box::new(Text::new("hello, terminal".into(), Style::new().bold()))
//!     }
//!
//!     fn handle_event(&mut self, event: Event) -> Command {
//!         match event {
//!             Event::Key(_) => Command::Quit,
//!             _ => Command::None,
//!         }
//!     }
//! }
//!
//! # async fn doc() -> termstage::error::Result<()> {
//! run(Hello, RuntimeOptions::default()).await
//! # }
//! ```

pub mod command;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod record;
pub mod registry;
pub mod runtime;
pub mod style;
pub mod terminal;
pub mod view;

pub use command::Command;
pub use error::{Result, TermError};
pub use event::Event;
pub use frame::RenderFrame;
pub use geometry::{Pos, Rect, Size};
pub use registry::InteractiveRegistry;
