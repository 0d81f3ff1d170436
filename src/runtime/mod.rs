// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The application contract and the async loop that drives it.

pub mod app;
pub mod loop_;
pub mod logging;
pub mod options;

pub use app::Application;
pub use logging::init_tracing;
pub use loop_::run;
pub use options::RuntimeOptions;
