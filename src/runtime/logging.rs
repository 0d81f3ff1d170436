// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Tracing setup. Stdout is owned by the raw-mode terminal for the
//! lifetime of the runtime loop, so diagnostic output has nowhere sane to
//! go but a file: [`init_tracing`] wires a non-blocking file appender when
//! a path is given, and drops logging on the floor (rather than corrupting
//! the screen) when it isn't.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install a global tracing subscriber. Returns a [`WorkerGuard`] the
/// caller must keep alive for the duration of the program — dropping it
/// flushes and stops the background writer thread, so dropping it early
/// silently truncates the remaining log output.
///
/// `path` names the log file; `None` installs a subscriber that discards
/// everything, useful for tests and for programs that never asked for
/// logging.
pub fn init_tracing(path: Option<&std::path::Path>) -> std::io::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match path {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "log path has no file name")
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Ok(guard)
        }
        None => {
            let (non_blocking, guard) = tracing_appender::non_blocking(std::io::sink());
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).init();
            Ok(guard)
        }
    }
}
