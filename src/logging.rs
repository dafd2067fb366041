use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{LOG_DIR, LOG_FILE_NAME};

/// Used when RUST_LOG is unset or unparsable.
const DEFAULT_FILTER: &str = "lca_bundler=debug,info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber: human-readable lines on stderr and a daily
/// JSON file under `logs/`. Hold the returned guard until exit; dropping it
/// flushes the file writer.
pub fn init_logging() -> WorkerGuard {
    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        eprintln!("cannot create {} directory: {}", LOG_DIR, e);
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(file_writer),
        )
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    guard
}
