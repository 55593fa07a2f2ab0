//! File logging.
//!
//! The terminal belongs to the UI, so log output goes to a file through a
//! non-blocking writer. The returned guard must be held until exit so
//! buffered lines are flushed.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "bilimforms.log";

/// Installs the global subscriber writing to `<log_dir>/bilimforms.log`.
///
/// `RUST_LOG` overrides the level chosen by `debug`.
pub fn init(log_dir: &Path, debug: bool) -> std::io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bilimforms={level}")));

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    // Keeps an already installed subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init();

    Ok(guard)
}
