//! Tracing setup.
//!
//! Console logging goes to stderr so alert output on stdout stays clean.
//! The filter honors `RUST_LOG` and defaults to `info`. Timestamps use the
//! local offset when it can be determined, UTC otherwise.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Keeps the non-blocking log writer alive.
///
/// Dropping it flushes buffered lines, so hold it for the life of the
/// process.
#[must_use]
pub struct LogGuard {
    _file_worker: Option<WorkerGuard>,
}

/// Initialize console logging on stderr.
///
/// Panics if a global subscriber is already installed.
pub fn init() -> LogGuard {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(local_timer())
        .with_writer(io::stderr)
        .init();

    LogGuard { _file_worker: None }
}

/// Initialize logging to a file, appending to `path`.
///
/// Writes go through a non-blocking worker thread; the returned guard
/// flushes them on drop. Parent directories are created as needed.
pub fn init_with_file(path: &Path) -> io::Result<LogGuard> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(local_timer())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(LogGuard {
        _file_worker: Some(guard),
    })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn local_timer() -> OffsetTime<Rfc3339> {
    // Local offset detection fails once other threads exist
    OffsetTime::local_rfc_3339().unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339))
}
