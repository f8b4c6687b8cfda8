use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILTER, LOG_DIR_ENV, LOG_FILE_PREFIX};

/// Build the level filter from a `RUST_LOG`-style directive string.
/// A missing or unparsable value falls back to the crate default.
pub fn filter_from(spec: Option<&str>) -> EnvFilter {
    spec.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Directory for the rolling JSON log, `YC_PIPELINE_LOG_DIR` or `logs/`
pub fn log_dir_from(value: Option<String>) -> PathBuf {
    value
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
}

/// Console output on stderr plus a daily-rolling JSON file.
///
/// Stderr keeps `--json` reports on stdout parseable. The returned guard must
/// live until exit or buffered file lines are lost. When the log directory
/// can't be created only the console layer is installed.
pub fn init_logging() -> Option<WorkerGuard> {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());
    let dir = log_dir_from(std::env::var(LOG_DIR_ENV).ok());

    match prepare_dir(&dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(writer))
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            tracing::warn!(dir = %dir.display(), error = %e, "File logging disabled");
            None
        }
    }
}

fn prepare_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
