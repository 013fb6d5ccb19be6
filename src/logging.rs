/// Process-wide logging setup.
///
/// Logs go to stderr by default. With a log directory they are appended to
/// `gym-stats.log` inside it instead, each run starting with a separator line.
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "gym-stats.log";

const DEFAULT_FILTER: &str = "info";

/// Initializes the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this more than once
/// keeps the first subscriber. Returns the log file path when logging to a
/// directory.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let Some(log_dir) = log_dir else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .ok();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    // Separator goes in before the appender opens the file
    let separator = format!(
        "\n{sep}\n[{ts}] New gym-stats session\n{sep}\n",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
    writeln!(file, "{}", separator)
        .with_context(|| format!("Failed to write log file: {}", log_path.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok();

    tracing::info!(path = %log_path.display(), "logging initialized");

    Ok(Some(log_path))
}
