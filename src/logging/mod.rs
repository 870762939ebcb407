//! Application logging functionality
//!
//! Console logging through `tracing-subscriber`, optionally copied to a
//! daily log file under the config directory.

use crate::core::config_file::ConfigFile;
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log level or filter directives
pub const LOG_ENV: &str = "BEZY_LOG";

/// Empty time formatter that doesn't print anything
struct EmptyTime;

impl FormatTime for EmptyTime {
    fn format_time(&self, _: &mut format::Writer<'_>) -> std::fmt::Result {
        Ok(())
    }
}

/// The filter directives in effect: an explicit level wins over `BEZY_LOG`,
/// which wins over `warn`
fn filter_directives(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| "warn".to_string())
}

/// Install the global subscriber. Logs carry level and target but no
/// timestamps. With `log_to_file` every event is also appended to the
/// day's file in `logs_dir()`. Returns an error when a subscriber is
/// already installed, the directives don't parse or the file can't be
/// opened.
pub fn init_logger(level: Option<&str>, log_to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directives(level))?;
    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let file_layer = if log_to_file {
        let (path, file) = open_log_file(&logs_dir())?;
        eprintln!("Logging to {}", path.display());
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    format!("bezy-{}.log", timestamp)
}

/// Create `dir` if needed and open today's log file in it for appending
fn open_log_file(dir: &Path) -> anyhow::Result<(PathBuf, File)> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    let path = dir.join(log_file_name());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    Ok((path, file))
}
