//! Logging setup for clouddrive.
//!
//! `logging.file` decides where lines go: an empty value keeps logging on the
//! console, anything else also appends to that file. `RUST_LOG` directives
//! are honoured on top of `logging.level`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Console only.
    Console,
    /// Console plus a log file, appended to across runs.
    ConsoleAndFile(PathBuf),
}

impl LogTarget {
    /// Resolve the target from configuration.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let file = config.file.trim();
        if file.is_empty() {
            LogTarget::Console
        } else {
            LogTarget::ConsoleAndFile(PathBuf::from(file))
        }
    }
}

/// Map a configured level name to a filter. Unknown names mean `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy()
}

/// Open `path` for appending, creating it and its parent directories.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

/// Install the global subscriber described by `config`.
///
/// Fails only when the log file cannot be opened; nothing is installed in
/// that case, so the caller can fall back to [`init_console_only`].
pub fn init(config: &LoggingConfig) -> Result<()> {
    let path = match LogTarget::from_config(config) {
        LogTarget::Console => {
            init_console_only(&config.level);
            return Ok(());
        }
        LogTarget::ConsoleAndFile(path) => path,
    };

    let log_file = Arc::new(open_log_file(&path)?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(env_filter(&config.level))
        .init();

    info!(file = %path.display(), "Logging to file");
    Ok(())
}

/// Install a console-only subscriber.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true),
        )
        .with(env_filter(level))
        .init();
}
