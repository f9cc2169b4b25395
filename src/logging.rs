//! Logging setup for the command line front end.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Console output goes to stderr so it never mixes with the
//! preview or chart JSON printed on stdout.
//!
//! ```no_run
//! use data_sweeper::{config::Settings, logging};
//!
//! logging::init(&Settings::from_env()).expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```

use crate::config::Settings;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/data-sweeper/logs`
/// - macOS: `~/Library/Application Support/data-sweeper/logs`
/// - Linux: `~/.local/share/data-sweeper/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("data-sweeper").join("logs"))
}

/// Runs `f` with a temporary stderr subscriber that shows warnings and errors.
///
/// Loading [`Settings`] happens before [`init`] can run, since `init` needs
/// them. Wrapping it here keeps the warnings about bad `SWEEPER_*` values.
pub fn bootstrap<T>(f: impl FnOnce() -> T) -> T {
    bootstrap_with_writer(std::io::stderr, f)
}

fn bootstrap_with_writer<W, T>(writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `settings.log_level`. When `settings.log_to_file` is
/// set, a daily rolling `data-sweeper.<date>.log` is written as well, keeping
/// ten files.
///
/// # Errors
///
/// Returns error if the filter directive is invalid, the log directory cannot
/// be created, or a subscriber is already installed.
pub fn init(settings: &Settings) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, log_dir) = if settings.log_to_file {
        let log_dir = get_log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("data-sweeper")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create file appender")?;

        let layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(appender);
        (Some(layer), Some(log_dir))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("File logging enabled, log directory: {}", dir.display());
    }

    Ok(())
}
