//! Logging Module
//!
//! File-only structured logging for the terminal UI. The TUI owns stdout in
//! raw/alternate-screen mode, so every record goes to a daily-rolling JSON
//! file through a non-blocking writer. `log` macros are bridged into
//! `tracing` so both facades land in the same file.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log file prefix; the appender adds a `.YYYY-MM-DD` suffix.
pub const LOG_FILE_PREFIX: &str = "bo3-assistant.log";

/// Initialize the logging system for TUI mode.
///
/// `default_level` is used when `RUST_LOG` is unset or invalid. The returned
/// guard must be held for the lifetime of the program or buffered records
/// are lost on exit.
pub fn init_tui(log_dir: &Path, default_level: &str) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter(default_level));

    // No stdout layer, the TUI owns the terminal. `try_init` also installs
    // the `log` bridge.
    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");
    guard
}

/// `RUST_LOG` if set and valid, else `default_level`, else `info`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
