//! Logger module
//!
//! Provides logging utilities for the dashboard server including:
//! - Subscriber setup (stdout plus optional file)
//! - Server lifecycle logging
//! - Access logging with multiple formats

mod format;

pub use format::AccessLogEntry;

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes
/// precedence over `logging.level`.
pub fn init(config: &Config) -> std::io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let file_layer = match config.logging.log_file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::AlreadyExists, e))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> std::io::Result<std::fs::File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    info!("Dashboard server started");
    info!("Listening on: http://{addr}");
    info!("  - GET  /          client dashboard");
    info!("  - GET  /agent     agent dashboard");
    info!("  - GET  /api/data  spreadsheet rows as JSON");
    info!(url = %config.source.url, timeout_secs = config.source.timeout_secs, "Spreadsheet source");
    match config.server.workers {
        Some(workers) => info!("Worker threads: {workers}"),
        None => info!("Worker threads: default (CPU cores)"),
    }
    if let Some(ref path) = config.logging.log_file {
        info!("Log file: {path}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    error!("Failed to serve connection: {err:?}");
}

pub fn log_connection_timeout(peer: &SocketAddr, seconds: u64) {
    tracing::debug!(%peer, "no request head within {seconds}s, connection closed");
}

pub fn log_error(message: &str) {
    error!("{message}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

pub fn log_fetch_failed(url: &str, err: &impl std::fmt::Display) {
    error!(%url, "spreadsheet fetch failed: {err}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown() {
    info!("Shutdown requested, no longer accepting connections");
}
