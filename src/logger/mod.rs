//! Logger module
//!
//! Provides logging utilities for the asset server including:
//! - Startup banner and shutdown notice
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};
pub use writer::Level;

use crate::config::LoggingConfig;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Before that, messages go
/// straight to stdout/stderr.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.level),
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_info(level, message),
        None if level <= Level::Info => println!("{message}"),
        None => {}
    }
}

/// Write to error log
fn write_error(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write_error(level, message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    let rule = "=".repeat(52);
    write_info(Level::Info, &rule);
    write_info(Level::Info, "  Static Asset Server Running");
    write_info(Level::Info, &rule);
    write_info(Level::Info, "");
    write_info(Level::Info, &format!("  Server: http://localhost:{}", addr.port()));
    write_info(Level::Info, &format!("  Listening on: {addr}"));
    write_info(Level::Info, &format!("  Directory: {}", root.display()));
    write_info(Level::Info, "");
    write_info(Level::Info, "  Press Ctrl+C to stop the server");
    write_info(Level::Info, "");
}

pub fn log_server_stopped() {
    write_info(Level::Info, "\n\n  Server stopped.");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(Level::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_debug(message: &str) {
    write_info(Level::Debug, &format!("[DEBUG] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &LogFormat) {
    write_access(&entry.format(format));
}
