//! Logger module
//!
//! Provides logging utilities for the server:
//! - Level-filtered diagnostic messages with local timestamps
//! - Access logging in several formats
//! - File-based output

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use chrono::Local;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

static LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    /// Parse a level name; unknown names give `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" | "trace" => Some(Self::Debug),
            _ => None,
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    match Level::parse(&config.level) {
        Some(level) => set_level(level),
        None => log_warning(&format!(
            "Unknown log level '{}', using info",
            config.level
        )),
    }
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

pub fn set_level(level: Level) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn enabled(level: Level) -> bool {
    level as u8 <= LEVEL.load(Ordering::Relaxed)
}

fn write(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let line = format!(
        "{} [{}] {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        level.tag()
    );
    match (writer::get(), level) {
        (Some(w), Level::Error | Level::Warn) => w.write_error(&line),
        (Some(w), _) => w.write_access(&line),
        (None, Level::Error | Level::Warn) => eprintln!("{line}"),
        (None, _) => println!("{line}"),
    }
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info(&format!("Listening on: http://{addr}"));
    match &config.site.docroot {
        Some(docroot) => log_info(&format!("Docroot: {docroot}")),
        None => log_info("Docroot: (none, routes only)"),
    }
    log_info(&format!("Routes: {}", config.site.routes.len()));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    log_info("======================================");
}

pub fn log_route_matched(path: &str, pattern: &str) {
    log_debug(&format!("[Route] {path} matched {pattern}"));
}

pub fn log_fallback(path: &str) {
    log_debug(&format!("[Files] {path} has no route, trying docroot"));
}

pub fn log_escape_blocked(path: &str, resolved: &Path) {
    log_warning(&format!(
        "Path traversal attempt blocked: {path} -> {}",
        resolved.display()
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Write a formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
