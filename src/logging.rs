//! Release Tools Logging System
//!
//! Writes timestamped, level-prefixed lines to a per-run log file and the
//! console. CI picks the log file up as a build artifact.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

static LOGGER: OnceLock<Arc<Mutex<ReleaseLogger>>> = OnceLock::new();

const LOG_DIR: &str = "./build/release-logs";

// ============================================================================
// Log Levels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Upload,
    Warning,
    Error,
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO]",
            LogLevel::Upload => "[UPLOAD]",
            LogLevel::Warning => "[WARNING]",
            LogLevel::Error => "[ERROR]",
        }
    }
}

// ============================================================================
// Release Logger
// ============================================================================

pub struct ReleaseLogger {
    log_file: Option<File>,
}

impl ReleaseLogger {
    pub fn new() -> Self {
        let log_dir = PathBuf::from(LOG_DIR);
        let _ = fs::create_dir_all(&log_dir);

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("release_{}.log", timestamp));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        let mut logger = Self { log_file };
        logger.write_raw(&run_header());
        logger
    }

    fn write_raw(&mut self, msg: &str) {
        // Write to file
        if let Some(ref mut file) = self.log_file {
            let _ = writeln!(file, "{}", msg);
            let _ = file.flush();
        }

        // Also print to console
        println!("{}", msg);
    }

    pub fn log(&mut self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        let formatted = format!("[{}] {} {}", timestamp, level.prefix(), message);
        self.write_raw(&formatted);
    }
}

impl Default for ReleaseLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn run_header() -> String {
    format!(
        "=== Quark release tools v{} - {} - {} ===",
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        std::env::consts::OS
    )
}

// ============================================================================
// Global Logger Access
// ============================================================================

/// Initialize the global logger (call once at startup)
pub fn init_logger() {
    LOGGER.get_or_init(|| Arc::new(Mutex::new(ReleaseLogger::new())));
}

/// Get the global logger instance
fn logger() -> Arc<Mutex<ReleaseLogger>> {
    LOGGER
        .get_or_init(|| Arc::new(Mutex::new(ReleaseLogger::new())))
        .clone()
}

// ============================================================================
// Convenience Logging Functions
// ============================================================================

pub fn log_info(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Info, message);
    }
}

pub fn log_upload(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Upload, message);
    }
}

pub fn log_warning(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Warning, message);
    }
}

pub fn log_error(message: &str) {
    if let Ok(mut log) = logger().lock() {
        log.log(LogLevel::Error, message);
    }
}
