//! File-based debug log
//!
//! A process-wide log file for troubleshooting hosts whose stdout/stderr
//! belongs to the chat itself. Disabled unless `TOOLCHAT_DEBUG` is `1` or
//! `true`; `TOOLCHAT_LOG_LEVEL` sets the threshold and `TOOLCHAT_LOG_FILE`
//! overrides the default `$TMP/toolchat-debug.log` location.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

use super::traits::Logger;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO "),
            LogLevel::Warn => write!(f, "WARN "),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

struct FileLogState {
    file: Option<File>,
    min_level: LogLevel,
    enabled: bool,
}

impl FileLogState {
    fn from_env() -> Self {
        let enabled = std::env::var("TOOLCHAT_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let min_level = std::env::var("TOOLCHAT_LOG_LEVEL")
            .ok()
            .and_then(|v| LogLevel::parse(&v))
            .unwrap_or(LogLevel::Debug);

        // Only touch the filesystem when logging is actually on
        let file = if enabled { open_append(&log_file_path()) } else { None };

        Self { file, min_level, enabled }
    }

    fn write(&mut self, level: LogLevel, module: &str, message: &str) {
        if !self.enabled || level < self.min_level {
            return;
        }

        if let Some(ref mut file) = self.file {
            let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp(), level, module, message);
            let _ = file.flush();
        }
    }
}

fn open_append(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs();
            format!(
                "{:02}:{:02}:{:02}.{:03}",
                (secs % 86400) / 3600,
                (secs % 3600) / 60,
                secs % 60,
                d.subsec_millis()
            )
        })
        .unwrap_or_else(|_| "??:??:??.???".to_string())
}

static STATE: OnceLock<Mutex<FileLogState>> = OnceLock::new();

fn state() -> &'static Mutex<FileLogState> {
    STATE.get_or_init(|| Mutex::new(FileLogState::from_env()))
}

/// Log a message at the specified level
pub fn log(level: LogLevel, module: &str, message: &str) {
    if let Ok(mut state) = state().lock() {
        state.write(level, module, message);
    }
}

pub fn trace(module: &str, message: &str) {
    log(LogLevel::Trace, module, message);
}

pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// Path of the debug log file
pub fn log_file_path() -> PathBuf {
    if let Ok(custom) = std::env::var("TOOLCHAT_LOG_FILE") {
        if !custom.trim().is_empty() {
            return PathBuf::from(custom);
        }
    }
    std::env::temp_dir().join("toolchat-debug.log")
}

/// Whether `TOOLCHAT_DEBUG` turned the file log on for this process
pub fn is_enabled() -> bool {
    state().lock().map(|state| state.enabled).unwrap_or(false)
}

/// `Logger` adapter over the global debug file
///
/// Every message is tagged with the component name given at construction.
#[derive(Debug, Clone)]
pub struct FileLogger {
    component: String,
}

impl FileLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

impl Logger for FileLogger {
    fn debug(&self, message: &str) {
        debug(&self.component, message);
    }

    fn info(&self, message: &str) {
        info(&self.component, message);
    }

    fn warn(&self, message: &str) {
        warn(&self.component, message);
    }

    fn error(&self, message: &str) {
        error(&self.component, message);
    }
}
