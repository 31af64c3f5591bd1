//! Console logger implementation

use super::file_logger::LogLevel;
use super::traits::Logger;

/// A logger that writes to the terminal
///
/// Info goes to stdout, everything else to stderr. Messages below
/// `min_level` are dropped, so a host can keep chat output clean and only
/// surface warnings unless asked to be verbose.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a console logger that prints everything from debug up
    pub fn new() -> Self {
        Self {
            prefix: "[toolchat]".to_string(),
            min_level: LogLevel::Debug,
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Drop messages below `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            eprintln!("{} DEBUG: {}", self.prefix, message);
        }
    }

    fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            println!("{} INFO: {}", self.prefix, message);
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            eprintln!("{} WARN: {}", self.prefix, message);
        }
    }

    fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            eprintln!("{} ERROR: {}", self.prefix, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logger_creation() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.prefix, "[toolchat]");

        let custom = ConsoleLogger::with_prefix("[repl]");
        assert_eq!(custom.prefix, "[repl]");
        assert_eq!(custom.min_level, LogLevel::Debug);
    }

    #[test]
    fn test_min_level_filters() {
        let logger = ConsoleLogger::new().with_min_level(LogLevel::Warn);
        assert!(!logger.enabled(LogLevel::Debug));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warn));
        assert!(logger.enabled(LogLevel::Error));

        // Filtered calls must not panic either
        logger.debug("hidden");
        logger.error("shown");
    }
}
