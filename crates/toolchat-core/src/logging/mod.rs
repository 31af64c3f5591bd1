//! Logging abstractions for runtime-agnostic logging

mod traits;
mod noop;
mod console;
pub mod file_logger;

pub use traits::Logger;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;

pub use file_logger::{FileLogger, LogLevel};
