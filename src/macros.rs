//! Logging macros with lazy message formatting.
//!
//! Each macro checks the logger's threshold *before* formatting, so a call
//! below the configured level never evaluates its arguments.
//!
//! # Examples
//!
//! ```
//! use log_relay::{info, warn, Logger, LogLevel};
//!
//! let logger = Logger::new();
//! logger.set_level(LogLevel::Info);
//!
//! let port = 8080;
//! info!(logger, "server listening on port {}", port);
//! warn!(logger, "retry attempt {} of {}", 3, 5);
//! logger.close();
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// ```
/// # use log_relay::{Logger, LogLevel};
/// # let logger = Logger::new();
/// use log_relay::log;
/// log!(logger, LogLevel::Info, "status code: {}", 200);
/// # logger.close();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
