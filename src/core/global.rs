//! Process-wide default logger with guarded claim semantics
//!
//! The application entry point normally constructs a [`Logger`] explicitly
//! and passes it around. For top-level call sites a single process-wide
//! instance is kept here: lazily constructed on first use, or installed
//! exactly once via [`claim`]: the first claimer wins, and an installed
//! logger is never silently reconstructed.

use crate::core::error::{LogError, Result};
use crate::core::level::LogLevel;
use crate::core::logger::Logger;
use crate::core::sink::Sink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static DEFAULT: Mutex<Option<Arc<Logger>>> = Mutex::new(None);
static CLAIMED: AtomicBool = AtomicBool::new(false);

/// Handle to the process-wide logger, constructing a default one on first
/// use.
pub fn logger() -> Arc<Logger> {
    let mut slot = DEFAULT.lock();
    slot.get_or_insert_with(|| Arc::new(Logger::new())).clone()
}

/// Install an explicitly constructed logger as the process-wide default.
///
/// Succeeds at most once per [`close`] cycle; a second claim returns
/// [`LogError::AlreadyClaimed`] and leaves the installed logger untouched.
/// A default that was only ever lazily constructed is replaced (and shut
/// down on drop), since nobody claimed it.
pub fn claim(logger: Logger) -> Result<Arc<Logger>> {
    let mut slot = DEFAULT.lock();
    if CLAIMED.swap(true, Ordering::SeqCst) {
        return Err(LogError::AlreadyClaimed);
    }
    let shared = Arc::new(logger);
    *slot = Some(shared.clone());
    Ok(shared)
}

/// Drain and release the process-wide logger, resetting the claim so a
/// later bootstrap can install a fresh one.
pub fn close() {
    let taken = {
        let mut slot = DEFAULT.lock();
        CLAIMED.store(false, Ordering::SeqCst);
        slot.take()
    };
    if let Some(logger) = taken {
        logger.close();
    }
}

pub fn set_level(level: LogLevel) {
    logger().set_level(level);
}

pub fn set_layout(layout: &str) {
    logger().set_layout(layout);
}

pub fn register(sink: Box<dyn Sink>) -> Result<()> {
    logger().register(sink)
}

#[track_caller]
pub fn trace(message: impl Into<String>) {
    logger().log(LogLevel::Trace, message);
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    logger().log(LogLevel::Debug, message);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    logger().log(LogLevel::Info, message);
}

#[track_caller]
pub fn warn(message: impl Into<String>) {
    logger().log(LogLevel::Warning, message);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    logger().log(LogLevel::Error, message);
}

#[track_caller]
pub fn fatal(message: impl Into<String>) {
    logger().log(LogLevel::Fatal, message);
}
