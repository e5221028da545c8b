//! Core pipeline types: records, sinks, the dispatcher, and the facade

pub mod error;
pub mod global;
pub mod level;
pub mod logger;
pub mod record;
pub mod sink;

pub use error::{LogError, Result};
pub use level::LogLevel;
pub use logger::{Logger, DEFAULT_LAYOUT, DEFAULT_QUEUE_CAPACITY};
pub use record::{Record, RecordPool};
pub use sink::{Flush, Rotate, Sink};
