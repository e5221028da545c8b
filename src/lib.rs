//! # Log Relay
//!
//! An asynchronous, level-filtered logging pipeline: many producer threads
//! enqueue records into a bounded queue, one background worker dispatches
//! them to pluggable sinks (rotating file, console) under periodic
//! flush/rotate timers. Ships with a distributed trace/span id generator
//! for request correlation across services.
//!
//! ## Features
//!
//! - **Single-consumer pipeline**: FIFO delivery, blocking backpressure,
//!   graceful drain on close
//! - **Capability-based sinks**: write is mandatory, flush and rotation are
//!   optional traits discovered once at registration
//! - **Level windows**: each file sink accepts an inclusive severity range
//! - **Lazy formatting**: macro calls below the threshold cost nothing

pub mod config;
pub mod core;
pub mod macros;
pub mod sinks;
pub mod trace;

pub mod prelude {
    pub use crate::config::{BaseConfig, ConsoleWriterConfig, FileWriterConfig, LogConfig};
    pub use crate::core::{
        global, Flush, LogError, LogLevel, Logger, Record, RecordPool, Result, Rotate, Sink,
        DEFAULT_LAYOUT, DEFAULT_QUEUE_CAPACITY,
    };
    pub use crate::sinks::{ConsoleSink, FileSink};
    pub use crate::trace::{new_span_id, new_trace_id, TraceContext, ORIGIN_TAG};
}

pub use crate::config::{BaseConfig, ConsoleWriterConfig, FileWriterConfig, LogConfig};
pub use crate::core::{
    global, Flush, LogError, LogLevel, Logger, Record, RecordPool, Result, Rotate, Sink,
    DEFAULT_LAYOUT, DEFAULT_QUEUE_CAPACITY,
};
pub use crate::sinks::{ConsoleSink, FileSink};
pub use crate::trace::{new_span_id, new_trace_id, TraceContext};
