//! Logger core: bounded queue, dispatch worker, lifecycle

use crate::core::error::{LogError, Result};
use crate::core::level::LogLevel;
use crate::core::record::{sanitize_message, Record, RecordPool};
use crate::core::sink::{Sink, SinkSet};
use chrono::Local;
use crossbeam_channel::{after, bounded, select, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default capacity of the bounded record queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default timestamp layout (chrono format string).
pub const DEFAULT_LAYOUT: &str = "%Y/%m/%d %H:%M:%S";

const FLUSH_FIRST_DELAY: Duration = Duration::from_millis(500);
const FLUSH_INTERVAL: Duration = Duration::from_millis(1000);
const ROTATE_INTERVAL: Duration = Duration::from_secs(10);

/// Everything that travels through the queue to the worker. Sinks ride the
/// same channel as records, so registration order and record order share a
/// single FIFO and the worker owns the sinks outright.
enum QueueItem {
    Record(Record),
    Sink(Box<dyn Sink>),
}

/// Wall-clock string cache: the rendered timestamp is reused until the
/// second advances.
struct Clock {
    layout: String,
    last_unix: i64,
    rendered: String,
}

/// Asynchronous, level-filtered logging pipeline.
///
/// Any number of producer threads call the leveled methods; one background
/// worker drains the bounded queue in arrival order and dispatches each
/// record to every registered sink. Producers block only when the queue is
/// full; that is the sole backpressure mechanism.
///
/// # Example
///
/// ```
/// use log_relay::{info, Logger, LogLevel};
///
/// let logger = Logger::new();
/// logger.set_level(LogLevel::Info);
/// info!(logger, "listening on port {}", 8080);
/// logger.close();
/// ```
pub struct Logger {
    min_level: RwLock<LogLevel>,
    sender: RwLock<Option<Sender<QueueItem>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    clock: Mutex<Clock>,
    pool: Arc<RecordPool>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &*self.min_level.read())
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Create a logger with the default queue capacity and spawn its worker.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a logger with a custom bounded-queue capacity.
    ///
    /// The capacity is fixed for the lifetime of the logger.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        let pool = Arc::new(RecordPool::new(capacity));
        let worker_pool = Arc::clone(&pool);

        let handle = thread::spawn(move || run_worker(receiver, worker_pool));

        Self {
            min_level: RwLock::new(LogLevel::Debug),
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            clock: Mutex::new(Clock {
                layout: DEFAULT_LAYOUT.to_string(),
                last_unix: 0,
                rendered: String::new(),
            }),
            pool,
        }
    }

    /// Register a sink. Calls `init` on it and hands it to the worker; the
    /// sink is owned by the worker from then on. An init failure is returned
    /// to the caller: a broken sink is a startup defect, and setup code
    /// decides whether the process proceeds.
    pub fn register(&self, mut sink: Box<dyn Sink>) -> Result<()> {
        if let Err(e) = sink.init() {
            return Err(LogError::sink_init(sink.name(), e.to_string()));
        }
        let guard = self.sender.read();
        let sender = guard.as_ref().ok_or(LogError::Closed)?;
        sender
            .send(QueueItem::Sink(sink))
            .map_err(|_| LogError::Closed)
    }

    /// Set the minimum level. Takes effect for records enqueued afterwards;
    /// the level decision for a record is made at call time.
    pub fn set_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Set the timestamp layout (chrono format string).
    pub fn set_layout(&self, layout: &str) {
        let mut clock = self.clock.lock();
        clock.layout = layout.to_string();
        clock.last_unix = 0; // force re-render on next use
    }

    /// Whether a record at `level` would currently be admitted.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    /// Enqueue one record. Below the threshold this returns before touching
    /// the clock, the pool, or the queue. Blocks while the queue is full.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }

        let caller = std::panic::Location::caller();
        let file = Path::new(caller.file())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(caller.file());

        let mut record = self.pool.get();
        record.level = level;
        record.time = self.timestamp();
        record.location = format!("{}:{}", file, caller.line());
        record.message = sanitize_message(message.into());

        let guard = self.sender.read();
        if let Some(sender) = guard.as_ref() {
            // A send error means the worker is gone; the record is dropped
            // silently, matching close() semantics for late producers.
            let _ = sender.send(QueueItem::Record(record));
        }
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Close the queue and wait for the worker to drain it.
    ///
    /// Every record enqueued before this call is delivered; flush-capable
    /// sinks receive a final flush before the worker exits. Log calls made
    /// after close are silently ignored. Idempotent.
    pub fn close(&self) {
        drop(self.sender.write().take());
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                eprintln!("[LOG ERROR] dispatch worker panicked during close");
            }
        }
    }

    fn timestamp(&self) -> String {
        let now = Local::now();
        let unix = now.timestamp();
        let mut clock = self.clock.lock();
        if unix != clock.last_unix {
            clock.last_unix = unix;
            clock.rendered = now.format(&clock.layout).to_string();
        }
        clock.rendered.clone()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Dispatch worker: blocks on the next of a queued item, a flush tick, or a
/// rotate tick; exits when the queue is closed and fully drained. Timers are
/// channels in the same `select!`, so there is no busy-polling and ticks
/// interleave with records without reordering them.
fn run_worker(receiver: Receiver<QueueItem>, pool: Arc<RecordPool>) {
    let mut sinks = SinkSet::new();
    let mut flush_tick = after(FLUSH_FIRST_DELAY);
    let mut rotate_tick = after(ROTATE_INTERVAL);

    loop {
        select! {
            recv(receiver) -> item => {
                match item {
                    Ok(QueueItem::Record(record)) => {
                        sinks.write(&record);
                        pool.put(record);
                    }
                    Ok(QueueItem::Sink(sink)) => sinks.add(sink),
                    // Closed and drained: stop the loop.
                    Err(_) => break,
                }
            }
            recv(flush_tick) -> _ => {
                sinks.flush_all();
                flush_tick = after(FLUSH_INTERVAL);
            }
            recv(rotate_tick) -> _ => {
                sinks.rotate_all();
                rotate_tick = after(ROTATE_INTERVAL);
            }
        }
    }

    // Final flush so close() never leaves buffered records behind.
    sinks.flush_all();
}
