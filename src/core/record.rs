//! Log record value object and its reuse pool

use crate::core::level::LogLevel;
use parking_lot::Mutex;
use std::fmt;

/// One log entry as it travels from a producer through the queue to the sinks.
///
/// `time` is the layout-rendered wall-clock string (cached per second by the
/// logger), `location` is the `file:line` of the originating call.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub level: LogLevel,
    pub time: String,
    pub location: String,
    pub message: String,
}

impl Record {
    fn reset(&mut self) {
        self.level = LogLevel::default();
        self.time.clear();
        self.location.clear();
        self.message.clear();
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}][{}] {}",
            self.level.as_str(),
            self.time,
            self.location,
            self.message
        )
    }
}

/// Escape line breaks and tabs so one record is always exactly one output
/// line, and a crafted message cannot forge additional entries.
pub(crate) fn sanitize_message(message: String) -> String {
    if !message.contains(['\n', '\r', '\t']) {
        return message;
    }
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Reusable allocator for [`Record`]s on the hot logging path.
///
/// Producers check records out, the dispatch worker returns them after the
/// last sink has consumed them. The idle list is capped so a burst of
/// traffic cannot pin memory indefinitely.
pub struct RecordPool {
    free: Mutex<Vec<Record>>,
    max_idle: usize,
}

impl RecordPool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Check a record out, reusing a previously returned one when available.
    pub fn get(&self) -> Record {
        self.free.lock().pop().unwrap_or_default()
    }

    /// Return a record after its last consumer is done with it.
    pub fn put(&self, mut record: Record) {
        record.reset();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(record);
        }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.lock().len()
    }
}
