//! Sink traits and the worker-side sink registry

use crate::core::error::Result;
use crate::core::record::Record;

/// An output target for log records.
///
/// `init` and `write` are the base contract every sink fulfils. Optional
/// capabilities are separate traits; a sink advertises them by overriding
/// the matching probe. The dispatch worker probes once at registration and
/// caches the result, so capability discovery never runs on the hot path.
pub trait Sink: Send {
    /// Acquire the sink's resource. Called by `Logger::register`; an error
    /// here is a startup-time configuration defect, not a runtime condition.
    fn init(&mut self) -> Result<()>;

    /// Write one record. Sinks with a level window silently accept and
    /// discard records outside it.
    fn write(&mut self, record: &Record) -> Result<()>;

    fn name(&self) -> &str;

    /// Probe for the flush capability.
    fn as_flush(&mut self) -> Option<&mut dyn Flush> {
        None
    }

    /// Probe for the rotation capability.
    fn as_rotate(&mut self) -> Option<&mut dyn Rotate> {
        None
    }
}

/// Capability: force buffered output to persistent storage.
pub trait Flush {
    fn flush(&mut self) -> Result<()>;
}

/// Capability: switch the backing file according to a path pattern.
pub trait Rotate {
    fn rotate(&mut self) -> Result<()>;
    fn set_path_pattern(&mut self, pattern: &str) -> Result<()>;
}

/// Registration-ordered sink list owned exclusively by the dispatch worker.
///
/// Flush- and rotate-capable sinks are remembered by index when added, so
/// each timer tick walks only the sinks that implement the capability.
#[derive(Default)]
pub(crate) struct SinkSet {
    sinks: Vec<Box<dyn Sink>>,
    flushers: Vec<usize>,
    rotaters: Vec<usize>,
}

impl SinkSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, mut sink: Box<dyn Sink>) {
        let idx = self.sinks.len();
        if sink.as_flush().is_some() {
            self.flushers.push(idx);
        }
        if sink.as_rotate().is_some() {
            self.rotaters.push(idx);
        }
        self.sinks.push(sink);
    }

    /// Deliver one record to every sink in registration order. A failing
    /// sink is reported on stderr and does not stop delivery to the rest.
    pub(crate) fn write(&mut self, record: &Record) {
        for (idx, sink) in self.sinks.iter_mut().enumerate() {
            if let Err(e) = sink.write(record) {
                eprintln!("[LOG ERROR] sink #{} ({}) write failed: {}", idx, sink.name(), e);
            }
        }
    }

    pub(crate) fn flush_all(&mut self) {
        for &idx in &self.flushers {
            let sink = &mut self.sinks[idx];
            if let Some(f) = sink.as_flush() {
                if let Err(e) = f.flush() {
                    eprintln!("[LOG ERROR] sink #{} flush failed: {}", idx, e);
                }
            }
        }
    }

    pub(crate) fn rotate_all(&mut self) {
        for &idx in &self.rotaters {
            let sink = &mut self.sinks[idx];
            if let Some(r) = sink.as_rotate() {
                if let Err(e) = r.rotate() {
                    eprintln!("[LOG ERROR] sink #{} rotate failed: {}", idx, e);
                }
            }
        }
    }
}
