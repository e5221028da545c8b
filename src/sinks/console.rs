//! Console sink

use crate::core::error::Result;
use crate::core::record::Record;
use crate::core::sink::{Flush, Sink};
use colored::Colorize;
use std::io::{self, Write};

/// Writes formatted records to stdout, optionally coloring the level token
/// by severity. No rotation capability.
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { color: false }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, record: &Record) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if self.color {
            let level = record.level.as_str().color(record.level.color_code());
            writeln!(
                handle,
                "[{}][{}][{}] {}",
                level, record.time, record.location, record.message
            )?;
        } else {
            writeln!(handle, "{}", record)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn as_flush(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }
}

impl Flush for ConsoleSink {
    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }
}
