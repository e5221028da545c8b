//! File sink: append-only output with a level window and pattern rotation

use crate::core::error::{LogError, Result};
use crate::core::level::LogLevel;
use crate::core::record::Record;
use crate::core::sink::{Flush, Rotate, Sink};
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Rotation naming template with `%Y` `%M` `%D` `%H` placeholders.
///
/// The rendered value is cached when the pattern is set; a rotation fires
/// only when re-rendering for the current time yields a different name,
/// i.e. when the hour/day the pattern tracks has rolled over.
#[derive(Debug)]
struct PathPattern {
    template: String,
    last_rendered: String,
}

impl PathPattern {
    fn parse(template: &str, now: DateTime<Local>) -> Result<Self> {
        // Validate placeholders up front so a typo fails at setup, not at
        // the first rotation tick.
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                continue;
            }
            match chars.next() {
                Some('Y' | 'M' | 'D' | 'H') => {}
                Some(other) => {
                    return Err(LogError::config(
                        "rotate pattern",
                        format!("unknown placeholder '%{}' in '{}'", other, template),
                    ))
                }
                None => {
                    return Err(LogError::config(
                        "rotate pattern",
                        format!("dangling '%' in '{}'", template),
                    ))
                }
            }
        }
        let mut pattern = Self {
            template: template.to_string(),
            last_rendered: String::new(),
        };
        pattern.last_rendered = pattern.render(now);
        Ok(pattern)
    }

    fn render(&self, now: DateTime<Local>) -> String {
        let mut out = String::with_capacity(self.template.len() + 8);
        let mut chars = self.template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('Y') => out.push_str(&format!("{:04}", now.year())),
                Some('M') => out.push_str(&format!("{:02}", now.month())),
                Some('D') => out.push_str(&format!("{:02}", now.day())),
                Some('H') => out.push_str(&format!("{:02}", now.hour())),
                _ => unreachable!("validated in parse"),
            }
        }
        out
    }
}

/// Appends formatted records to a file, restricted to an inclusive level
/// window, with optional pattern-based rotation.
///
/// Called only by the single dispatch worker after registration, so it
/// carries no internal synchronization.
pub struct FileSink {
    path: PathBuf,
    pattern: Option<PathPattern>,
    level_floor: LogLevel,
    level_ceil: LogLevel,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pattern: None,
            level_floor: LogLevel::Trace,
            level_ceil: LogLevel::Fatal,
            writer: None,
        }
    }

    /// Restrict the sink to records whose level falls in `[floor, ceil]`.
    #[must_use]
    pub fn with_level_window(mut self, floor: LogLevel, ceil: LogLevel) -> Self {
        self.level_floor = floor;
        self.level_ceil = ceil;
        self
    }

    /// Configure the rotation naming template, e.g. `logs/app.log.%Y%M%D%H`.
    pub fn with_path_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(PathPattern::parse(pattern, Local::now())?);
        Ok(self)
    }

    pub fn floor(&self) -> LogLevel {
        self.level_floor
    }

    pub fn ceil(&self) -> LogLevel {
        self.level_ceil
    }

    fn open(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LogError::file_sink(
                        self.path.display().to_string(),
                        format!("failed to create directory '{}': {}", parent.display(), e),
                    )
                })?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LogError::file_sink(
                    self.path.display().to_string(),
                    format!("failed to open: {}", e),
                )
            })?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Rotation step against an explicit clock.
    fn rotate_at(&mut self, now: DateTime<Local>) -> Result<()> {
        let Some(pattern) = self.pattern.as_mut() else {
            return Ok(());
        };
        let rendered = pattern.render(now);
        if rendered == pattern.last_rendered {
            return Ok(());
        }
        // The tracked period rolled over: seal the current file under the
        // name of the period that just ended, then start fresh.
        let sealed_name = std::mem::replace(&mut pattern.last_rendered, rendered);

        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LogError::rotation(
                    self.path.display().to_string(),
                    format!("flush before rotation failed: {}", e),
                )
            })?;
        }
        if self.path.exists() {
            fs::rename(&self.path, Path::new(&sealed_name)).map_err(|e| {
                LogError::rotation(
                    self.path.display().to_string(),
                    format!("rename to '{}' failed: {}", sealed_name, e),
                )
            })?;
        }
        self.open()
    }
}

impl Sink for FileSink {
    fn init(&mut self) -> Result<()> {
        self.open()
    }

    fn write(&mut self, record: &Record) -> Result<()> {
        if record.level < self.level_floor || record.level > self.level_ceil {
            return Ok(());
        }
        let writer = self.writer.as_mut().ok_or_else(|| {
            LogError::file_sink(self.path.display().to_string(), "writer not initialized")
        })?;
        writeln!(writer, "{}", record).map_err(|e| {
            LogError::file_sink(
                self.path.display().to_string(),
                format!("failed to write record: {}", e),
            )
        })
    }

    fn name(&self) -> &str {
        "file"
    }

    fn as_flush(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }

    fn as_rotate(&mut self) -> Option<&mut dyn Rotate> {
        Some(self)
    }
}

impl Flush for FileSink {
    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().map_err(|e| {
                LogError::file_sink(
                    self.path.display().to_string(),
                    format!("failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Rotate for FileSink {
    fn rotate(&mut self) -> Result<()> {
        self.rotate_at(Local::now())
    }

    fn set_path_pattern(&mut self, pattern: &str) -> Result<()> {
        self.pattern = Some(PathPattern::parse(pattern, Local::now())?);
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
