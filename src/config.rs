//! TOML configuration schema and pipeline setup

use crate::core::error::{LogError, Result};
use crate::core::global;
use crate::core::level::LogLevel;
use crate::core::logger::Logger;
use crate::sinks::{ConsoleSink, FileSink};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_DEBUG_MODE: &str = "debug";
pub const DEFAULT_TIME_LOCATION: &str = "Asia/Chongqing";
pub const DEFAULT_LOG_LEVEL: &str = "trace";

/// Timestamp layout applied by [`init_from_file`] after setup.
pub const BOOTSTRAP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Top-level application configuration.
///
/// `debug_mode` and `time_location` may be given at the top level or under
/// `[base]`; [`BaseConfig::resolve`] applies the fallback chain
/// top-level → `base.*` → hardcoded default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    pub debug_mode: String,
    pub time_location: String,
    pub base: BaseSection,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BaseSection {
    pub debug_mode: String,
    pub time_location: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub log_level: String,
    pub file_writer: FileWriterConfig,
    pub console_writer: ConsoleWriterConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileWriterConfig {
    pub on: bool,
    pub log_path: String,
    pub rotate_log_path: String,
    pub wf_log_path: String,
    pub rotate_wf_log_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsoleWriterConfig {
    pub on: bool,
    pub color: bool,
}

impl BaseConfig {
    /// Apply the fallback chain for keys left empty in the file.
    pub fn resolve(&mut self) {
        if self.debug_mode.is_empty() {
            self.debug_mode = if self.base.debug_mode.is_empty() {
                DEFAULT_DEBUG_MODE.to_string()
            } else {
                self.base.debug_mode.clone()
            };
        }
        if self.time_location.is_empty() {
            self.time_location = if self.base.time_location.is_empty() {
                DEFAULT_TIME_LOCATION.to_string()
            } else {
                self.base.time_location.clone()
            };
        }
        if self.log.log_level.is_empty() {
            self.log.log_level = DEFAULT_LOG_LEVEL.to_string();
        }
    }
}

/// Read and parse a TOML configuration file, then resolve fallbacks.
pub fn load(path: impl AsRef<Path>) -> Result<BaseConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|e| LogError::ConfigRead {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut config: BaseConfig = toml::from_str(&data).map_err(|e| LogError::ConfigParse {
        path: path.display().to_string(),
        source: e,
    })?;
    config.resolve();
    Ok(config)
}

/// Wire sinks and level onto `logger` according to `config`.
///
/// When a dedicated warn-file is configured, the general file sink is capped
/// at Info and warnings/errors flow only to the warn file (Warning..Error);
/// otherwise the general sink spans Trace..Error. An unrecognized level name
/// fails here, at setup, never lazily during logging.
pub fn setup_logger(config: &LogConfig, logger: &Logger) -> Result<()> {
    let fw = &config.file_writer;
    if fw.on {
        if !fw.log_path.is_empty() {
            let ceil = if fw.wf_log_path.is_empty() {
                LogLevel::Error
            } else {
                LogLevel::Info
            };
            let mut sink = FileSink::new(&fw.log_path).with_level_window(LogLevel::Trace, ceil);
            if !fw.rotate_log_path.is_empty() {
                sink = sink.with_path_pattern(&fw.rotate_log_path)?;
            }
            logger.register(Box::new(sink))?;
        }

        if !fw.wf_log_path.is_empty() {
            let mut sink = FileSink::new(&fw.wf_log_path)
                .with_level_window(LogLevel::Warning, LogLevel::Error);
            if !fw.rotate_wf_log_path.is_empty() {
                sink = sink.with_path_pattern(&fw.rotate_wf_log_path)?;
            }
            logger.register(Box::new(sink))?;
        }
    }

    if config.console_writer.on {
        let sink = ConsoleSink::new().with_color(config.console_writer.color);
        logger.register(Box::new(sink))?;
    }

    logger.set_level(config.log_level.parse()?);
    Ok(())
}

/// Set up the process-wide default logger from `config`.
pub fn setup_default(config: &LogConfig) -> Result<()> {
    setup_logger(config, &global::logger())
}

/// Bootstrap entry point: load the file, configure the default logger, and
/// apply the bootstrap timestamp layout. Returns the resolved configuration
/// for the host application.
pub fn init_from_file(path: impl AsRef<Path>) -> Result<BaseConfig> {
    let config = load(path)?;
    setup_default(&config.log)?;
    global::set_layout(BOOTSTRAP_LAYOUT);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> BaseConfig {
        let mut config: BaseConfig = toml::from_str(s).unwrap();
        config.resolve();
        config
    }

    #[test]
    fn resolve_prefers_top_level_keys() {
        let config = parse(
            r#"
debug_mode = "release"
time_location = "UTC"

[base]
debug_mode = "debug"
time_location = "Asia/Shanghai"
"#,
        );
        assert_eq!(config.debug_mode, "release");
        assert_eq!(config.time_location, "UTC");
    }

    #[test]
    fn resolve_falls_back_to_base_section() {
        let config = parse(
            r#"
[base]
debug_mode = "release"
time_location = "UTC"
"#,
        );
        assert_eq!(config.debug_mode, "release");
        assert_eq!(config.time_location, "UTC");
    }

    #[test]
    fn resolve_falls_back_to_hardcoded_defaults() {
        let config = parse("");
        assert_eq!(config.debug_mode, DEFAULT_DEBUG_MODE);
        assert_eq!(config.time_location, DEFAULT_TIME_LOCATION);
        assert_eq!(config.log.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn parses_full_log_section() {
        let config = parse(
            r#"
[log]
log_level = "warning"

[log.file_writer]
on = true
log_path = "logs/app.log"
rotate_log_path = "logs/app.log.%Y%M%D%H"
wf_log_path = "logs/app.wf.log"
rotate_wf_log_path = "logs/app.wf.log.%Y%M%D%H"

[log.console_writer]
on = true
color = true
"#,
        );
        assert_eq!(config.log.log_level, "warning");
        assert!(config.log.file_writer.on);
        assert_eq!(config.log.file_writer.wf_log_path, "logs/app.wf.log");
        assert!(config.log.console_writer.color);
    }

    #[test]
    fn setup_rejects_unknown_level_name() {
        let logger = Logger::new();
        let config = LogConfig {
            log_level: "loud".to_string(),
            ..LogConfig::default()
        };
        let err = setup_logger(&config, &logger).unwrap_err();
        assert!(matches!(err, LogError::InvalidLevel { .. }));
        logger.close();
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, LogError::ConfigRead { .. }));
    }

    #[test]
    fn load_reports_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "log_level = [unclosed").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, LogError::ConfigParse { .. }));
    }
}
