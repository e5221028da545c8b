//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - Concurrent delivery and ordering guarantees
//! - Graceful drain on close
//! - Level thresholds and sink level windows
//! - Lazy evaluation of macro arguments
//! - Configuration-driven setup

use log_relay::{debug, error, info};
use log_relay::{ConsoleSink, FileSink, LogConfig, LogError, LogLevel, Logger};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_end_to_end_file_and_console() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(
            FileSink::new(&log_file).with_level_window(LogLevel::Trace, LogLevel::Error),
        ))
        .expect("failed to register file sink");
    logger
        .register(Box::new(ConsoleSink::new().with_color(false)))
        .expect("failed to register console sink");

    logger.trace("starting up");
    logger.error("something broke");
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2, "expected exactly two lines: {:?}", lines);
    assert!(lines[0].starts_with("[TRACE]"));
    assert!(lines[0].ends_with("starting up"));
    assert!(lines[1].starts_with("[ERROR]"));
    assert!(lines[1].ends_with("something broke"));
}

#[test]
fn test_drain_on_close_delivers_every_record() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("drain.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    for i in 0..200 {
        logger.info(format!("message {}", i));
    }
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 200);
    for (i, line) in lines.iter().enumerate() {
        assert!(
            line.ends_with(&format!("message {}", i)),
            "out of order at {}: {}",
            i,
            line
        );
    }
}

#[test]
fn test_concurrent_producers_all_delivered_in_per_thread_order() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let logger = Arc::new(Logger::new());
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    let mut handles = vec![];
    for thread_id in 0..8 {
        let logger = Arc::clone(&logger);
        handles.push(std::thread::spawn(move || {
            for i in 0..50 {
                logger.info(format!("thread {} message {}", thread_id, i));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("producer thread panicked");
    }
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 8 * 50);

    // Arrival order is FIFO, so each producer's messages appear in its own
    // submission order even when interleaved with the others.
    for thread_id in 0..8 {
        let needle = format!("thread {} message ", thread_id);
        let sequence: Vec<usize> = lines
            .iter()
            .filter_map(|line| {
                line.split(&needle)
                    .nth(1)
                    .and_then(|n| n.parse::<usize>().ok())
            })
            .collect();
        assert_eq!(sequence.len(), 50);
        assert!(
            sequence.windows(2).all(|w| w[0] < w[1]),
            "thread {} order violated: {:?}",
            thread_id,
            sequence
        );
    }
}

#[test]
fn test_backpressure_blocks_instead_of_dropping() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("backpressure.log");

    // Tiny queue: producers must block while the worker catches up.
    let logger = Logger::with_capacity(4);
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    for i in 0..100 {
        logger.info(format!("burst {}", i));
    }
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    assert_eq!(content.lines().count(), 100);
}

#[test]
fn test_level_window_filters_exactly() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let wf_file = temp_dir.path().join("app.wf.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(
            FileSink::new(&wf_file).with_level_window(LogLevel::Warning, LogLevel::Error),
        ))
        .expect("failed to register sink");

    logger.trace("no");
    logger.debug("no");
    logger.info("no");
    logger.warn("yes");
    logger.error("yes");
    logger.fatal("no");
    logger.close();

    let content = fs::read_to_string(&wf_file).expect("failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2, "window must admit exactly WARN and ERROR");
    assert!(lines[0].starts_with("[WARN]"));
    assert!(lines[1].starts_with("[ERROR]"));
}

#[test]
fn test_below_threshold_macro_arguments_not_evaluated() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("lazy.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Info);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    let evaluated = AtomicBool::new(false);
    let probe = || {
        evaluated.store(true, Ordering::SeqCst);
        "computed"
    };

    debug!(logger, "dropped: {}", probe());
    logger.close();

    assert!(
        !evaluated.load(Ordering::SeqCst),
        "below-threshold call evaluated its arguments"
    );
    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    assert!(content.is_empty(), "no sink write expected: {:?}", content);
}

#[test]
fn test_macro_call_site_appears_as_location() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("location.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    info!(logger, "located");
    error!(logger, "also located");
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    for line in content.lines() {
        assert!(
            line.contains("integration_tests.rs:"),
            "expected this file as the call site: {}",
            line
        );
    }
}

#[test]
fn test_line_format_shape() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("format.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger.set_layout("%Y/%m/%d %H:%M:%S");
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    logger.warn("formatted");
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    let line = content.lines().next().expect("one line expected");

    // [LEVEL][timestamp][file:line] message
    let mut parts = line.splitn(4, ']');
    let level = parts.next().unwrap();
    let time = parts.next().unwrap();
    let location = parts.next().unwrap();
    let message = parts.next().unwrap();
    assert_eq!(level, "[WARN");
    assert_eq!(time.len(), "[2026/08/08 10:30:45".len());
    assert!(location.starts_with("[integration_tests.rs:"));
    assert_eq!(message, " formatted");
}

#[test]
fn test_multiline_messages_stay_on_one_line() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("injection.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    logger.info("user login\n[ERROR][fake][x:1] forged entry");
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("\\n"));
}

#[test]
fn test_threshold_change_affects_only_later_calls() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_file = temp_dir.path().join("threshold.log");

    let logger = Logger::new();
    logger.set_level(LogLevel::Trace);
    logger
        .register(Box::new(FileSink::new(&log_file)))
        .expect("failed to register sink");

    logger.debug("admitted");
    logger.set_level(LogLevel::Error);
    logger.debug("rejected");
    logger.error("still admitted");
    logger.close();

    let content = fs::read_to_string(&log_file).expect("failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("admitted"));
    assert!(lines[1].ends_with("still admitted"));
}

#[test]
fn test_setup_from_config_general_and_warn_files() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_path = temp_dir.path().join("app.log");
    let wf_path = temp_dir.path().join("app.wf.log");

    let config_text = format!(
        r#"
[log]
log_level = "trace"

[log.file_writer]
on = true
log_path = "{}"
wf_log_path = "{}"

[log.console_writer]
on = false
"#,
        log_path.display(),
        wf_path.display()
    );
    let config: log_relay::BaseConfig = toml::from_str(&config_text).expect("config parses");

    let logger = Logger::new();
    log_relay::config::setup_logger(&config.log, &logger).expect("setup succeeds");

    logger.trace("general only");
    logger.info("general only too");
    logger.warn("warn file");
    logger.error("warn file too");
    logger.close();

    // With a warn file configured the general sink is capped at Info.
    let general = fs::read_to_string(&log_path).expect("failed to read general log");
    assert_eq!(general.lines().count(), 2);
    assert!(general.contains("general only"));
    assert!(!general.contains("warn file"));

    let wf = fs::read_to_string(&wf_path).expect("failed to read warn log");
    assert_eq!(wf.lines().count(), 2);
    assert!(wf.contains("warn file"));
    assert!(!wf.contains("general only"));
}

#[test]
fn test_setup_from_config_without_warn_file_spans_to_error() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let log_path = temp_dir.path().join("solo.log");

    let config = LogConfig {
        log_level: "trace".to_string(),
        file_writer: log_relay::FileWriterConfig {
            on: true,
            log_path: log_path.display().to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let logger = Logger::new();
    log_relay::config::setup_logger(&config, &logger).expect("setup succeeds");

    logger.info("kept");
    logger.error("kept too");
    logger.fatal("above the ceiling");
    logger.close();

    let content = fs::read_to_string(&log_path).expect("failed to read log");
    assert_eq!(content.lines().count(), 2);
    assert!(!content.contains("above the ceiling"));
}

#[test]
fn test_register_surfaces_sink_init_failure() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    // A directory cannot be opened for appending.
    let logger = Logger::new();
    let err = logger
        .register(Box::new(FileSink::new(temp_dir.path())))
        .unwrap_err();
    assert!(matches!(err, LogError::SinkInit { .. }));
    logger.close();
}
