use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

use env_log_layer::init::LoggerConfig;
use env_log_layer::layer::Logger;
use env_log_layer::sink::MemorySink;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

fn capture(config: LoggerConfig, f: impl FnOnce()) -> Vec<String> {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(&config, Arc::new(sink.clone()));
    tracing::subscriber::with_default(Registry::default().with(logger), f);
    sink.lines()
}

fn json(line: &str) -> serde_json::Value {
    serde_json::from_str(line).expect("valid json line")
}

#[derive(Debug)]
struct StartupError {
    source: io::Error,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "startup failed")
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[test]
fn error_fields_are_hoisted_in_order() {
    let lines = capture(LoggerConfig::default(), || {
        let a = io::Error::new(io::ErrorKind::NotFound, "a missing");
        let b = io::Error::new(io::ErrorKind::PermissionDenied, "b denied");
        error!(
            first = &a as &(dyn Error + 'static),
            second = &b as &(dyn Error + 'static),
            "two failures"
        );
    });

    assert_eq!(lines.len(), 1);
    let value = json(&lines[0]);
    assert_eq!(value["level"], "error");
    assert_eq!(value["message"], "two failures");
    assert_eq!(value["error"], "a missing");
    assert_eq!(value["error0"], "b denied");
    assert!(value.get("first").is_none());
    assert!(value.get("second").is_none());
    assert!(value.get("error1").is_none());
}

#[test]
fn source_chain_is_flattened_onto_one_line() {
    let lines = capture(LoggerConfig::default(), || {
        let err = StartupError {
            source: io::Error::new(io::ErrorKind::NotFound, "config.toml missing"),
        };
        error!(cause = &err as &(dyn Error + 'static), "cannot start");
    });

    let value = json(&lines[0]);
    assert_eq!(value["error"], "startup failed | caused by: config.toml missing");
}

#[test]
fn plain_fields_and_formatted_message_are_kept() {
    let lines = capture(LoggerConfig::default(), || {
        info!(user_id = 42, admin = false, ratio = 0.5, "user {} logged in", "ann");
    });

    let value = json(&lines[0]);
    assert_eq!(value["message"], "user ann logged in");
    assert_eq!(value["user_id"], 42);
    assert_eq!(value["admin"], false);
    assert_eq!(value["ratio"], 0.5);
    assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn caller_error_field_is_never_overwritten() {
    let lines = capture(LoggerConfig::default(), || {
        let err = io::Error::new(io::ErrorKind::Other, "boom");
        error!(error = "caller text", cause = &err as &(dyn Error + 'static), "failed");
    });

    let value = json(&lines[0]);
    assert_eq!(value["error"], "caller text");
    assert_eq!(value["error0"], "boom");
}

#[test]
fn events_below_level_are_skipped() {
    let config = LoggerConfig { level: LevelFilter::WARN, ..Default::default() };
    let lines = capture(config, || {
        debug!("debug");
        info!("info");
        warn!("warn");
        error!("error");
    });

    let levels: Vec<_> = lines.iter().map(|l| json(l)["level"].as_str().unwrap().to_string()).collect();
    assert_eq!(levels, vec!["warn", "error"]);
}

#[test]
fn silent_logger_writes_nothing() {
    let config = LoggerConfig { silent: true, ..Default::default() };
    let lines = capture(config, || {
        error!("should not appear");
    });
    assert!(lines.is_empty());
}

#[test]
fn simple_format_is_single_line() {
    let config = LoggerConfig { format: "simple".into(), ..Default::default() };
    let lines = capture(config, || {
        let err = io::Error::new(io::ErrorKind::Other, "disk failure");
        warn!(free_mb = 3, cause = &err as &(dyn Error + 'static), "disk low");
    });

    let line = &lines[0];
    assert!(line.starts_with("warn: disk low {"), "{line}");
    let rest: serde_json::Value = serde_json::from_str(&line["warn: disk low ".len()..]).unwrap();
    assert_eq!(rest["free_mb"], 3);
    assert_eq!(rest["error"], "disk failure");
    assert!(rest["timestamp"].is_string());
}

#[test]
fn unknown_format_uses_json() {
    let config = LoggerConfig { format: "unknown-value".into(), ..Default::default() };
    let lines = capture(config, || info!("still json"));
    assert_eq!(json(&lines[0])["message"], "still json");
}

#[cfg(feature = "color")]
#[test]
fn colors_wrap_the_level() {
    let config = LoggerConfig { colors: true, ..Default::default() };
    let lines = capture(config, || info!("colored"));
    let level = json(&lines[0])["level"].as_str().unwrap().to_string();
    assert!(level.starts_with('\u{1b}'));
    assert!(level.contains("info"));
}
