use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use env_log_layer::{
    init::LoggerConfig,
    layer::Logger,
    output::{FormatTable, OutputFormat},
    record::LogRecord,
    sink::LineSink,
};

/// Example of adding a named output format and a custom sink. Imagine the
/// sink forwards to a syslog daemon; here it just prints with a prefix.
struct Logfmt;

impl OutputFormat for Logfmt {
    fn render(&self, record: &LogRecord) -> String {
        let mut line = format!("level={} msg={:?}", record.level, record.message);
        for (key, value) in &record.fields {
            line.push_str(&format!(" {}={}", key, value));
        }
        line
    }
}

struct PrefixedStdout;

impl LineSink for PrefixedStdout {
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        println!("[my-syslog] {}", line);
        Ok(())
    }
}

fn main() {
    let mut formats = FormatTable::builtin();
    formats.register("logfmt", Logfmt);

    let config = LoggerConfig { format: "logfmt".to_string(), ..LoggerConfig::from_env() };
    let logger = Logger::new(&config, &formats, Arc::new(PrefixedStdout));
    if tracing::subscriber::set_global_default(Registry::default().with(logger)).is_err() {
        return;
    }

    info!("custom format example started");
    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    error!(upstream = "billing", cause = &err as &(dyn std::error::Error + 'static), "request failed");
}
