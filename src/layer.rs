use crate::format::{Pipeline, RecordFormat};
use crate::free_key::free_key;
use crate::init::LoggerConfig;
use crate::output::{FormatTable, OutputFormat};
use crate::record::{ErrorValue, LogArg, LogRecord};
use crate::sink::LineSink;
use std::error::Error;
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// The assembled logger: level gate, formatting pipeline, output format
/// and sink.
///
/// Built once from a [`LoggerConfig`] and never reconfigured. It is a
/// `tracing_subscriber` [`Layer`], so installing it makes every `tracing`
/// event in the process flow through the pipeline; [`Logger::log`] offers
/// the same path without `tracing`.
pub struct Logger {
    level: LevelFilter,
    silent: bool,
    pipeline: Pipeline,
    output: Arc<dyn OutputFormat>,
    sink: Arc<dyn LineSink>,
    /// Lines accepted by the sink.
    pub written_lines: Arc<AtomicU64>,
    /// Lines the sink failed to write. They are not retried.
    pub failed_writes: Arc<AtomicU64>,
}

impl Logger {
    /// Assemble a logger from `config`, picking the output format from
    /// `formats` by name.
    pub fn new(config: &LoggerConfig, formats: &FormatTable, sink: Arc<dyn LineSink>) -> Self {
        Logger {
            level: config.level,
            silent: config.silent,
            pipeline: config.pipeline(),
            output: formats.resolve(&config.format),
            sink,
            written_lines: Arc::new(AtomicU64::new(0)),
            failed_writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Same as [`Logger::new`] with the built-in format table.
    pub fn with_sink(config: &LoggerConfig, sink: Arc<dyn LineSink>) -> Self {
        Self::new(config, &FormatTable::builtin(), sink)
    }

    /// Most verbose level that can produce output; `OFF` when silent.
    pub fn max_level(&self) -> LevelFilter {
        if self.silent {
            LevelFilter::OFF
        } else {
            self.level
        }
    }

    pub fn is_enabled(&self, level: &Level) -> bool {
        *level <= self.max_level()
    }

    /// Log `message` at `level` with extra arguments.
    ///
    /// Plain values are merged into the record under free keys, error
    /// values are left to the pipeline.
    pub fn log(&self, level: Level, message: impl Into<String>, args: &[LogArg]) {
        if !self.is_enabled(&level) {
            return;
        }
        let record = self.record(level, message.into(), args);
        self.emit(record, args);
    }

    /// Run the pipeline and output format without touching the sink.
    pub fn render(&self, mut record: LogRecord, args: &[LogArg]) -> String {
        self.pipeline.transform(&mut record, args);
        self.output.render(&record)
    }

    fn record(&self, level: Level, message: String, args: &[LogArg]) -> LogRecord {
        let mut record = LogRecord::new(level.as_str().to_ascii_lowercase(), message);
        for arg in args {
            if let LogArg::Value { name, value } = arg {
                let key = free_key(&record, name).into_owned();
                record.fields.insert(key, value.clone());
            }
        }
        record
    }

    fn emit(&self, record: LogRecord, args: &[LogArg]) {
        let line = self.render(record, args);
        match self.sink.write_line(&line) {
            Ok(()) => {
                self.written_lines.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.failed_writes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("silent", &self.silent)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for Logger
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.is_enabled(metadata.level())
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.max_level())
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if !self.is_enabled(&level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();
        self.log(level, message, &visitor.args);
    }
}

use tracing::field::{Field, Visit};

/// Collects the fields of a `tracing` event: `message` separately, every
/// other field as a [`LogArg`] in recording order.
#[derive(Debug, Default)]
pub struct FieldVisitor {
    pub message: Option<String>,
    pub args: Vec<LogArg>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: serde_json::Value) {
        self.args.push(LogArg::Value { name: field.name().to_string(), value });
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.push(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, serde_json::Value::from(value));
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn Error + 'static)) {
        self.args.push(LogArg::Error(ErrorValue::from_error(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
