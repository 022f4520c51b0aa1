use crate::free_key::free_key;
use crate::record::{LogArg, LogRecord};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// A single in-place transformation applied to every [`LogRecord`] before
/// it reaches the output format.
///
/// **Parameters**
/// - `record`: the record being built for the current log call.
/// - `args`: the extra arguments of the call, in call order. Stages that do
///   not care about them simply ignore the slice.
///
/// Stages must not fail: whatever they cannot make sense of is skipped.
pub trait RecordFormat: Send + Sync {
    fn transform(&self, record: &mut LogRecord, args: &[LogArg]);
}

/// Stores the stack of every error argument under a free `error` key:
/// `error`, then `error0`, `error1`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorFields {
    /// Replace every newline followed by whitespace with `" | "` so the
    /// trace fits on one line.
    pub flatten_newlines: bool,
}

const ERROR_KEY: &str = "error";

fn newline_run() -> &'static Regex {
    static NEWLINE_RUN: OnceLock<Regex> = OnceLock::new();
    NEWLINE_RUN.get_or_init(|| Regex::new(r"\n\s+").expect("static pattern"))
}

/// Collapse each newline plus following whitespace into `" | "`.
pub fn flatten_newlines(stack: &str) -> String {
    newline_run().replace_all(stack, " | ").into_owned()
}

impl ErrorFields {
    pub fn new(flatten_newlines: bool) -> Self {
        ErrorFields { flatten_newlines }
    }
}

impl RecordFormat for ErrorFields {
    fn transform(&self, record: &mut LogRecord, args: &[LogArg]) {
        for err in args.iter().filter_map(LogArg::as_error) {
            // A missing trace still claims its key so later errors keep
            // their position in the numbering.
            let stack = match err.stack.as_deref() {
                Some(stack) if self.flatten_newlines => flatten_newlines(stack),
                Some(stack) => stack.to_string(),
                None => String::new(),
            };
            let key = free_key(&*record, ERROR_KEY).into_owned();
            record.fields.insert(key, serde_json::Value::String(stack));
        }
    }
}

/// Wraps the level name in ANSI colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Colorize;

impl RecordFormat for Colorize {
    #[cfg(feature = "color")]
    fn transform(&self, record: &mut LogRecord, _args: &[LogArg]) {
        let styled = console::style(record.level.as_str()).force_styling(true);
        let styled = match record.level.as_str() {
            "error" => styled.red(),
            "warn" => styled.yellow(),
            "info" => styled.green(),
            "debug" => styled.blue(),
            "trace" => styled.magenta(),
            _ => return,
        };
        record.level = styled.to_string();
    }

    #[cfg(not(feature = "color"))]
    fn transform(&self, _record: &mut LogRecord, _args: &[LogArg]) {}
}

/// Stamps the record with the current UTC time.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    clock: fn() -> DateTime<Utc>,
}

impl Timestamp {
    /// Use a fixed clock instead of the system one.
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Timestamp { clock }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp { clock: Utc::now }
    }
}

impl RecordFormat for Timestamp {
    fn transform(&self, record: &mut LogRecord, _args: &[LogArg]) {
        record.timestamp = Some((self.clock)());
    }
}

/// Ordered list of stages run on every record.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn RecordFormat>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: impl RecordFormat + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn with(mut self, stage: impl RecordFormat + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl RecordFormat for Pipeline {
    fn transform(&self, record: &mut LogRecord, args: &[LogArg]) {
        for stage in &self.stages {
            stage.transform(record, args);
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stages.len()).finish()
    }
}
