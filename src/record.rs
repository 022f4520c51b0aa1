use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;

/// Field names owned by the record itself. They are always reported as
/// present so that no formatting stage can hand them out again.
pub const RESERVED_KEYS: [&str; 3] = ["level", "message", "timestamp"];

/// One log call, mutated in place by every formatting stage before it is
/// rendered by an output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: String,
    pub message: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "rfc3339_millis")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-03-01T12:30:05.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn rfc3339_millis<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => s.serialize_str(&format_timestamp(ts)),
        None => s.serialize_none(),
    }
}

impl LogRecord {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        LogRecord {
            level: level.into(),
            message: message.into(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Whether `key` names a reserved field or an extra field of this record.
    pub fn contains_key(&self, key: &str) -> bool {
        RESERVED_KEYS.contains(&key) || self.fields.contains_key(key)
    }

    /// Store `value` under `key` unless the name is already taken.
    ///
    /// Returns `false` and leaves the record untouched on collision.
    pub fn insert_new(&mut self, key: impl Into<String>, value: serde_json::Value) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.fields.insert(key, value);
        true
    }
}

/// An error passed alongside the message of a log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub message: String,
    /// Multi-line trace. `None` when the producer had nothing to offer.
    pub stack: Option<String>,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorValue { message: message.into(), stack: None }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Capture a `std::error::Error` and its `source()` chain.
    ///
    /// The trace starts with the error's own message; every source adds a
    /// `"\n    caused by: ..."` line, so flattening yields
    /// `"outer | caused by: inner"`.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = message.clone();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        ErrorValue { message, stack: Some(stack) }
    }
}

/// One entry of the extra arguments of a log call, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Error(ErrorValue),
    Value {
        name: String,
        value: serde_json::Value,
    },
}

impl LogArg {
    pub fn value(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        LogArg::Value { name: name.into(), value: value.into() }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            LogArg::Error(e) => Some(e),
            LogArg::Value { .. } => None,
        }
    }
}

impl From<ErrorValue> for LogArg {
    fn from(e: ErrorValue) -> Self {
        LogArg::Error(e)
    }
}
