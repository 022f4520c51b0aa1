use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::record::{format_timestamp, LogRecord};

/// Final serialization of a fully transformed [`LogRecord`] into the line
/// handed to the sink (without trailing newline).
pub trait OutputFormat: Send + Sync {
    fn render(&self, record: &LogRecord) -> String;
}

/// One JSON object per line: `level`, `message`, extra fields, `timestamp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl OutputFormat for JsonFormat {
    fn render(&self, record: &LogRecord) -> String {
        serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Human-readable single line: `level: message {rest}`.
///
/// `rest` is a JSON object of every field except `level` and `message`
/// and is omitted when empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFormat;

impl OutputFormat for SimpleFormat {
    fn render(&self, record: &LogRecord) -> String {
        let mut line = format!("{}: {}", record.level, record.message);

        let mut rest: serde_json::Map<String, serde_json::Value> = record
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(ts) = &record.timestamp {
            rest.insert("timestamp".to_string(), format_timestamp(ts).into());
        }

        if !rest.is_empty() {
            line.push(' ');
            line.push_str(&serde_json::Value::Object(rest).to_string());
        }
        line
    }
}

/// Name of the format used when the requested one is not registered.
pub const DEFAULT_FORMAT: &str = "default";

/// Named output formats.
///
/// Ships with `default` and `json` (both [`JsonFormat`]) and `simple`
/// ([`SimpleFormat`]). Additional formats can be registered under new
/// names; lookups of unknown names fall back to `default`.
#[derive(Clone)]
pub struct FormatTable {
    formats: HashMap<String, Arc<dyn OutputFormat>>,
}

impl FormatTable {
    /// Table with the built-in formats.
    pub fn builtin() -> Self {
        let mut table = FormatTable { formats: HashMap::new() };
        table.register(DEFAULT_FORMAT, JsonFormat);
        table.register("json", JsonFormat);
        table.register("simple", SimpleFormat);
        table
    }

    /// Add or replace the format stored under `name`.
    pub fn register(&mut self, name: impl Into<String>, format: impl OutputFormat + 'static) {
        self.formats.insert(name.into(), Arc::new(format));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OutputFormat>> {
        self.formats.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Look up `name`, falling back to `default` and finally to
    /// [`JsonFormat`] if even that was never registered.
    pub fn resolve(&self, name: &str) -> Arc<dyn OutputFormat> {
        self.get(name)
            .or_else(|| self.get(DEFAULT_FORMAT))
            .unwrap_or_else(|| Arc::new(JsonFormat))
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formats.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for FormatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatTable").field("names", &self.names()).finish()
    }
}
