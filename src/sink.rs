use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for rendered log lines.
///
/// The logger calls `write_line` once per record, on the thread that issued
/// the log call, and ignores the result: a failed write is dropped rather
/// than surfaced to the application.
pub trait LineSink: Send + Sync {
    /// Write one line. `line` carries no trailing newline; the sink adds
    /// whatever terminator it needs.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Writes every line to the process's standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        // One locked write per line keeps concurrent records from
        // interleaving mid-line.
        let mut out = io::stdout().lock();
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        out.write_all(buf.as_bytes())
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove and return everything written so far.
    pub fn take(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut lines = self.lines.lock().map_err(|_| io::Error::other("memory sink poisoned"))?;
        lines.push(line.to_string());
        Ok(())
    }
}
