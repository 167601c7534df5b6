//! Local, human-readable record of each delivery attempt.

use crate::domain::{DeliveryResult, LogEvent};
use parking_lot::Mutex;
use std::io::Write;

/// Destination for one-line attempt reports.
///
/// Implementations must not fail the caller: write errors are dropped.
pub trait ReportSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes report lines to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

/// Keeps report lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl ReportSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// `Sent [info]: User login successful -> 200`
/// `Failed [error]: Database connection timeout -> request timed out after 500ms`
pub fn format_report(event: &LogEvent, result: &DeliveryResult) -> String {
    match result {
        DeliveryResult::Delivered { status, .. } => {
            format!(
                "Sent [{}]: {} -> {}",
                event.level(),
                single_line(event.message()),
                status
            )
        }
        DeliveryResult::Failed(fault) => format!(
            "Failed [{}]: {} -> {}",
            event.level(),
            single_line(event.message()),
            single_line(&fault.to_string())
        ),
    }
}

/// Escapes control characters (`\n` becomes `\\n`) so a report stays on one line.
fn single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
