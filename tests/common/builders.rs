//! Test builders for log lines and entries.
//!
//! These builders are for readability in tests, not production use. They
//! panic on invalid input rather than returning `Result`.

use chrono::DateTime;
use logmerge_core::{Entry, LogLine, Timestamp};

/// Number `lines` from 1 and attribute them to `filename`.
pub fn lines_for(filename: &str, lines: &[&str]) -> Vec<LogLine> {
    lines
        .iter()
        .enumerate()
        .map(|(i, text)| LogLine::new(filename, i + 1, *text))
        .collect()
}

/// Concatenate several files' lines in the given order.
pub fn files(parts: &[(&str, &[&str])]) -> Vec<LogLine> {
    parts
        .iter()
        .flat_map(|(name, lines)| lines_for(name, lines))
        .collect()
}

/// Parse an RFC 3339 timestamp.
pub fn ts(s: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(s).unwrap_or_else(|e| panic!("bad test timestamp {s:?}: {e}"))
}

/// Fluent builder for [`Entry`] fixtures.
///
/// ```rust
/// let entry = EntryBuilder::new("a.log", 3).at("2024-01-01T10:00:00Z").build();
/// ```
pub struct EntryBuilder {
    filename: String,
    line_number: usize,
    timestamp: Timestamp,
    message: String,
}

impl EntryBuilder {
    pub fn new(filename: &str, line_number: usize) -> Self {
        Self {
            filename: filename.to_string(),
            line_number,
            timestamp: ts("2024-01-01T10:00:00Z"),
            message: "message".to_string(),
        }
    }

    pub fn at(mut self, timestamp: &str) -> Self {
        self.timestamp = ts(timestamp);
        self
    }

    pub fn at_ts(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn build(self) -> Entry {
        let stamp = self.timestamp.to_rfc3339();
        let header = format!("{stamp} INFO {}", self.message);
        Entry::new(
            self.filename,
            self.line_number,
            self.timestamp,
            header,
            0..stamp.len(),
        )
    }
}
