//! Core types shared by the segmenter, the orderer and the renderers.
//!
//! A [`LogLine`] is one raw input line tagged with its origin. An [`Entry`] is
//! a header line plus the continuation lines that follow it in the same file.

use std::ops::Range;
use std::sync::Arc;

use crate::render::RenderRequest;
use crate::timestamp::Timestamp;

/// One line of input, line ending already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Source file name as given by the caller. Shared by every line of a file.
    pub filename: Arc<str>,
    /// 1-based line number within `filename`.
    pub line_number: usize,
    pub text: String,
}

impl LogLine {
    pub fn new(filename: impl Into<Arc<str>>, line_number: usize, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            line_number,
            text: text.into(),
        }
    }
}

/// One logical log record: a header line and its continuation lines.
///
/// The header is stored apart from the body so an entry can never be empty.
/// Lines are only ever appended, and only by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub filename: Arc<str>,
    /// Line number of the header within `filename`.
    pub line_number: usize,
    pub timestamp: Timestamp,
    /// Byte offset of the header pattern match within the header line.
    pub match_start: usize,
    /// Byte length of the header pattern match.
    pub match_len: usize,
    header: String,
    body: Vec<String>,
}

impl Entry {
    /// Start an entry from a header line whose pattern match covers `span`.
    pub fn new(
        filename: impl Into<Arc<str>>,
        line_number: usize,
        timestamp: Timestamp,
        header: impl Into<String>,
        span: Range<usize>,
    ) -> Self {
        Self {
            filename: filename.into(),
            line_number,
            timestamp,
            match_start: span.start,
            match_len: span.len(),
            header: header.into(),
            body: Vec::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: String) {
        self.body.push(line);
    }

    /// The exact header line text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Continuation lines, in file order.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Header followed by the body.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_str()).chain(self.body.iter().map(String::as_str))
    }

    pub fn line_count(&self) -> usize {
        1 + self.body.len()
    }

    /// Byte range of the header pattern match within [`Entry::header`].
    pub fn header_match(&self) -> Range<usize> {
        self.match_start..self.match_start + self.match_len
    }

    pub fn render_request(&self) -> RenderRequest<'_> {
        RenderRequest {
            first_line: &self.header,
            match_start: self.match_start,
            match_len: self.match_len,
            continuation_lines: &self.body,
        }
    }
}
