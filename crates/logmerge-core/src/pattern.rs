//! Header pattern and text predicates.
//!
//! The header pattern is a user-supplied regex, matched case-insensitively.
//! Capture group 1 holds the entry timestamp; group 2, when present, holds the
//! field the `--filter` text is tested against.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

use crate::error::ConfigurationError;

/// A compiled header pattern with at least one capture group.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    regex: Regex,
}

/// The parts of a header line the segmenter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch<'t> {
    /// Byte range of the whole pattern match within the line.
    pub span: Range<usize>,
    /// Capture group 1; empty if the group did not participate.
    pub timestamp: &'t str,
    /// Capture group 2, if the pattern has one and it participated.
    pub field: Option<&'t str>,
}

impl HeaderPattern {
    pub fn new(pattern: &str) -> Result<Self, ConfigurationError> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        // captures_len counts the implicit whole-match group 0.
        if regex.captures_len() < 2 {
            return Err(ConfigurationError::MissingTimestampGroup);
        }
        Ok(Self { regex })
    }

    /// Whether the pattern defines a second capture group to filter on.
    pub fn has_field_group(&self) -> bool {
        self.regex.captures_len() >= 3
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Match `text` as a header line, or `None` for a continuation line.
    pub fn match_header<'t>(&self, text: &'t str) -> Option<HeaderMatch<'t>> {
        let caps = self.regex.captures(text)?;
        let whole = caps.get(0)?;
        Some(HeaderMatch {
            span: whole.range(),
            timestamp: caps.get(1).map_or("", |m| m.as_str()),
            field: caps.get(2).map(|m| m.as_str()),
        })
    }
}

/// Case-insensitive literal substring test used by `--filter` and `--search`.
///
/// Built from blank text, the matcher is disabled and every haystack passes.
#[derive(Debug, Clone, Default)]
pub struct TextMatcher {
    needle: Option<Regex>,
}

impl TextMatcher {
    pub fn new(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        let needle = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .ok();
        Self { needle }
    }

    pub const fn is_enabled(&self) -> bool {
        self.needle.is_some()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.needle.as_ref().map_or(true, |re| re.is_match(haystack))
    }

    /// True if any of `lines` contains the needle (or the matcher is disabled).
    pub fn matches_any<'a>(&self, mut lines: impl Iterator<Item = &'a str>) -> bool {
        match &self.needle {
            None => true,
            Some(re) => lines.any(|line| re.is_match(line)),
        }
    }
}
