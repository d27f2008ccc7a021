//! Entry segmenter: groups raw lines into [`Entry`] records.
//!
//! # States
//!
//! | State | Header line | Continuation line |
//! |-------|-------------|-------------------|
//! | `AwaitingFirstHeader` | start entry (or skip) | orphan error |
//! | `InEntry` | finalise, start entry (or skip) | append to entry |
//! | `Skipping` | start entry (or skip) | drop |
//! | `LeadingBody` | start entry (or skip) | drop, warn once |
//!
//! "Skip" means the header failed the `--filter` test: no entry is created
//! and its body is dropped until the next header.
//!
//! A new file starts with [`Segmenter::start_file`], or implicitly when the
//! file name changes or the line numbers restart. The current entry is
//! finalised there, so entries never span files. Lines that open a later file
//! before its first header go to `LeadingBody`; only a run that has seen no
//! header at all fails with an orphan error.
//!
//! # Deferred search
//!
//! The `--search` test needs an entry's whole body, which is only known once
//! the next header (or a file boundary, or end of input) arrives. Entries are
//! therefore appended to an arena as soon as their header is seen and marked
//! removed when they are finalised without a hit. [`Segmenter::finish`]
//! compacts the arena once.

use std::mem;
use std::sync::Arc;

use crate::error::{ConfigurationError, MergeError, Result};
use crate::pattern::{HeaderPattern, TextMatcher};
use crate::timestamp::TimestampNormalizer;
use crate::types::{Entry, LogLine};

// ---------------------------------------------------------------------------
// Options + statistics
// ---------------------------------------------------------------------------

/// Retention settings for one segmentation pass.
#[derive(Debug, Clone, Default)]
pub struct SegmentOptions {
    /// Case-insensitive substring required in capture group 2. Blank disables.
    pub filter: String,
    /// Case-insensitive substring required somewhere in the entry. Blank disables.
    pub search: String,
    pub assume_utc: bool,
}

/// Counters collected while segmenting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Lines consumed.
    pub lines: usize,
    /// Lines that matched the header pattern.
    pub headers: usize,
    /// Headers dropped by the filter test.
    pub filtered_out: usize,
    /// Entries removed by the deferred search test.
    pub searched_out: usize,
    /// Continuation lines dropped because their header was filtered out.
    pub skipped_lines: usize,
    /// Entries that passed an enabled filter or search test.
    pub hits: usize,
}

impl SegmentStats {
    /// Entries that survive segmentation.
    pub const fn retained(&self) -> usize {
        self.headers - self.filtered_out - self.searched_out
    }
}

/// Result of a finished segmentation pass.
#[derive(Debug, Clone)]
pub struct Segmented {
    /// Retained entries in input order.
    pub entries: Vec<Entry>,
    pub stats: SegmentStats,
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingFirstHeader,
    /// Index into the arena of the entry receiving continuation lines.
    InEntry(usize),
    Skipping,
    /// Start of a later file, before its first header.
    LeadingBody { warned: bool },
}

#[derive(Debug)]
struct Slot {
    entry: Entry,
    removed: bool,
}

/// Incremental segmenter. Feed lines with [`push`](Self::push), then call
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct Segmenter<'p> {
    pattern: &'p HeaderPattern,
    normalizer: TimestampNormalizer,
    filter: TextMatcher,
    search: TextMatcher,
    arena: Vec<Slot>,
    state: State,
    current_file: Option<Arc<str>>,
    last_line: usize,
    seen_header: bool,
    stats: SegmentStats,
}

impl<'p> Segmenter<'p> {
    /// Fails with [`ConfigurationError::MissingFilterGroup`] if a filter is set
    /// but `pattern` has no second capture group.
    pub fn new(pattern: &'p HeaderPattern, options: &SegmentOptions) -> Result<Self> {
        let filter = TextMatcher::new(&options.filter);
        if filter.is_enabled() && !pattern.has_field_group() {
            return Err(ConfigurationError::MissingFilterGroup.into());
        }

        Ok(Self {
            pattern,
            normalizer: TimestampNormalizer::new(options.assume_utc),
            filter,
            search: TextMatcher::new(&options.search),
            arena: Vec::new(),
            state: State::AwaitingFirstHeader,
            current_file: None,
            last_line: 0,
            seen_header: false,
            stats: SegmentStats::default(),
        })
    }

    pub const fn stats(&self) -> &SegmentStats {
        &self.stats
    }

    /// Mark the start of the next input file.
    ///
    /// Needed when the same file name is fed twice in a row; a change of name
    /// or a restart of line numbers is detected by [`push`](Self::push).
    pub fn start_file(&mut self) {
        self.finalize_current();
        self.state = if self.seen_header {
            State::LeadingBody { warned: false }
        } else {
            State::AwaitingFirstHeader
        };
        self.current_file = None;
        self.last_line = 0;
    }

    /// Consume one line.
    pub fn push(&mut self, line: LogLine) -> Result<()> {
        self.stats.lines += 1;

        if self.current_file.as_deref() != Some(&*line.filename)
            || line.line_number <= self.last_line
        {
            self.start_file();
            self.current_file = Some(Arc::clone(&line.filename));
        }
        self.last_line = line.line_number;

        let Some(header) = self.pattern.match_header(&line.text) else {
            return self.continue_entry(line);
        };
        self.stats.headers += 1;
        self.seen_header = true;

        let timestamp =
            self.normalizer
                .normalize(header.timestamp)
                .map_err(|source| MergeError::MalformedHeader {
                    filename: line.filename.to_string(),
                    line_number: line.line_number,
                    raw: header.timestamp.to_string(),
                    source,
                })?;
        let passes_filter = !self.filter.is_enabled()
            || self.filter.matches(header.field.unwrap_or_default());
        let span = header.span;

        self.finalize_current();

        if !passes_filter {
            self.stats.filtered_out += 1;
            self.state = State::Skipping;
            return Ok(());
        }
        if self.filter.is_enabled() && !self.search.is_enabled() {
            self.stats.hits += 1;
        }

        let index = self.arena.len();
        self.arena.push(Slot {
            entry: Entry::new(line.filename, line.line_number, timestamp, line.text, span),
            removed: false,
        });
        self.state = State::InEntry(index);
        Ok(())
    }

    /// Consume every line of `lines`, stopping at the first error.
    pub fn extend<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = LogLine>,
    {
        lines.into_iter().try_for_each(|line| self.push(line))
    }

    /// Finalise the last entry and compact away removed entries.
    pub fn finish(mut self) -> Segmented {
        self.finalize_current();

        let entries: Vec<Entry> = self
            .arena
            .into_iter()
            .filter(|slot| !slot.removed)
            .map(|slot| slot.entry)
            .collect();

        tracing::debug!(
            lines = self.stats.lines,
            headers = self.stats.headers,
            filtered_out = self.stats.filtered_out,
            searched_out = self.stats.searched_out,
            retained = entries.len(),
            "segmentation finished"
        );

        Segmented {
            entries,
            stats: self.stats,
        }
    }

    fn continue_entry(&mut self, line: LogLine) -> Result<()> {
        match self.state {
            State::InEntry(index) => {
                self.arena[index].entry.push_line(line.text);
                Ok(())
            }
            State::Skipping => {
                self.stats.skipped_lines += 1;
                Ok(())
            }
            State::LeadingBody { warned } => {
                self.stats.skipped_lines += 1;
                if !warned {
                    tracing::warn!(
                        file = %line.filename,
                        line = line.line_number,
                        "lines before the first header of the file dropped"
                    );
                    self.state = State::LeadingBody { warned: true };
                }
                Ok(())
            }
            State::AwaitingFirstHeader => Err(MergeError::OrphanContinuation {
                filename: line.filename.to_string(),
                line_number: line.line_number,
            }),
        }
    }

    /// Run the deferred search test on the current entry. Leaves the state
    /// at `AwaitingFirstHeader` for the caller to replace.
    fn finalize_current(&mut self) {
        let State::InEntry(index) = mem::replace(&mut self.state, State::AwaitingFirstHeader)
        else {
            return;
        };
        if !self.search.is_enabled() {
            return;
        }

        let slot = &mut self.arena[index];
        if self.search.matches_any(slot.entry.lines()) {
            self.stats.hits += 1;
        } else {
            slot.removed = true;
            self.stats.searched_out += 1;
        }
    }
}

/// Segment a complete line sequence in one call.
pub fn segment<I>(pattern: &HeaderPattern, options: &SegmentOptions, lines: I) -> Result<Segmented>
where
    I: IntoIterator<Item = LogLine>,
{
    let mut segmenter = Segmenter::new(pattern, options)?;
    segmenter.extend(lines)?;
    Ok(segmenter.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PATTERN: &str = r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z) \[(\w+)\]";

    fn pattern() -> HeaderPattern {
        HeaderPattern::new(PATTERN).unwrap()
    }

    fn lines(file: &str, texts: &[&str]) -> Vec<LogLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LogLine::new(file, i + 1, *t))
            .collect()
    }

    fn bodies(segmented: &Segmented) -> Vec<Vec<&str>> {
        segmented
            .entries
            .iter()
            .map(|e| e.lines().collect())
            .collect()
    }

    #[test]
    fn groups_continuations_under_headers() {
        let input = lines(
            "a.log",
            &[
                "2024-01-01T10:00:00Z [INFO] start",
                "  detail",
                "2024-01-01T10:00:01Z [WARN] slow",
            ],
        );
        let out = segment(&pattern(), &SegmentOptions::default(), input).unwrap();
        assert_eq!(
            bodies(&out),
            vec![
                vec!["2024-01-01T10:00:00Z [INFO] start", "  detail"],
                vec!["2024-01-01T10:00:01Z [WARN] slow"],
            ]
        );
        assert_eq!(out.entries[1].line_number, 3);
        assert_eq!(out.stats.retained(), 2);
    }

    #[test]
    fn orphan_first_line_is_fatal() {
        let input = lines("a.log", &["preamble", "2024-01-01T10:00:00Z [INFO] x"]);
        let err = segment(&pattern(), &SegmentOptions::default(), input).unwrap_err();
        assert!(matches!(
            err,
            MergeError::OrphanContinuation { ref filename, line_number: 1 } if filename == "a.log"
        ));
    }

    #[test]
    fn later_file_drops_lines_before_its_first_header() {
        let mut input = lines("a.log", &["2024-01-01T10:00:00Z [INFO] x", "  x-body"]);
        input.extend(lines(
            "b.log",
            &["  rotated mid-trace", "  more", "2024-01-01T10:00:01Z [INFO] y"],
        ));
        let out = segment(&pattern(), &SegmentOptions::default(), input).unwrap();
        assert_eq!(
            bodies(&out),
            vec![
                vec!["2024-01-01T10:00:00Z [INFO] x", "  x-body"],
                vec!["2024-01-01T10:00:01Z [INFO] y"],
            ]
        );
        assert_eq!(out.stats.skipped_lines, 2);
        assert_eq!(out.stats.lines, 5);
    }

    #[test]
    fn orphan_after_empty_first_file_is_still_fatal() {
        let pattern = pattern();
        let mut segmenter = Segmenter::new(&pattern, &SegmentOptions::default()).unwrap();
        segmenter.start_file();
        segmenter.start_file();
        let err = segmenter.push(LogLine::new("b.log", 1, "stray")).unwrap_err();
        assert!(matches!(
            err,
            MergeError::OrphanContinuation { ref filename, line_number: 1 } if filename == "b.log"
        ));
    }

    #[test]
    fn same_name_twice_is_two_files() {
        let file = ["2024-01-01T10:00:00Z [INFO] x", "  x-body"];
        let mut input = lines("a.log", &file);
        input.extend(lines("a.log", &file));
        let out = segment(&pattern(), &SegmentOptions::default(), input).unwrap();
        assert_eq!(out.entries.len(), 2);
        assert!(out.entries.iter().all(|e| e.body() == ["  x-body".to_string()]));
    }

    #[test]
    fn start_file_finalises_the_current_entry() {
        let options = SegmentOptions {
            search: "needle".to_string(),
            ..Default::default()
        };
        let pattern = pattern();
        let mut segmenter = Segmenter::new(&pattern, &options).unwrap();
        segmenter
            .push(LogLine::new("a.log", 1, "2024-01-01T10:00:00Z [INFO] x"))
            .unwrap();
        segmenter.start_file();
        // Would have rescued the entry had it still been open.
        segmenter.push(LogLine::new("a.log", 2, "  needle")).unwrap();
        let out = segmenter.finish();
        assert!(out.entries.is_empty());
        assert_eq!(out.stats.searched_out, 1);
        assert_eq!(out.stats.skipped_lines, 1);
    }

    #[test]
    fn malformed_timestamp_is_fatal() {
        let pattern = HeaderPattern::new(r"^(\S+) \[(\w+)\]").unwrap();
        let input = lines("a.log", &["yesterday [INFO] x"]);
        let err = segment(&pattern, &SegmentOptions::default(), input).unwrap_err();
        assert!(matches!(
            err,
            MergeError::MalformedHeader { ref raw, line_number: 1, .. } if raw == "yesterday"
        ));
    }

    #[test]
    fn filter_requires_second_group() {
        let pattern = HeaderPattern::new(r"^(\S+Z)").unwrap();
        let options = SegmentOptions {
            filter: "ERROR".to_string(),
            ..Default::default()
        };
        let err = Segmenter::new(&pattern, &options).unwrap_err();
        assert!(matches!(
            err,
            MergeError::Configuration(ConfigurationError::MissingFilterGroup)
        ));
    }

    #[test]
    fn filtered_header_drops_its_body() {
        let input = lines(
            "a.log",
            &[
                "2024-01-01T10:00:00Z [ERROR] one",
                "  trace one",
                "2024-01-01T10:00:01Z [INFO] two",
                "  trace two",
                "2024-01-01T10:00:02Z [error] three",
            ],
        );
        let options = SegmentOptions {
            filter: "ERROR".to_string(),
            ..Default::default()
        };
        let out = segment(&pattern(), &options, input).unwrap();
        assert_eq!(
            bodies(&out),
            vec![
                vec!["2024-01-01T10:00:00Z [ERROR] one", "  trace one"],
                vec!["2024-01-01T10:00:02Z [error] three"],
            ]
        );
        assert_eq!(out.stats.filtered_out, 1);
        assert_eq!(out.stats.skipped_lines, 1);
        assert_eq!(out.stats.hits, 2);
    }

    #[test]
    fn search_checks_the_whole_body() {
        let input = lines(
            "a.log",
            &[
                "2024-01-01T10:00:00Z [INFO] request",
                "  upstream TIMEOUT",
                "2024-01-01T10:00:01Z [INFO] request",
                "  ok",
                "2024-01-01T10:00:02Z [INFO] timeout in header",
            ],
        );
        let options = SegmentOptions {
            search: "timeout".to_string(),
            ..Default::default()
        };
        let out = segment(&pattern(), &options, input).unwrap();
        let headers: Vec<usize> = out.entries.iter().map(|e| e.line_number).collect();
        assert_eq!(headers, vec![1, 5]);
        assert_eq!(out.stats.searched_out, 1);
        assert_eq!(out.stats.hits, 2);
    }

    #[test]
    fn search_on_last_entry_runs_at_finish() {
        let input = lines(
            "a.log",
            &[
                "2024-01-01T10:00:00Z [INFO] timeout",
                "2024-01-01T10:00:01Z [INFO] fine",
                "  still fine",
            ],
        );
        let options = SegmentOptions {
            search: "timeout".to_string(),
            ..Default::default()
        };
        let out = segment(&pattern(), &options, input).unwrap();
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].line_number, 1);
    }

    #[test]
    fn search_is_checked_across_skipped_headers() {
        // The skipped header's body must not count toward the previous entry.
        let input = lines(
            "a.log",
            &[
                "2024-01-01T10:00:00Z [ERROR] first",
                "2024-01-01T10:00:01Z [INFO] second",
                "  timeout",
                "2024-01-01T10:00:02Z [ERROR] third timeout",
            ],
        );
        let options = SegmentOptions {
            filter: "error".to_string(),
            search: "timeout".to_string(),
            ..Default::default()
        };
        let out = segment(&pattern(), &options, input).unwrap();
        let headers: Vec<usize> = out.entries.iter().map(|e| e.line_number).collect();
        assert_eq!(headers, vec![4]);
    }

    #[test]
    fn entries_do_not_span_files() {
        let mut input = lines("a.log", &["2024-01-01T10:00:00Z [INFO] a", "  a-body"]);
        input.extend(lines("b.log", &["2024-01-01T10:00:00Z [INFO] b", "  b-body"]));
        let out = segment(&pattern(), &SegmentOptions::default(), input).unwrap();
        assert_eq!(&*out.entries[0].filename, "a.log");
        assert_eq!(out.entries[0].body(), ["  a-body".to_string()]);
        assert_eq!(&*out.entries[1].filename, "b.log");
        assert_eq!(out.entries[1].body(), ["  b-body".to_string()]);
    }

    #[test]
    fn skipping_does_not_leak_into_next_file() {
        let options = SegmentOptions {
            filter: "ERROR".to_string(),
            ..Default::default()
        };
        let mut input = lines("a.log", &["2024-01-01T10:00:00Z [INFO] a"]);
        input.extend(lines(
            "b.log",
            &["  leading", "2024-01-01T10:00:01Z [ERROR] b", "  b-body"],
        ));
        let out = segment(&pattern(), &options, input).unwrap();
        assert_eq!(
            bodies(&out),
            vec![vec!["2024-01-01T10:00:01Z [ERROR] b", "  b-body"]]
        );
        assert_eq!(out.stats.filtered_out, 1);
        assert_eq!(out.stats.skipped_lines, 1);
    }

    #[test]
    fn header_span_is_recorded() {
        let input = lines("a.log", &["2024-01-01T10:00:00Z [INFO] msg"]);
        let out = segment(&pattern(), &SegmentOptions::default(), input).unwrap();
        let entry = &out.entries[0];
        assert_eq!(&entry.header()[entry.header_match()], "2024-01-01T10:00:00Z [INFO]");
    }
}
