//! Assertion macros for logmerge harnesses.
//!
//! These wrap `pretty_assertions` and report which entries were involved
//! when an ordering or retention invariant is violated.

use logmerge_core::Entry;

/// `(filename, line_number)` of each entry, for compact comparisons.
pub fn origins(entries: &[Entry]) -> Vec<(String, usize)> {
    entries
        .iter()
        .map(|e| (e.filename.to_string(), e.line_number))
        .collect()
}

/// Header text of each entry.
pub fn headers(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(|e| e.header().to_string()).collect()
}

/// Assert that entries appear with the given `(filename, line)` origins.
///
/// ```rust
/// assert_origins!(entries, [("a.log", 1), ("b.log", 3)]);
/// ```
#[macro_export]
macro_rules! assert_origins {
    ($entries:expr, [$(($file:expr, $line:expr)),* $(,)?]) => {{
        let expected: Vec<(String, usize)> = vec![$(($file.to_string(), $line)),*];
        pretty_assertions::assert_eq!(
            $crate::common::origins(&$entries),
            expected,
            "entry origins differ"
        );
    }};
}

/// Assert that no neighbouring pair of `entries` is out of order.
#[macro_export]
macro_rules! assert_ordered {
    ($entries:expr) => {{
        let entries: &[logmerge_core::Entry] = &$entries;
        for (i, pair) in entries.windows(2).enumerate() {
            if logmerge_core::orderer::compare(&pair[0], &pair[1]) == std::cmp::Ordering::Greater {
                panic!(
                    "assert_ordered! failed at index {i}:\n  left:  {}:{} @ {}\n  right: {}:{} @ {}",
                    pair[0].filename,
                    pair[0].line_number,
                    pair[0].timestamp,
                    pair[1].filename,
                    pair[1].line_number,
                    pair[1].timestamp,
                );
            }
        }
    }};
}

/// Assert that every entry's header re-matches the pattern at its stored span.
#[macro_export]
macro_rules! assert_round_trip {
    ($pattern:expr, $entries:expr) => {{
        let pattern: &logmerge_core::HeaderPattern = &$pattern;
        for entry in $entries.iter() {
            let found = pattern
                .match_header(entry.header())
                .unwrap_or_else(|| panic!("header no longer matches: {:?}", entry.header()));
            pretty_assertions::assert_eq!(
                found.span,
                entry.header_match(),
                "span drifted for {}:{}",
                entry.filename,
                entry.line_number
            );
        }
    }};
}
