//! Merge orderer: puts entries from every file into one timeline.
//!
//! Entries sort by timestamp. Equal timestamps fall back to [`tie_break`]:
//! within one file the earlier line comes first, across files the *later*
//! line comes first. That second rule is kept exactly for output
//! compatibility.
//!
//! The tie-break is not transitive once three or more files share a
//! timestamp, so it cannot be handed to `slice::sort_by`. Entries are sorted
//! by timestamp alone and each run of equal timestamps is then insertion
//! sorted with the tie-break, which only ever compares neighbours.

use std::cmp::Ordering;

use crate::error::{MergeError, RangeBound, Result};
use crate::timestamp::{Timestamp, TimestampNormalizer};
use crate::types::Entry;

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// Inclusive `[from, to]` window; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl DateRange {
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Parse user-supplied bounds. Blank strings leave that side open.
    pub fn parse(from: &str, to: &str, normalizer: &TimestampNormalizer) -> Result<Self> {
        Ok(Self {
            from: parse_bound(from, RangeBound::From, normalizer)?,
            to: parse_bound(to, RangeBound::To, normalizer)?,
        })
    }

    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.from.as_ref().map_or(true, |from| ts >= from)
            && self.to.as_ref().map_or(true, |to| ts <= to)
    }
}

fn parse_bound(
    raw: &str,
    bound: RangeBound,
    normalizer: &TimestampNormalizer,
) -> Result<Option<Timestamp>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    normalizer
        .normalize(raw)
        .map(Some)
        .map_err(|source| MergeError::DateRangeParse {
            bound,
            raw: raw.to_string(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// Secondary key for entries with equal timestamps.
pub fn tie_break(a: &Entry, b: &Entry) -> Ordering {
    if same_file(&a.filename, &b.filename) {
        a.line_number.cmp(&b.line_number)
    } else {
        b.line_number.cmp(&a.line_number)
    }
}

/// Full two-key comparison: timestamp, then [`tie_break`].
pub fn compare(a: &Entry, b: &Entry) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| tie_break(a, b))
}

/// Ordinal, case-insensitive file name equality.
fn same_file(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Drop entries outside `range` and order the rest.
pub fn order(entries: Vec<Entry>, range: &DateRange) -> Vec<Entry> {
    let before = entries.len();
    let mut kept: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| range.contains(&entry.timestamp))
        .collect();
    if kept.len() != before {
        tracing::debug!(
            excluded = before - kept.len(),
            kept = kept.len(),
            "entries outside date range dropped"
        );
    }

    kept.sort_by_key(|entry| entry.timestamp);
    for run in kept.chunk_by_mut(|a, b| a.timestamp == b.timestamp) {
        insertion_sort_by(run, tie_break);
    }
    kept
}

/// Stable insertion sort; never reorders two neighbours unless `cmp` says
/// the left one is greater.
fn insertion_sort_by<T>(items: &mut [T], mut cmp: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
