//! Header patterns and small log corpora used across harnesses.
//!
//! Timestamps in the corpora carry an explicit `Z` so results do not depend
//! on the machine's local time zone.

/// ISO timestamp in group 1, level word in group 2.
pub const ISO_LEVEL_PATTERN: &str =
    r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?) (\w+)";

/// Bracketed timestamp only; no filter group.
pub const BRACKET_PATTERN: &str = r"^\[([^\]]+)\]";

/// An application log with a multi-line stack trace.
pub const CORPUS_API: &[&str] = &[
    "2024-01-15T10:00:00Z INFO server started on :8080",
    "2024-01-15T10:00:02Z ERROR request failed",
    "  caused by: upstream timeout after 30s",
    "  at handler.rs:42",
    "2024-01-15T10:00:04Z INFO request ok",
    "2024-01-15T10:00:06Z WARN slow response 4200ms",
];

/// A database log interleaving with [`CORPUS_API`].
pub const CORPUS_DB: &[&str] = &[
    "2024-01-15T10:00:01Z INFO connection accepted",
    "2024-01-15T10:00:03Z ERROR deadlock detected",
    "  DETAIL: process 12 waits for ShareLock",
    "2024-01-15T10:00:05Z INFO checkpoint complete",
];
