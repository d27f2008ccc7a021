//! logmerge-core: merge independently written log files into one timeline.
//!
//! This crate holds everything with real semantics; reading files and
//! printing to a terminal live in `logmerge-feeds` and `logmerge-term`.
//!
//! # Pipeline
//!
//! ```text
//! LogLine ──► Segmenter ──► Entry list ──► Orderer ──► RenderRequest
//!               │  ▲                          │
//!   Timestamp ──┘  └── filter / search        └── date range
//! ```
//!
//! Everything is synchronous and single-threaded. Any fatal error aborts the
//! whole run through [`MergeError`].

pub mod config;
pub mod error;
pub mod merge;
pub mod orderer;
pub mod pattern;
pub mod render;
pub mod segmenter;
pub mod timestamp;
pub mod types;

pub use error::{ConfigurationError, MergeError, RangeBound, Result, TimestampError};
pub use merge::{merge, MergeOptions, MergePlan, Merged};
pub use orderer::{order, DateRange};
pub use pattern::{HeaderPattern, TextMatcher};
pub use render::{render_all, EntryRenderer, RenderRequest};
pub use segmenter::{segment, SegmentOptions, SegmentStats, Segmented, Segmenter};
pub use timestamp::{normalize, Timestamp, TimestampNormalizer};
pub use types::{Entry, LogLine};
