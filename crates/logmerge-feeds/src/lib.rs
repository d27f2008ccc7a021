//! logmerge-feeds: turns input names into [`LogLine`](logmerge_core::LogLine) streams.
//!
//! Two steps, both synchronous:
//!
//! 1. [`expand_inputs`] resolves wildcard names (`logs/*.log`) to files.
//! 2. [`read_log_file`] reads one file into numbered lines.

pub mod error;
pub mod file;
pub mod wildcard;

pub use error::FeedError;
pub use file::{read_log_file, read_lines};
pub use wildcard::{expand_inputs, has_wildcards};
