use std::path::PathBuf;
use thiserror::Error;

/// Failures while resolving or reading input files.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list directory {}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid wildcard {pattern:?}")]
    Wildcard {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
