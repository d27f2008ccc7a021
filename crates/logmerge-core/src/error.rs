//! Error taxonomy for the merge core.
//!
//! Every error here is fatal for the run: the core never retries and never
//! hands back partial results. Callers decide how to report them.

use thiserror::Error;

/// Convenience alias used throughout the core.
pub type Result<T, E = MergeError> = std::result::Result<T, E>;

/// A fatal error raised while compiling a merge plan or segmenting input.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The run configuration is unusable; surfaced before any line is read.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A line matched the header pattern but its timestamp group did not parse.
    #[error("{filename}:{line_number}: entry header has an unparseable timestamp {raw:?}")]
    MalformedHeader {
        filename: String,
        line_number: usize,
        raw: String,
        #[source]
        source: TimestampError,
    },

    /// A non-header line appeared before any header in its file.
    #[error("{filename}:{line_number}: first line must belong to an entry header")]
    OrphanContinuation { filename: String, line_number: usize },

    /// A `--from`/`--to` bound was given but could not be parsed.
    #[error("invalid --{bound} date {raw:?}")]
    DateRangeParse {
        bound: RangeBound,
        raw: String,
        #[source]
        source: TimestampError,
    },
}

/// Problems with the header pattern or the config file.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("header pattern is not a valid regex")]
    InvalidPattern(#[from] regex::Error),

    #[error("header pattern has no capture group for the entry timestamp")]
    MissingTimestampGroup,

    #[error("header pattern lacks the second capture group required for filtering")]
    MissingFilterGroup,

    #[error("no header pattern given (pass --pattern or set merge.pattern in the config file)")]
    MissingPattern,

    #[error("failed to load configuration")]
    Load(#[from] config::ConfigError),
}

/// Why a string could not be normalised into a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("unrecognised date/time {0:?}")]
    Unrecognised(String),

    #[error("{0:?} does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

/// Which end of a date range a [`MergeError::DateRangeParse`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    From,
    To,
}

impl std::fmt::Display for RangeBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeBound::From => write!(f, "from"),
            RangeBound::To => write!(f, "to"),
        }
    }
}
