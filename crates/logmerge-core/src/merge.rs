//! Merge plan: validates a run's options once, then segments and orders.
//!
//! [`MergePlan::compile`] surfaces every configuration and date-range error
//! before a single line is read. [`MergePlan::merge`] is the one-call form
//! that returns either the ordered entries or the first fatal error.

use crate::error::{ConfigurationError, Result};
use crate::orderer::{self, DateRange};
use crate::pattern::HeaderPattern;
use crate::segmenter::{SegmentOptions, SegmentStats, Segmenter};
use crate::timestamp::TimestampNormalizer;
use crate::types::{Entry, LogLine};

/// Options recognised by the core for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Regex for entry headers; group 1 is the timestamp, group 2 the filter field.
    pub header_pattern: String,
    pub filter: String,
    pub search: String,
    /// Inclusive lower bound; blank for none.
    pub from: String,
    /// Inclusive upper bound; blank for none.
    pub to: String,
    pub assume_utc: bool,
}

/// A validated, ready-to-run merge.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pattern: HeaderPattern,
    segment: SegmentOptions,
    range: DateRange,
}

/// Ordered output of a merge.
#[derive(Debug, Clone)]
pub struct Merged {
    pub entries: Vec<Entry>,
    pub stats: SegmentStats,
    /// Entries dropped by the date range.
    pub out_of_range: usize,
}

impl MergePlan {
    pub fn compile(options: &MergeOptions) -> Result<Self> {
        if options.header_pattern.trim().is_empty() {
            return Err(ConfigurationError::MissingPattern.into());
        }
        let pattern = HeaderPattern::new(&options.header_pattern)?;
        let segment = SegmentOptions {
            filter: options.filter.clone(),
            search: options.search.clone(),
            assume_utc: options.assume_utc,
        };
        // Surfaces a missing filter group now rather than at the first line.
        Segmenter::new(&pattern, &segment)?;

        let normalizer = TimestampNormalizer::new(options.assume_utc);
        let range = DateRange::parse(&options.from, &options.to, &normalizer)?;

        tracing::debug!(
            pattern = pattern.as_str(),
            filter = %options.filter,
            search = %options.search,
            ?range,
            assume_utc = options.assume_utc,
            "merge plan compiled"
        );
        Ok(Self {
            pattern,
            segment,
            range,
        })
    }

    /// A fresh segmenter for this plan.
    pub fn segmenter(&self) -> Result<Segmenter<'_>> {
        Segmenter::new(&self.pattern, &self.segment)
    }

    /// Apply the date range and order `entries`.
    pub fn order(&self, entries: Vec<Entry>) -> Vec<Entry> {
        orderer::order(entries, &self.range)
    }

    /// Segment `lines` and order the result.
    pub fn merge<I>(&self, lines: I) -> Result<Merged>
    where
        I: IntoIterator<Item = LogLine>,
    {
        let mut segmenter = self.segmenter()?;
        segmenter.extend(lines)?;
        let segmented = segmenter.finish();

        let retained = segmented.entries.len();
        let entries = self.order(segmented.entries);
        Ok(Merged {
            out_of_range: retained - entries.len(),
            entries,
            stats: segmented.stats,
        })
    }
}

/// Compile `options` and merge `lines` in one call.
pub fn merge<I>(options: &MergeOptions, lines: I) -> Result<Merged>
where
    I: IntoIterator<Item = LogLine>,
{
    MergePlan::compile(options)?.merge(lines)
}
