//! Run driver: expand inputs, read, segment, order and print.

use anyhow::Context;
use logmerge_core::{render_all, MergeOptions, MergePlan, SegmentStats};
use logmerge_feeds::{expand_inputs, read_log_file};
use std::io::{self, BufWriter, Write};

use crate::progress::{reading_message, Progress};
use crate::renderer::TerminalRenderer;
use crate::theme::Theme;

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files actually read after wildcard expansion.
    pub files: usize,
    /// Entries printed.
    pub entries: usize,
    pub stats: SegmentStats,
    /// Entries dropped by `--from` / `--to`.
    pub out_of_range: usize,
}

/// One configured merge run.
#[derive(Debug)]
pub struct App {
    plan: MergePlan,
    theme: Theme,
    color: bool,
    progress: bool,
}

impl App {
    /// Compile `options`; pattern and date errors surface here, before any
    /// file is opened.
    pub fn new(options: &MergeOptions, theme: Theme) -> anyhow::Result<Self> {
        let plan = MergePlan::compile(options)?;
        Ok(Self {
            plan,
            theme,
            color: false,
            progress: false,
        })
    }

    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub const fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Merge `inputs` to stdout, with a progress line while reading.
    pub fn run(&self, inputs: &[String]) -> anyhow::Result<RunSummary> {
        let mut progress = Progress::stdout(self.progress, self.theme.progress);
        let stdout = io::stdout();
        self.execute(inputs, || BufWriter::new(stdout.lock()), &mut progress)
    }

    /// Merge `inputs` into `out`. No progress is drawn.
    pub fn run_to<W: Write>(&self, inputs: &[String], out: W) -> anyhow::Result<RunSummary> {
        let mut progress = Progress::new(io::sink(), false, 0, self.theme.progress);
        self.execute(inputs, || out, &mut progress)
    }

    fn execute<W, P>(
        &self,
        inputs: &[String],
        open_output: impl FnOnce() -> W,
        progress: &mut Progress<P>,
    ) -> anyhow::Result<RunSummary>
    where
        W: Write,
        P: Write,
    {
        let paths = expand_inputs(inputs)?;
        let mut segmenter = self.plan.segmenter()?;

        for (index, path) in paths.iter().enumerate() {
            let name = path.to_string_lossy();
            progress.update(&reading_message(
                index,
                paths.len(),
                segmenter.stats().hits,
                &name,
            ))?;
            let lines = read_log_file(path)?;
            segmenter.start_file();
            segmenter.extend(lines)?;
        }
        let segmented = segmenter.finish();
        progress.clear()?;

        let retained = segmented.entries.len();
        let entries = self.plan.order(segmented.entries);

        let mut renderer = TerminalRenderer::new(open_output(), &self.theme, self.color);
        render_all(&mut renderer, &entries).context("failed to write merged output")?;

        let summary = RunSummary {
            files: paths.len(),
            entries: entries.len(),
            stats: segmented.stats,
            out_of_range: retained - entries.len(),
        };
        tracing::info!(
            files = summary.files,
            entries = summary.entries,
            lines = summary.stats.lines,
            hits = summary.stats.hits,
            out_of_range = summary.out_of_range,
            "merge finished"
        );
        Ok(summary)
    }
}
