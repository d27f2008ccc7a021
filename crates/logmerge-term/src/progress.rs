//! Single-line progress indicator shown while input files are read.
//!
//! The line is rewritten in place and only drawn when stdout is a terminal,
//! so redirected output never contains progress text. The cursor is hidden
//! while the line is visible and restored by [`Progress::clear`] or on drop.

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    queue,
    style::{ContentStyle, PrintStyledContent},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, IsTerminal, Stdout, Write};

const FALLBACK_WIDTH: u16 = 80;
const ELLIPSIS: &str = "...";

pub struct Progress<W: Write> {
    out: W,
    enabled: bool,
    width: u16,
    style: ContentStyle,
    visible: bool,
}

impl Progress<Stdout> {
    /// Progress on stdout, enabled only if requested and stdout is a terminal.
    pub fn stdout(requested: bool, style: ContentStyle) -> Self {
        let out = io::stdout();
        let enabled = requested && out.is_terminal();
        let width = terminal::size().map_or(FALLBACK_WIDTH, |(cols, _)| cols);
        Self::new(out, enabled, width, style)
    }
}

impl<W: Write> Progress<W> {
    pub const fn new(out: W, enabled: bool, width: u16, style: ContentStyle) -> Self {
        Self {
            out,
            enabled,
            width,
            style,
            visible: false,
        }
    }

    /// Replace the progress line with `message`.
    pub fn update(&mut self, message: &str) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if !self.visible {
            queue!(self.out, Hide)?;
            self.visible = true;
        }
        let text = fit_to_width(message, usize::from(self.width.saturating_sub(1)));
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(self.style.apply(text)),
            MoveToColumn(0),
        )?;
        self.out.flush()
    }

    /// Erase the progress line and show the cursor again.
    pub fn clear(&mut self) -> io::Result<()> {
        if !self.visible {
            return Ok(());
        }
        self.visible = false;
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine), Show)?;
        self.out.flush()
    }
}

impl<W: Write> Drop for Progress<W> {
    fn drop(&mut self) {
        if let Err(err) = self.clear() {
            tracing::debug!(%err, "failed to clear progress line");
        }
    }
}

/// Status text for reading file `index` (0-based) of `total`.
pub fn reading_message(index: usize, total: usize, hits: usize, name: &str) -> String {
    if total == 1 {
        return format!("Reading file: {name}...");
    }
    let position = format!("[{}/{}]", index + 1, total);
    match hits {
        0 => format!("Reading files {position}: {name}..."),
        1 => format!("Reading files {position} <1 hit>: {name}..."),
        n => format!("Reading files {position} <{} hits>: {name}...", group_thousands(n)),
    }
}

/// Pad `text` with spaces to exactly `width` characters, or cut it short
/// with a trailing ellipsis.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        let mut padded = String::with_capacity(text.len() + width - len);
        padded.push_str(text);
        padded.extend(std::iter::repeat_n(' ', width - len));
        return padded;
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
