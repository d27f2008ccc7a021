//! Terminal renderer: prints ordered entries, highlighting the header match.

use crossterm::{queue, style::ContentStyle, style::PrintStyledContent};
use logmerge_core::{EntryRenderer, RenderRequest};
use std::io::{self, Write};

use crate::theme::Theme;

/// Writes entries line by line to `W`.
///
/// With colour enabled, the header pattern match is styled with the theme's
/// header style. A span that does not fit the header line is printed plainly.
pub struct TerminalRenderer<W: Write> {
    out: W,
    highlight: Option<ContentStyle>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, theme: &Theme, color: bool) -> Self {
        Self {
            out,
            highlight: color.then_some(theme.header),
        }
    }

    /// A renderer that never emits escape sequences.
    pub fn plain(out: W) -> Self {
        Self {
            out,
            highlight: None,
        }
    }

    fn write_header(&mut self, request: &RenderRequest<'_>) -> io::Result<()> {
        let parts = self.highlight.zip(request.header_parts());
        match parts {
            Some((style, (before, matched, after))) if !matched.is_empty() => {
                self.out.write_all(before.as_bytes())?;
                queue!(self.out, PrintStyledContent(style.apply(matched)))?;
                writeln!(self.out, "{after}")
            }
            _ => writeln!(self.out, "{}", request.first_line),
        }
    }
}

impl<W: Write> EntryRenderer for TerminalRenderer<W> {
    fn render(&mut self, request: &RenderRequest<'_>) -> io::Result<()> {
        self.write_header(request)?;
        for line in request.continuation_lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
