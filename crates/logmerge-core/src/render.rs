//! Render boundary: what the core hands to an output stage.
//!
//! The core never writes to a terminal. For every ordered [`Entry`] it builds
//! a [`RenderRequest`], and an [`EntryRenderer`] decides how to print it.

use std::io;

use crate::types::Entry;

/// Everything a renderer needs to print one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest<'a> {
    pub first_line: &'a str,
    /// Byte offset of the header match within `first_line`.
    pub match_start: usize,
    pub match_len: usize,
    pub continuation_lines: &'a [String],
}

impl<'a> RenderRequest<'a> {
    /// Split the header into `(before, matched, after)`.
    ///
    /// Returns `None` if the recorded span does not fall on character
    /// boundaries inside `first_line`; callers then print the line plainly.
    pub fn header_parts(&self) -> Option<(&'a str, &'a str, &'a str)> {
        let end = self.match_start.checked_add(self.match_len)?;
        let line = self.first_line;
        Some((
            line.get(..self.match_start)?,
            line.get(self.match_start..end)?,
            line.get(end..)?,
        ))
    }
}

/// An output stage for ordered entries.
pub trait EntryRenderer {
    fn render(&mut self, request: &RenderRequest<'_>) -> io::Result<()>;

    /// Called once after the last entry.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Feed every entry to `renderer` in order, then finish it.
pub fn render_all<R>(renderer: &mut R, entries: &[Entry]) -> io::Result<()>
where
    R: EntryRenderer + ?Sized,
{
    for entry in entries {
        renderer.render(&entry.render_request())?;
    }
    renderer.finish()
}
