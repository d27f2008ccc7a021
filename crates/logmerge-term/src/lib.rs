//! logmerge-term: terminal side of logmerge.
//!
//! [`App`] drives a run: it expands the input names, reads each file through
//! `logmerge-feeds`, segments and orders with `logmerge-core`, and prints the
//! result through [`TerminalRenderer`] while [`Progress`] reports which file
//! is being read.

pub mod app;
pub mod progress;
pub mod renderer;
pub mod theme;

pub use app::{App, RunSummary};
pub use progress::Progress;
pub use renderer::TerminalRenderer;
pub use theme::Theme;
