//! Whole-file line reader.
//!
//! Lines are split on `\n` with a trailing `\r` removed, decoded as UTF-8
//! (lossy), and numbered from 1. A UTF-8 byte-order mark at the start of the
//! file is dropped.

use logmerge_core::LogLine;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::error::FeedError;

const BOM: char = '\u{feff}';

/// Read every line of `path`. Each [`LogLine`] carries `path` as its filename.
pub fn read_log_file(path: &Path) -> Result<Vec<LogLine>, FeedError> {
    let read_err = |source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let filename: Arc<str> = Arc::from(path.to_string_lossy().as_ref());
    let lines = read_lines(filename, BufReader::new(file)).map_err(read_err)?;

    tracing::debug!(path = %path.display(), lines = lines.len(), "file read");
    Ok(lines)
}

/// Split `reader` into numbered lines attributed to `filename`.
pub fn read_lines<R: BufRead>(
    filename: impl Into<Arc<str>>,
    mut reader: R,
) -> io::Result<Vec<LogLine>> {
    let filename = filename.into();
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let mut text = String::from_utf8_lossy(&buf).into_owned();
        if lines.is_empty() && text.starts_with(BOM) {
            text.remove(0);
        }
        lines.push(LogLine {
            filename: Arc::clone(&filename),
            line_number: lines.len() + 1,
            text,
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(input: &[u8]) -> Vec<String> {
        read_lines("t.log", input)
            .unwrap()
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    #[test]
    fn strips_line_endings() {
        assert_eq!(texts(b"one\r\ntwo\nthree"), ["one", "two", "three"]);
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        assert_eq!(texts(b"one\ntwo\n"), ["one", "two"]);
        assert!(texts(b"").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(texts(b"a\n\nb\n"), ["a", "", "b"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(texts(b"ok \xff\n"), ["ok \u{fffd}"]);
    }

    #[test]
    fn leading_bom_is_dropped() {
        assert_eq!(texts("\u{feff}first\nsecond".as_bytes()), ["first", "second"]);
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let lines = read_lines("t.log", &b"a\nb\n"[..]).unwrap();
        let numbers: Vec<usize> = lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(&*lines[1].filename, "t.log");
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "h1\nbody\n").unwrap();

        let lines = read_log_file(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(&*lines[0].filename, path.to_string_lossy());
    }

    #[test]
    fn missing_file_names_path() {
        let err = read_log_file(Path::new("/no/such/file.log")).unwrap_err();
        assert_eq!(err.to_string(), "failed to read /no/such/file.log");
    }
}
