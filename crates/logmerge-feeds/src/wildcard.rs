//! Wildcard expansion of input names.
//!
//! Only the file-name component may contain `*` (any run of characters) or
//! `?` (exactly one character). The directory part is taken literally and
//! defaults to the current directory. Matches are returned sorted so the
//! file order of a run is reproducible.

use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FeedError;

/// Whether `name` should be expanded rather than opened directly.
pub fn has_wildcards(name: &str) -> bool {
    name.contains(['*', '?'])
}

/// Resolve every input name to the files it denotes, preserving input order.
///
/// Plain names pass through untouched, even if the file does not exist; the
/// read step reports that. A wildcard that matches nothing contributes no
/// files.
pub fn expand_inputs<S: AsRef<str>>(names: &[S]) -> Result<Vec<PathBuf>, FeedError> {
    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !has_wildcards(name) {
            files.push(PathBuf::from(name));
            continue;
        }

        let matched = expand_wildcard(name)?;
        if matched.is_empty() {
            tracing::warn!(pattern = name, "wildcard matched no files");
        } else {
            tracing::debug!(pattern = name, count = matched.len(), "wildcard expanded");
        }
        files.extend(matched);
    }
    Ok(files)
}

fn expand_wildcard(name: &str) -> Result<Vec<PathBuf>, FeedError> {
    let path = Path::new(name);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_pattern = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let matcher = wildcard_regex(&file_pattern)?;

    let list_dir = dir.unwrap_or_else(|| Path::new("."));
    let list_err = |source| FeedError::ListDirectory {
        path: list_dir.to_path_buf(),
        source,
    };

    let mut matched = Vec::new();
    for entry in fs::read_dir(list_dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let file_name = entry.file_name();
        if !matcher.is_match(&file_name.to_string_lossy()) || !entry.path().is_file() {
            continue;
        }
        matched.push(match dir {
            Some(dir) => dir.join(&file_name),
            None => PathBuf::from(&file_name),
        });
    }
    matched.sort();
    Ok(matched)
}

fn wildcard_regex(pattern: &str) -> Result<Regex, FeedError> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');

    RegexBuilder::new(&re)
        .case_insensitive(cfg!(windows))
        .build()
        .map_err(|source| FeedError::Wildcard {
            pattern: pattern.to_string(),
            source,
        })
}
