//! Text parsers for git output, one module per output shape.
//!
//! Kept free of process execution so each contract can be tested against
//! captured output.

pub mod branches;
pub mod log;
pub mod remotes;

pub use branches::{parse_branch_list, BranchRef};
pub use log::{normalize_message, parse_log};
pub use remotes::{parse_remotes, Remote};

use std::path::PathBuf;

/// Split newline separated output into entries.
///
/// Empty output yields an empty list, never a single empty entry.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split NUL separated path output (`-z`) into paths, byte for byte.
///
/// Names are taken verbatim, so quotes, backslashes, newlines and non-UTF-8
/// bytes survive.
pub fn parse_nul_paths(raw: &[u8]) -> Vec<PathBuf> {
    raw.split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .map(path_from_bytes)
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
