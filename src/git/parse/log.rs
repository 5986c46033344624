//! Parser for the default (`medium`) `git log` / `git show` output.
//!
//! ```text
//! commit 0123456789abcdef0123456789abcdef01234567
//! Author: Jane Doe <jane@example.com>
//! Date:   2026-10-19T08:05:03+02:00
//!
//!     Subject line
//!
//!     Body text
//! ```
//!
//! Dates are requested with `--date=iso-strict` so they parse as RFC 3339.

use chrono::DateTime;
use regex::Regex;

use crate::domain::{CommitHash, LogEntry};
use crate::error::{DistPublishError, Result};

/// A commit block: `commit` line, optional `Merge:` line, `Author:`, `Date:`,
/// then any run of blank lines or lines beginning with whitespace.
const LOG_ENTRY_PATTERN: &str = r"(?m)^commit ([0-9a-fA-F]{7,40})[^\n]*\n(?:Merge:[^\n]*\n)?Author:[ \t]*([^\n]*)\nDate:[ \t]*([^\n]*)\n?((?:^[ \t]*\n|^[ \t]+[^\n]*(?:\n|\z))*)";

/// Parse every commit block in `text`, in the order git printed them
/// (newest first for `git log`).
pub fn parse_log(text: &str) -> Result<Vec<LogEntry>> {
    let re = Regex::new(LOG_ENTRY_PATTERN)
        .map_err(|e| DistPublishError::parse(format!("invalid log pattern: {}", e)))?;

    let mut entries = Vec::new();
    for caps in re.captures_iter(text) {
        let hash = CommitHash::new(&caps[1])?;
        let author = caps[2].trim().to_string();
        let raw_date = caps[3].trim();
        let date = DateTime::parse_from_rfc3339(raw_date).map_err(|e| {
            DistPublishError::parse(format!(
                "commit {}: unparseable date '{}': {}",
                hash, raw_date, e
            ))
        })?;
        let message = normalize_message(caps.get(4).map_or("", |m| m.as_str()));

        entries.push(LogEntry {
            hash,
            author,
            date,
            message,
        });
    }

    let blocks = text.lines().filter(|l| l.starts_with("commit ")).count();
    if blocks != entries.len() {
        return Err(DistPublishError::parse(format!(
            "found {} commit blocks in log output but only {} were well formed",
            blocks,
            entries.len()
        )));
    }

    Ok(entries)
}

/// Strip outer blank lines and the indentation common to all non-blank lines
pub fn normalize_message(block: &str) -> String {
    let lines: Vec<&str> = block.lines().collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);
    let body = &lines[first..=last];

    let indent = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_blanks(l))
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                &l[indent..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_blanks(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}
