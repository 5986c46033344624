use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use crate::error::{DistPublishError, Result};

/// A validated commit identifier: 7 to 40 hexadecimal characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitHash(String);

impl CommitHash {
    pub const SHORT_LEN: usize = 7;

    /// Validate a hash taken from git output or user input
    pub fn new(hash: &str) -> Result<Self> {
        let valid = (Self::SHORT_LEN..=40).contains(&hash.len())
            && hash.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(DistPublishError::parse(format!(
                "'{}' is not a commit hash",
                hash
            )));
        }
        Ok(CommitHash(hash.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first seven characters of the hash
    pub fn to_short_string(&self) -> String {
        self.0[..Self::SHORT_LEN].to_string()
    }
}

impl FromStr for CommitHash {
    type Err = DistPublishError;

    fn from_str(s: &str) -> Result<Self> {
        CommitHash::new(s)
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One commit as reported by `git log` / `git show`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub hash: CommitHash,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    /// Message with common indentation and outer blank lines removed
    pub message: String,
}

/// How far a branch has diverged from its remote-tracking counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitDelta {
    pub ahead: u32,
    pub behind: u32,
}

impl CommitDelta {
    pub fn is_in_sync(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}
