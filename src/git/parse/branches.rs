//! Parser for `git branch --all --no-color`.

use regex::Regex;

use crate::error::{DistPublishError, Result};

/// A branch line split into its remote qualifier and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub remote: Option<String>,
}

/// Parse the branch listing.
///
/// Each line is trimmed and stripped of the `* ` (current) or `+ `
/// (checked out in another worktree) marker. Symbolic `remotes/<r>/HEAD -> …`
/// lines and the `(HEAD detached at …)` pseudo-entry are dropped.
pub fn parse_branch_list(text: &str) -> Result<Vec<BranchRef>> {
    let symbolic = Regex::new(r"^remotes/[\w.-]+/HEAD -> .+$")
        .map_err(|e| DistPublishError::parse(format!("invalid branch pattern: {}", e)))?;
    let qualified = Regex::new(r"^(remotes/([\w.-]+)/)?(.*)$")
        .map_err(|e| DistPublishError::parse(format!("invalid branch pattern: {}", e)))?;

    let mut branches = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line = line
            .strip_prefix("* ")
            .or_else(|| line.strip_prefix("+ "))
            .unwrap_or(line)
            .trim_start();

        if symbolic.is_match(line) || line.starts_with('(') {
            continue;
        }

        let caps = qualified
            .captures(line)
            .ok_or_else(|| DistPublishError::parse(format!("unparseable branch line '{}'", raw)))?;
        let name = caps.get(3).map_or("", |m| m.as_str());
        if name.is_empty() {
            return Err(DistPublishError::parse(format!(
                "branch line '{}' has no branch name",
                raw
            )));
        }

        branches.push(BranchRef {
            name: name.to_string(),
            remote: caps.get(2).map(|m| m.as_str().to_string()),
        });
    }

    Ok(branches)
}
