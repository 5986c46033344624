//! Deterministic names for publish tags and scratch branches.

use chrono::{DateTime, TimeZone};
use semver::Version;

/// Tag derived from a package version, e.g. `v1.2.3`
pub fn version_tag(version: &Version) -> String {
    format!("v{}", version)
}

/// Name of the throwaway branch that holds a publish commit.
///
/// Composed of `base`, the operator's user name and a millisecond timestamp
/// so an interrupted earlier run never collides with the current one.
pub fn scratch_branch_name<Tz: TimeZone>(base: &str, user: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}-{}-{}",
        base,
        sanitize_ref_component(user),
        now.format("%Y%m%d%H%M%S%3f")
    )
}

/// The operating user's name, as seen in the environment
pub fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

// Keep only characters that are always legal inside a ref component.
fn sanitize_ref_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}
