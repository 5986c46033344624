use std::collections::BTreeSet;

use crate::domain::CommitHash;

/// A git tag to be applied to the publish commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub message: Option<String>,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Annotation recorded on every publish tag so it can be traced back
/// to the development branch and commit it was built from
pub fn publish_annotation(source_branch: &str, source_commit: &CommitHash) -> String {
    format!(
        "Published from branch {} at commit {}",
        source_branch, source_commit
    )
}

/// Names of `wanted` that are already present in `existing`, sorted
pub fn existing_tags<'a>(wanted: &'a BTreeSet<String>, existing: &[String]) -> Vec<&'a str> {
    wanted
        .iter()
        .filter(|tag| existing.iter().any(|e| e == *tag))
        .map(String::as_str)
        .collect()
}
