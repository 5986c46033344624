//! Parser for `git remote -v`.

use crate::error::{DistPublishError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Parse `name<ws>url<ws>(direction)` lines into a name → URL list.
///
/// Remotes keep the position of their first appearance; when a name is
/// listed more than once the last URL wins.
pub fn parse_remotes(text: &str) -> Result<Vec<Remote>> {
    let mut remotes: Vec<Remote> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(name), Some(url)) = (fields.next(), fields.next()) else {
            return Err(DistPublishError::parse(format!(
                "unparseable remote line '{}'",
                line
            )));
        };

        match remotes.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.url = url.to_string(),
            None => remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
            }),
        }
    }

    Ok(remotes)
}
