//! Repository URL normalisation.
//!
//! Package descriptors carry repository URLs in several npm-style spellings;
//! git only understands some of them. [`RemoteUrl`] turns them into something
//! `git clone` accepts and infers the project name used for clone directories.

use std::path::Path;

use crate::error::{DistPublishError, Result};

/// A cloneable repository location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    clone_url: String,
    project: String,
}

impl RemoteUrl {
    /// Parse a repository URL or shorthand
    ///
    /// Supports:
    /// - `https://host/owner/repo(.git)`, `ssh://`, `git://`, `file://`
    /// - the same prefixed with `git+` (npm style)
    /// - `git@host:owner/repo.git`
    /// - `github:owner/repo`, `gitlab:owner/repo`, `bitbucket:owner/repo`
    /// - `owner/repo` (assumes GitHub)
    /// - local filesystem paths
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DistPublishError::config("empty repository URL"));
        }

        let input = input.strip_prefix("git+").unwrap_or(input);

        for (prefix, host) in [
            ("github:", "github.com"),
            ("gitlab:", "gitlab.com"),
            ("bitbucket:", "bitbucket.org"),
        ] {
            if let Some(path) = input.strip_prefix(prefix) {
                return Self::hosted(host, path, input);
            }
        }

        if input.contains("://") {
            let url = url::Url::parse(input).map_err(|e| {
                DistPublishError::config(format!("Invalid repository URL '{}': {}", input, e))
            })?;
            let project = url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .map(strip_git_suffix)
                .unwrap_or_default();
            return Self::build(input.to_string(), project, input);
        }

        if is_local_path(input) {
            let project = Path::new(input)
                .file_name()
                .and_then(|n| n.to_str())
                .map(strip_git_suffix)
                .unwrap_or_default();
            return Self::build(input.to_string(), project, input);
        }

        // scp-like syntax, e.g. git@github.com:owner/repo.git
        if let Some((_, path)) = input.split_once(':') {
            let project = path
                .rsplit('/')
                .find(|s| !s.is_empty())
                .map(strip_git_suffix)
                .unwrap_or_default();
            return Self::build(input.to_string(), project, input);
        }

        if input.matches('/').count() == 1 {
            return Self::hosted("github.com", input, input);
        }

        Err(DistPublishError::config(format!(
            "Invalid repository URL: {}. Expected a git URL, owner/repo, or a local path",
            input
        )))
    }

    pub fn clone_url(&self) -> &str {
        &self.clone_url
    }

    /// Last path component without a `.git` suffix
    pub fn project_name(&self) -> &str {
        &self.project
    }

    fn hosted(host: &str, path: &str, input: &str) -> Result<Self> {
        let path = strip_git_suffix(path.trim_matches('/'));
        let project = path.rsplit('/').next().unwrap_or_default().to_string();
        Self::build(format!("https://{}/{}.git", host, path), project, input)
    }

    /// The project name becomes a directory under the clone root, so it must
    /// be a single normal path component
    fn build(clone_url: String, project: String, input: &str) -> Result<Self> {
        if project.is_empty()
            || project == "."
            || project == ".."
            || project.contains(['/', '\\'])
        {
            return Err(DistPublishError::config(format!(
                "Cannot infer a project name from repository URL '{}'",
                input
            )));
        }
        Ok(RemoteUrl { clone_url, project })
    }
}

impl std::fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.clone_url)
    }
}

fn strip_git_suffix(s: &str) -> String {
    s.strip_suffix(".git").unwrap_or(s).to_string()
}

fn is_local_path(s: &str) -> bool {
    s.starts_with('/')
        || s.starts_with("./")
        || s.starts_with("../")
        || s.starts_with('~')
        || (s.len() > 2 && s.as_bytes()[1] == b':' && (s.as_bytes()[2] == b'\\' || s.as_bytes()[2] == b'/'))
}
