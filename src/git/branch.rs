use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DistPublishError, Result};
use crate::git::GitRepository;
use crate::process::Invocation;

/// A local branch or remote-tracking ref of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    repo_dir: PathBuf,
    name: String,
    remote: Option<String>,
}

impl Branch {
    /// Build a branch from names git itself produced; no validation
    pub(crate) fn trusted(repo_dir: &Path, name: String, remote: Option<String>) -> Self {
        Branch {
            repo_dir: repo_dir.to_path_buf(),
            name,
            remote,
        }
    }

    /// Create a branch value from user input.
    ///
    /// The name is checked with `git check-ref-format --branch`.
    pub async fn create(
        repo: &GitRepository,
        name: &str,
        remote: Option<&str>,
    ) -> Result<Self> {
        if !Self::is_valid_name(repo, name).await {
            return Err(DistPublishError::precondition(format!(
                "'{}' is not a valid branch name",
                name
            )));
        }
        Ok(Self::trusted(
            repo.dir(),
            name.to_string(),
            remote.map(str::to_string),
        ))
    }

    /// Ask git whether `name` is a valid branch name.
    ///
    /// Any failure, including a non-zero exit, means "invalid".
    pub async fn is_valid_name(repo: &GitRepository, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let invocation =
            Invocation::new("git", repo.dir()).args(["check-ref-format", "--branch", name]);
        repo.runner().run(&invocation).await.is_ok()
    }

    /// Every branch of `repo`, from its (possibly cached) enumeration
    pub async fn enumerate(repo: &mut GitRepository) -> Result<Vec<Branch>> {
        Ok(repo.get_branches(false).await?.to_vec())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote name for remote-tracking refs
    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Directory of the repository this branch belongs to
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// `remote/name` for remote-tracking refs, `name` otherwise
    pub fn full_name(&self) -> String {
        match &self.remote {
            Some(remote) => format!("{}/{}", remote, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
