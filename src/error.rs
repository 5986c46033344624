use std::path::Path;

use thiserror::Error;

/// Unified error type for git-dist-publish operations
#[derive(Error, Debug)]
pub enum DistPublishError {
    /// A condition that must hold before anything is mutated
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Output of the git executable did not match the expected shape
    #[error("Unexpected git output: {0}")]
    Parse(String),

    #[error("`{command}` exited with status {code}: {stderr}")]
    Process {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Package descriptor error: {0}")]
    Package(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in git-dist-publish
pub type Result<T> = std::result::Result<T, DistPublishError>;

impl DistPublishError {
    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        DistPublishError::Precondition(msg.into())
    }

    /// Create a parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        DistPublishError::Parse(msg.into())
    }

    /// Create a resource error with context
    pub fn resource(msg: impl Into<String>) -> Self {
        DistPublishError::Resource(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DistPublishError::Config(msg.into())
    }

    /// Create a package descriptor error with context
    pub fn package(msg: impl Into<String>) -> Self {
        DistPublishError::Package(msg.into())
    }

    pub fn not_a_repository(dir: &Path) -> Self {
        DistPublishError::Resource(format!("{} is not a git repository", dir.display()))
    }

    /// Standard error text of a failed process, if this is one
    pub fn process_stderr(&self) -> Option<&str> {
        match self {
            DistPublishError::Process { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
