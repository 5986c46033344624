use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while publishing.
/// These are reported to the user but do not change the outcome by themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishWarning {
    /// A clone left behind by an earlier run was deleted
    StaleCloneRemoved { path: PathBuf },
    /// Tags that already exist will be moved because force-tagging is on
    ForcingExistingTags { tags: Vec<String> },
    /// A tag could not be pushed; the run fails after all pushes settle
    PushFailed {
        tag: String,
        remote: String,
        reason: String,
    },
}

impl fmt::Display for PublishWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishWarning::StaleCloneRemoved { path } => {
                write!(f, "Removed stale clone at {}", path.display())
            }
            PublishWarning::ForcingExistingTags { tags } => {
                write!(f, "Overwriting existing tags: {}", tags.join(", "))
            }
            PublishWarning::PushFailed {
                tag,
                remote,
                reason,
            } => {
                write!(f, "Failed to push tag '{}' to '{}': {}", tag, remote, reason)
            }
        }
    }
}
