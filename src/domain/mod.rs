//! Domain values - pure types independent of git invocation

pub mod commit;
pub mod naming;
pub mod tag;

pub use commit::{CommitDelta, CommitHash, LogEntry};
pub use naming::{current_user, scratch_branch_name, version_tag};
pub use tag::{existing_tags, publish_annotation, Tag};
