//! Git operations layer
//!
//! Everything here shells out to the `git` executable through a
//! [`CommandRunner`](crate::process::CommandRunner) and parses its textual
//! output into typed values.
//!
//! - [`GitRepository`]: façade over one working copy, with cached branch and
//!   log listings
//! - [`Branch`]: local or remote-tracking branch value
//! - [`parse`]: one parser per git output shape
//! - [`mock::MockRunner`]: scripted runner for tests
//!
//! ```rust,no_run
//! # use git_dist_publish::git::GitRepository;
//! # async fn example() -> git_dist_publish::Result<()> {
//! let mut repo = GitRepository::from_directory(".")?;
//! let head = repo.current_commit_hash().await?;
//! let branches = repo.get_branches(false).await?;
//! println!("{} branches, HEAD at {}", branches.len(), head.to_short_string());
//! # Ok(())
//! # }
//! ```

pub mod branch;
pub mod mock;
pub mod parse;
pub mod repository;

pub use branch::Branch;
pub use mock::MockRunner;
pub use parse::Remote;
pub use repository::{GitRepository, TagDeletion};
