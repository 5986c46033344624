pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs;
pub mod git;
pub mod package;
pub mod packager;
pub mod process;
pub mod remote;
pub mod ui;
pub mod warning;

pub use error::{DistPublishError, Result};
