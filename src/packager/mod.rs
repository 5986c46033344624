//! Materialises a package's distributable content into the destination clone
//!
//! Two modes:
//! - command: a configured shell command writes into `$DIST_PUBLISH_TARGET`
//! - copy: the descriptor's `files` plus the conventional root documents are
//!   copied, or every tracked file when `files` is absent

pub mod context;
pub mod executor;

pub use context::PackContext;
pub use executor::Packager;
