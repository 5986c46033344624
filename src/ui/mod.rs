//! User-facing terminal output.
//!
//! Diagnostic trace lines go through `tracing`; this module only renders the
//! styled lines a user is meant to read.

pub mod formatter;

pub use formatter::{
    display_dry_run_notice, display_error, display_install_instructions, display_status,
    display_success, display_warning,
};
