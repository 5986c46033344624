//! Formatting functions for UI output.
//!
//! Status and success lines go to stdout, errors and warnings to stderr.

use std::path::Path;

use console::style;

use crate::warning::PublishWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a publish warning to the user.
pub fn display_warning(warning: &PublishWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Tell the user where the unpushed result of a dry run can be inspected.
pub fn display_dry_run_notice(clone_path: &Path) {
    println!(
        "\n{} Dry run: nothing was pushed. Inspect the result in:\n  {}",
        style("→").yellow(),
        style(clone_path.display()).cyan()
    );
}

/// Installation instructions for the published tags.
///
/// # Arguments
/// * `package` - Package name to install under
/// * `url` - Clone URL of the distribution repository
/// * `tags` - Tags that were pushed
/// * `commit` - Short hash of the published commit
pub fn display_install_instructions(package: &str, url: &str, tags: &[String], commit: &str) {
    println!(
        "\n{} Published commit {} with {} tag(s)",
        style("✓").green(),
        style(commit).bold(),
        tags.len()
    );
    println!("{}", style("Install with:").bold());
    for tag in tags {
        println!("  {}", style(install_command(package, url, tag)).cyan());
    }
}

fn install_command(package: &str, url: &str, tag: &str) -> String {
    format!("npm install {}@git+{}#{}", package, url, tag)
}
