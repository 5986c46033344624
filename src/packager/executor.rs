use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{DistPublishError, Result};
use crate::fs::{copy_recursive, run_blocking};
use crate::git::GitRepository;
use crate::package::PackageDescriptor;
use crate::packager::PackContext;
use crate::process::Invocation;

/// File name prefixes copied from the package root alongside `files`
const ROOT_DOCUMENT_PREFIXES: [&str; 4] = ["README", "LICENSE", "LICENCE", "CHANGELOG"];

/// Produces the distributable content of a package
#[derive(Debug, Clone, Default)]
pub struct Packager {
    command: Option<String>,
}

impl Packager {
    /// A packager that runs `command` when set and copies otherwise
    pub fn new(command: Option<String>) -> Self {
        Packager { command }
    }

    /// Write the content of `descriptor`'s package into `target`
    ///
    /// # Arguments
    /// * `source` - Development repository holding the package
    /// * `descriptor` - Its package descriptor
    /// * `target` - Working tree of the destination clone
    pub async fn pack(
        &self,
        source: &GitRepository,
        descriptor: &PackageDescriptor,
        target: &Path,
    ) -> Result<()> {
        match &self.command {
            Some(command) => self.run_command(command, source, descriptor, target).await,
            None => {
                let copied = copy_content(source, descriptor, target).await?;
                tracing::debug!(copied, target = %target.display(), "copied package content");
                Ok(())
            }
        }
    }

    async fn run_command(
        &self,
        command: &str,
        source: &GitRepository,
        descriptor: &PackageDescriptor,
        target: &Path,
    ) -> Result<()> {
        let context = PackContext {
            target: target.to_path_buf(),
            source: source.dir().to_path_buf(),
            package: descriptor.name.clone().unwrap_or_default(),
            version: descriptor
                .version
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };

        let mut invocation = Invocation::new("sh", source.dir())
            .args(["-c", command])
            .describe(format!("Packaging with `{}`", command));
        for (key, value) in context.to_env_vars() {
            invocation = invocation.env(key, value);
        }

        let output = source.runner().run(&invocation).await?;
        if !output.is_empty() {
            tracing::debug!(%output, "packaging command output");
        }
        Ok(())
    }
}

/// Copy the package content and return how many top-level paths were copied
async fn copy_content(
    source: &GitRepository,
    descriptor: &PackageDescriptor,
    target: &Path,
) -> Result<usize> {
    let root = source.dir();

    let paths: BTreeSet<PathBuf> = match &descriptor.files {
        Some(files) => {
            let mut paths = root_documents(root).await?;
            for entry in files {
                let relative = listed_path(entry)?;
                if !root.join(&relative).exists() {
                    return Err(DistPublishError::package(format!(
                        "'{}' is listed in files but does not exist",
                        entry
                    )));
                }
                paths.insert(relative);
            }
            paths
        }
        None => source
            .files()
            .await?
            .iter()
            .filter_map(|entry| entry.path().strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .collect(),
    };

    let root = root.to_path_buf();
    let target = target.to_path_buf();
    run_blocking(move || {
        let mut copied = 0;
        for relative in &paths {
            let src = root.join(relative);
            // Tracked but deleted in the working tree
            if fs::symlink_metadata(&src).is_err() {
                continue;
            }
            copy_recursive(&src, &target.join(relative))?;
            copied += 1;
        }
        Ok(copied)
    })
    .await
}

/// `package.json` plus README, LICENSE and CHANGELOG variants at `root`
async fn root_documents(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut paths = BTreeSet::new();
    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        let upper = name.to_uppercase();
        if name == PackageDescriptor::FILE_NAME
            || ROOT_DOCUMENT_PREFIXES.iter().any(|p| upper.starts_with(p))
        {
            paths.insert(PathBuf::from(&file_name));
        }
    }
    Ok(paths)
}

/// Normalise a `files` entry, refusing anything that leaves the package root
fn listed_path(entry: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => {
                return Err(DistPublishError::package(format!(
                    "files entry '{}' points outside the package",
                    entry
                )))
            }
        }
    }
    if path.as_os_str().is_empty() {
        return Err(DistPublishError::package("empty files entry"));
    }
    Ok(path)
}
