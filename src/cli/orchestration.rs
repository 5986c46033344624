//! Main workflow orchestration logic
//!
//! Runs the publish workflow step by step. Any failure aborts the run with the
//! error that triggered it; nothing already done is rolled back, so an
//! interrupted run may leave the clone or local tags behind.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::Config;
use crate::domain::{
    current_user, existing_tags, publish_annotation, scratch_branch_name, version_tag, CommitHash,
    Tag,
};
use crate::error::{DistPublishError, Result};
use crate::fs::{prune_empty_dirs, remove_dir_if_exists, run_blocking, FsEntry};
use crate::git::{Branch, GitRepository};
use crate::package::{rewrite_for_destination, PackageDescriptor};
use crate::packager::Packager;
use crate::process::{CommandRunner, SystemRunner};
use crate::remote::RemoteUrl;
use crate::ui;
use crate::warning::PublishWarning;

/// Arguments for the publish workflow
///
/// Mirrors the CLI Args without depending on clap, so the workflow can be
/// called programmatically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishWorkflowArgs {
    /// Development repository holding the package
    pub directory: PathBuf,

    /// Explicit tags to create
    pub tags: Vec<String>,

    /// Also tag with `v<package version>`
    pub tag_version: bool,

    /// Move tags that already exist
    pub force_tags: bool,

    /// Stop before pushing
    pub dry_run: bool,

    /// Destination repository, overriding configuration and descriptor
    pub dist_repo: Option<String>,
}

/// What will be published, settled before anything is touched
#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub descriptor: PackageDescriptor,
    pub tags: BTreeSet<String>,
}

/// State of the development repository once it passed every check
#[derive(Debug, Clone)]
pub struct SourceState {
    pub branch: Branch,
    pub commit: CommitHash,
    /// Target tags that already exist and will be moved
    pub existing_tags: Vec<String>,
}

/// Result of a successful publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Name written into the published descriptor
    pub package: String,

    /// Clone URL of the distribution repository
    pub url: String,

    /// Working tree of the distribution clone
    pub clone_path: PathBuf,

    /// Scratch branch the content was committed on
    pub branch: String,

    pub tags: Vec<String>,

    /// The published commit in the distribution repository
    pub commit: CommitHash,

    /// Whether the tags were pushed (false for a dry run)
    pub pushed: bool,

    pub warnings: Vec<PublishWarning>,
}

/// Main publish workflow, using the system `git`
///
/// 1. Resolve the package and the tag set
/// 2. Validate the development repository
/// 3. Clone the distribution repository fresh
/// 4. Check out the source commit on a new scratch branch
/// 5. Clear all tracked content
/// 6. Package the build output into the clone
/// 7. Point the descriptor at the distribution repository
/// 8. Commit
/// 9. Tag
/// 10. Stop here on a dry run
/// 11. Push the tags
pub async fn run_publish_workflow(
    args: PublishWorkflowArgs,
    config: &Config,
) -> Result<WorkflowResult> {
    run_publish_workflow_with_runner(args, config, Arc::new(SystemRunner)).await
}

/// [`run_publish_workflow`] with a custom command runner
pub async fn run_publish_workflow_with_runner(
    args: PublishWorkflowArgs,
    config: &Config,
    runner: Arc<dyn CommandRunner>,
) -> Result<WorkflowResult> {
    let mut warnings = Vec::new();

    let mut source = GitRepository::with_runner(&args.directory, Arc::clone(&runner))?;
    let plan = resolve_plan(&args, source.dir())?;
    tracing::info!(tags = ?plan.tags, "resolved publish plan");

    ui::display_status("Checking the development repository...");
    let state = check_initial_conditions(
        &mut source,
        &plan,
        args.force_tags,
        &config.tracking_remote,
    )
    .await?;
    if !state.existing_tags.is_empty() {
        report(
            &mut warnings,
            PublishWarning::ForcingExistingTags {
                tags: state.existing_tags.clone(),
            },
        );
    }

    let dist_url = resolve_destination(&args, config, &plan.descriptor)?;
    let clone_path = config.temp_dir.join(dist_url.project_name());
    if remove_dir_if_exists(&clone_path).await? {
        report(
            &mut warnings,
            PublishWarning::StaleCloneRemoved {
                path: clone_path.clone(),
            },
        );
    }
    ui::display_status(&format!("Cloning {}...", dist_url));
    let mut dest =
        GitRepository::clone_with_runner(&dist_url, &config.temp_dir, Arc::clone(&runner)).await?;

    dest.checkout_commit(&state.commit).await?;
    let scratch = scratch_branch_name(
        &config.scratch_branch_base,
        &current_user(),
        &chrono::Local::now(),
    );
    let scratch = Branch::create(&dest, &scratch, None).await?;
    dest.checkout_branch(&scratch, true).await?;
    tracing::info!(branch = %scratch, commit = %state.commit, "aligned distribution clone");

    let removed = clear_tracked_content(&dest).await?;
    tracing::debug!(removed, "cleared tracked content");

    ui::display_status("Packaging build output...");
    Packager::new(config.dist.command.clone())
        .pack(&source, &plan.descriptor, dest.dir())
        .await?;

    let package = dest.name().await?;
    let descriptor_path = dest.dir().join(PackageDescriptor::FILE_NAME);
    if !descriptor_path.is_file() {
        return Err(DistPublishError::package(format!(
            "packaged content has no {}",
            PackageDescriptor::FILE_NAME
        )));
    }
    let (name, url) = (package.clone(), dist_url.clone_url().to_string());
    run_blocking(move || rewrite_for_destination(&descriptor_path, &name, &url)).await?;

    dest.stage_all().await?;
    let published = dest.commit(&config.commit_message).await?;
    ui::display_success(&format!(
        "Committed {} on {}",
        published.hash.to_short_string(),
        scratch
    ));

    let annotation = publish_annotation(state.branch.name(), &state.commit);
    let tags: Vec<Tag> = plan
        .tags
        .iter()
        .map(|name| Tag::new(name.as_str()).with_message(annotation.as_str()))
        .collect();
    dest.create_tags(&tags, args.force_tags).await?;
    let tag_names: Vec<String> = plan.tags.iter().cloned().collect();
    ui::display_success(&format!("Created tags: {}", tag_names.join(", ")));

    let mut result = WorkflowResult {
        package,
        url: dist_url.clone_url().to_string(),
        clone_path: dest.dir().to_path_buf(),
        branch: scratch.name().to_string(),
        tags: tag_names,
        commit: published.hash,
        pushed: false,
        warnings: Vec::new(),
    };

    if args.dry_run {
        tracing::info!(clone = %result.clone_path.display(), "dry run, not pushing");
        result.warnings = warnings;
        return Ok(result);
    }

    let outcomes = dest
        .push_tags(&result.tags, &config.push_remote, args.force_tags)
        .await;
    let mut first_error = None;
    for (tag, outcome) in outcomes {
        if let Err(e) = outcome {
            report(
                &mut warnings,
                PublishWarning::PushFailed {
                    tag,
                    remote: config.push_remote.clone(),
                    reason: e
                        .process_stderr()
                        .map(str::to_string)
                        .unwrap_or_else(|| e.to_string()),
                },
            );
            first_error.get_or_insert(e);
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    result.pushed = true;
    result.warnings = warnings;
    Ok(result)
}

/// Read the package descriptor and build the set of tags to create
pub fn resolve_plan(args: &PublishWorkflowArgs, source_dir: &Path) -> Result<PublishPlan> {
    let descriptor = PackageDescriptor::read(source_dir)?;

    let mut tags: BTreeSet<String> = args
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if args.tag_version {
        let version = descriptor.version.as_ref().ok_or_else(|| {
            DistPublishError::precondition(format!(
                "--tag-version given but {} has no version",
                descriptor.path.display()
            ))
        })?;
        tags.insert(version_tag(version));
    }

    if tags.is_empty() {
        return Err(DistPublishError::precondition(
            "no tags to create; pass --tag or --tag-version",
        ));
    }

    Ok(PublishPlan { descriptor, tags })
}

/// Refuse to publish from a repository whose state is not reproducible
///
/// The working tree must be clean, `HEAD` on a branch that matches its
/// tracking branch, the package versioned, and no target tag may exist unless
/// `force_tags` is set.
pub async fn check_initial_conditions(
    source: &mut GitRepository,
    plan: &PublishPlan,
    force_tags: bool,
    tracking_remote: &str,
) -> Result<SourceState> {
    let modified = source.modified_files().await?;
    if !modified.is_empty() {
        return Err(DistPublishError::precondition(format!(
            "uncommitted changes in {}",
            relative_list(source.dir(), &modified)
        )));
    }

    let untracked = source.untracked_files().await?;
    if !untracked.is_empty() {
        return Err(DistPublishError::precondition(format!(
            "untracked files present: {}",
            relative_list(source.dir(), &untracked)
        )));
    }

    let branch = source.get_current_branch().await?.ok_or_else(|| {
        DistPublishError::precondition("HEAD is detached; check out the branch to publish")
    })?;

    let delta = source.get_commit_deltas(tracking_remote).await?;
    if !delta.is_in_sync() {
        return Err(DistPublishError::precondition(format!(
            "branch '{}' is {} ahead and {} behind {}/{}",
            branch, delta.ahead, delta.behind, tracking_remote, branch
        )));
    }

    if plan.descriptor.version.is_none() {
        return Err(DistPublishError::precondition(format!(
            "{} has no version",
            plan.descriptor.path.display()
        )));
    }

    let present = source.tags().await?;
    let existing: Vec<String> = existing_tags(&plan.tags, &present)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !force_tags {
        if let Some(tag) = existing.first() {
            return Err(DistPublishError::precondition(format!(
                "tag '{}' already exists; use --force-tags to move it",
                tag
            )));
        }
    }

    let commit = source.current_commit_hash().await?;
    Ok(SourceState {
        branch,
        commit,
        existing_tags: existing,
    })
}

/// Destination from the command line, then configuration, then
/// `distRepository`, then the package's own `repository.url`
pub fn resolve_destination(
    args: &PublishWorkflowArgs,
    config: &Config,
    descriptor: &PackageDescriptor,
) -> Result<RemoteUrl> {
    let raw = args
        .dist_repo
        .as_deref()
        .or(config.dist.repository.as_deref())
        .or(descriptor.dist_repository_url())
        .or(descriptor.repository_url())
        .ok_or_else(|| {
            DistPublishError::config(
                "no distribution repository: set distRepository or repository.url \
                 in package.json, [dist] repository in distpublish.toml, or pass --dist-repo",
            )
        })?;
    RemoteUrl::parse(raw)
}

/// Delete every tracked file concurrently, then prune emptied directories
async fn clear_tracked_content(dest: &GitRepository) -> Result<usize> {
    let entries = dest.files().await?;
    let count = entries.len();

    let mut set = JoinSet::new();
    for entry in entries {
        set.spawn(async move { entry.delete().await });
    }
    while let Some(joined) = set.join_next().await {
        joined.map_err(|e| DistPublishError::resource(format!("delete task failed: {}", e)))??;
    }

    let root = dest.dir().to_path_buf();
    let pruned = run_blocking(move || prune_empty_dirs(&root)).await?;
    tracing::debug!(pruned, "pruned empty directories");
    Ok(count)
}

fn relative_list(root: &Path, entries: &[FsEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap_or(e.path())
                .display()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn report(warnings: &mut Vec<PublishWarning>, warning: PublishWarning) {
    tracing::warn!("{}", warning);
    ui::display_warning(&warning);
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRunner;

    const HEAD: &str = "0123456789abcdef0123456789abcdef01234567";

    fn package_dir(json: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("package.json"), json).unwrap();
        dir
    }

    fn args(dir: &Path) -> PublishWorkflowArgs {
        PublishWorkflowArgs {
            directory: dir.to_path_buf(),
            ..Default::default()
        }
    }

    fn clean_repo() -> MockRunner {
        MockRunner::new()
            .on("ls-files -z --modified", "")
            .on("ls-files -z --others --exclude-standard", "")
            .on("rev-parse --abbrev-ref HEAD", "main")
            .on("rev-list --count origin/main..HEAD", "0")
            .on("rev-list --count HEAD..origin/main", "0")
            .on("rev-parse HEAD", HEAD)
    }

    #[test]
    fn test_tag_version_yields_version_tag() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let mut a = args(dir.path());
        a.tag_version = true;

        let plan = resolve_plan(&a, dir.path()).unwrap();
        assert_eq!(plan.tags, BTreeSet::from(["v1.2.3".to_string()]));
    }

    #[test]
    fn test_explicit_tags_are_merged_and_deduplicated() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let mut a = args(dir.path());
        a.tags = vec!["latest".to_string(), "v1.2.3".to_string()];
        a.tag_version = true;

        let plan = resolve_plan(&a, dir.path()).unwrap();
        assert_eq!(plan.tags.len(), 2);
        assert!(plan.tags.contains("latest"));
    }

    #[test]
    fn test_empty_tag_set_is_rejected() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let err = resolve_plan(&args(dir.path()), dir.path()).unwrap_err();
        assert!(matches!(err, DistPublishError::Precondition(_)));
    }

    #[test]
    fn test_destination_precedence() {
        let dir = package_dir(
            r#"{"name":"widget","version":"1.0.0","distRepository":"acme/widget-dist"}"#,
        );
        let descriptor = PackageDescriptor::read(dir.path()).unwrap();
        let mut config = Config::default();
        let mut a = args(dir.path());

        let url = resolve_destination(&a, &config, &descriptor).unwrap();
        assert_eq!(url.project_name(), "widget-dist");

        config.dist.repository = Some("/srv/git/from-config.git".to_string());
        let url = resolve_destination(&a, &config, &descriptor).unwrap();
        assert_eq!(url.project_name(), "from-config");

        a.dist_repo = Some("/srv/git/from-flag.git".to_string());
        let url = resolve_destination(&a, &config, &descriptor).unwrap();
        assert_eq!(url.project_name(), "from-flag");
    }

    #[test]
    fn test_repository_url_is_last_resort_destination() {
        let dir = package_dir(
            r#"{"name":"widget","version":"1.0.0","repository":{"type":"git","url":"https://example.com/acme/widget.git"}}"#,
        );
        let descriptor = PackageDescriptor::read(dir.path()).unwrap();
        let url = resolve_destination(&args(dir.path()), &Config::default(), &descriptor).unwrap();
        assert_eq!(url.clone_url(), "https://example.com/acme/widget.git");
        assert_eq!(url.project_name(), "widget");

        let dir = package_dir(
            r#"{"name":"widget","version":"1.0.0","repository":"acme/widget","distRepository":"acme/widget-dist"}"#,
        );
        let descriptor = PackageDescriptor::read(dir.path()).unwrap();
        let url = resolve_destination(&args(dir.path()), &Config::default(), &descriptor).unwrap();
        assert_eq!(url.project_name(), "widget-dist");
    }

    #[test]
    fn test_missing_destination_is_config_error() {
        let dir = package_dir(r#"{"name":"widget","version":"1.0.0"}"#);
        let descriptor = PackageDescriptor::read(dir.path()).unwrap();
        let err = resolve_destination(&args(dir.path()), &Config::default(), &descriptor)
            .unwrap_err();
        assert!(matches!(err, DistPublishError::Config(_)));
    }

    #[tokio::test]
    async fn test_clean_repository_passes_checks() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let runner = clean_repo().on("tag --list", "v1.0.0");
        let mut source = GitRepository::with_runner(dir.path(), Arc::new(runner)).unwrap();
        let mut a = args(dir.path());
        a.tag_version = true;
        let plan = resolve_plan(&a, dir.path()).unwrap();

        let state = check_initial_conditions(&mut source, &plan, false, "origin")
            .await
            .unwrap();
        assert_eq!(state.branch.name(), "main");
        assert_eq!(state.commit.as_str(), HEAD);
        assert!(state.existing_tags.is_empty());
    }

    #[tokio::test]
    async fn test_existing_tag_is_named_in_error() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let runner = clean_repo().on("tag --list", "v1.0.0\nv1.2.3");
        let mut source = GitRepository::with_runner(dir.path(), Arc::new(runner)).unwrap();
        let mut a = args(dir.path());
        a.tag_version = true;
        let plan = resolve_plan(&a, dir.path()).unwrap();

        let err = check_initial_conditions(&mut source, &plan, false, "origin")
            .await
            .unwrap_err();
        assert!(matches!(err, DistPublishError::Precondition(_)));
        assert!(err.to_string().contains("v1.2.3"));

        let state = check_initial_conditions(&mut source, &plan, true, "origin")
            .await
            .unwrap();
        assert_eq!(state.existing_tags, vec!["v1.2.3".to_string()]);
    }

    #[tokio::test]
    async fn test_dirty_tree_fails() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let runner = MockRunner::new().on("ls-files -z --modified", "index.js\0");
        let mut source = GitRepository::with_runner(dir.path(), Arc::new(runner)).unwrap();
        let mut a = args(dir.path());
        a.tag_version = true;
        let plan = resolve_plan(&a, dir.path()).unwrap();

        let err = check_initial_conditions(&mut source, &plan, false, "origin")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("index.js"));
    }

    #[tokio::test]
    async fn test_unsynced_branch_fails() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let runner = MockRunner::new()
            .on("ls-files -z --modified", "")
            .on("ls-files -z --others --exclude-standard", "")
            .on("rev-parse --abbrev-ref HEAD", "main")
            .on("rev-list --count origin/main..HEAD", "2")
            .on("rev-list --count HEAD..origin/main", "0");
        let mut source = GitRepository::with_runner(dir.path(), Arc::new(runner)).unwrap();
        let mut a = args(dir.path());
        a.tag_version = true;
        let plan = resolve_plan(&a, dir.path()).unwrap();

        let err = check_initial_conditions(&mut source, &plan, false, "origin")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("2 ahead"));
    }

    #[tokio::test]
    async fn test_detached_head_fails() {
        let dir = package_dir(r#"{"name":"widget","version":"1.2.3"}"#);
        let runner = MockRunner::new()
            .on("ls-files -z --modified", "")
            .on("ls-files -z --others --exclude-standard", "")
            .on("rev-parse --abbrev-ref HEAD", "HEAD");
        let mut source = GitRepository::with_runner(dir.path(), Arc::new(runner)).unwrap();
        let mut a = args(dir.path());
        a.tag_version = true;
        let plan = resolve_plan(&a, dir.path()).unwrap();

        let err = check_initial_conditions(&mut source, &plan, false, "origin")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("detached"));
    }
}
