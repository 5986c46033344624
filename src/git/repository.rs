use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::domain::{CommitDelta, CommitHash, LogEntry, Tag};
use crate::error::{DistPublishError, Result};
use crate::fs::FsEntry;
use crate::git::branch::Branch;
use crate::git::parse::{
    parse_branch_list, parse_lines, parse_log, parse_nul_paths, parse_remotes, Remote,
};
use crate::package::PackageDescriptor;
use crate::process::{CommandRunner, Invocation, SystemRunner};
use crate::remote::RemoteUrl;

/// Outcome of [`GitRepository::delete_tag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDeletion {
    Deleted,
    /// The tag did not exist; nothing was done
    NotFound,
}

/// A local working copy driven through the `git` executable.
///
/// Branch and log listings are cached on the value. A cache is either absent
/// or holds a complete listing; the `invalidate_*` methods drop it whole.
pub struct GitRepository {
    dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
    branches: Option<Vec<Branch>>,
    log: Option<Vec<LogEntry>>,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("dir", &self.dir)
            .field("branches_cached", &self.branches.is_some())
            .field("log_cached", &self.log.is_some())
            .finish()
    }
}

impl GitRepository {
    /// Open the working copy at `dir`, which must contain a `.git` entry
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_runner(dir, Arc::new(SystemRunner))
    }

    /// Like [`from_directory`](Self::from_directory) with a custom runner
    pub fn with_runner(dir: impl AsRef<Path>, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() || !dir.join(".git").exists() {
            return Err(DistPublishError::not_a_repository(dir));
        }
        Ok(GitRepository {
            dir: dir.to_path_buf(),
            runner,
            branches: None,
            log: None,
        })
    }

    /// Clone `source` into `<parent_dir>/<project name>` and open it
    pub async fn clone_repository(source: &RemoteUrl, parent_dir: &Path) -> Result<Self> {
        Self::clone_with_runner(source, parent_dir, Arc::new(SystemRunner)).await
    }

    pub async fn clone_with_runner(
        source: &RemoteUrl,
        parent_dir: &Path,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        if parent_dir.exists() && !parent_dir.is_dir() {
            return Err(DistPublishError::resource(format!(
                "clone destination {} is not a directory",
                parent_dir.display()
            )));
        }
        tokio::fs::create_dir_all(parent_dir).await?;

        let project = source.project_name();
        let invocation = Invocation::new("git", parent_dir)
            .args(["clone", source.clone_url(), project])
            .describe(format!("Cloning {}", source));
        runner.run(&invocation).await?;

        Self::with_runner(parent_dir.join(project), runner)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }

    // Messages are matched on, so keep them untranslated
    fn git(&self) -> Invocation {
        Invocation::new("git", &self.dir).env("LC_ALL", "C")
    }

    async fn run(&self, invocation: Invocation) -> Result<String> {
        self.runner.run(&invocation).await
    }

    pub async fn current_commit_hash(&self) -> Result<CommitHash> {
        let out = self.run(self.git().args(["rev-parse", "HEAD"])).await?;
        CommitHash::new(&out)
    }

    /// Remotes in listing order, last URL winning per name
    pub async fn remotes(&self) -> Result<Vec<Remote>> {
        let out = self.run(self.git().args(["remote", "-v"])).await?;
        parse_remotes(&out)
    }

    /// Best available project name.
    ///
    /// Tried in order: the first remote's URL, the package descriptor's
    /// `name`, the directory name.
    pub async fn name(&self) -> Result<String> {
        if let Some(remote) = self.remotes().await?.first() {
            match RemoteUrl::parse(&remote.url) {
                Ok(url) => return Ok(url.project_name().to_string()),
                Err(e) => tracing::debug!(remote = %remote.name, "ignoring remote url: {}", e),
            }
        }

        if let Some(name) = PackageDescriptor::read_optional(&self.dir)?.and_then(|p| p.name) {
            return Ok(name);
        }

        self.dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                DistPublishError::resource(format!(
                    "cannot determine a name for the repository at {}",
                    self.dir.display()
                ))
            })
    }

    pub async fn tags(&self) -> Result<Vec<String>> {
        let out = self.run(self.git().args(["tag", "--list"])).await?;
        Ok(parse_lines(&out))
    }

    pub async fn has_tag(&self, name: &str) -> Result<bool> {
        Ok(self.tags().await?.iter().any(|t| t == name))
    }

    /// Create an annotated tag on `HEAD`; `force` moves an existing tag
    pub async fn create_tag(&self, name: &str, message: Option<&str>, force: bool) -> Result<()> {
        let invocation = tag_invocation(self.git(), name, message, force);
        self.run(invocation).await.map(|_| ())
    }

    /// Create all `tags` concurrently
    pub async fn create_tags(&self, tags: &[Tag], force: bool) -> Result<()> {
        let batch = tags
            .iter()
            .map(|tag| {
                let invocation = tag_invocation(self.git(), &tag.name, tag.message.as_deref(), force)
                    .describe(format!("Creating tag {}", tag.name));
                (tag.name.clone(), invocation)
            })
            .collect();

        for (_, result) in self.run_batch(batch).await {
            result?;
        }
        Ok(())
    }

    /// Delete a local tag; a tag that does not exist is not an error
    pub async fn delete_tag(&self, name: &str) -> Result<TagDeletion> {
        match self.run(self.git().args(["tag", "-d", name])).await {
            Ok(_) => Ok(TagDeletion::Deleted),
            Err(e) if e.process_stderr().is_some_and(|s| s.contains("not found")) => {
                Ok(TagDeletion::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn push_tag(&self, name: &str, remote: &str, force: bool) -> Result<()> {
        let invocation = push_tag_invocation(self.git(), name, remote, force);
        self.run(invocation).await.map(|_| ())
    }

    /// Push all `names` to `remote` concurrently, reporting each outcome
    pub async fn push_tags(
        &self,
        names: &[String],
        remote: &str,
        force: bool,
    ) -> Vec<(String, Result<()>)> {
        let batch = names
            .iter()
            .map(|name| {
                let invocation = push_tag_invocation(self.git(), name, remote, force)
                    .describe(format!("Pushing tag {} to {}", name, remote));
                (name.clone(), invocation)
            })
            .collect();

        self.run_batch(batch)
            .await
            .into_iter()
            .map(|(name, result)| (name, result.map(|_| ())))
            .collect()
    }

    // One task per invocation, all joined before returning. Results come
    // back in completion order.
    async fn run_batch(&self, batch: Vec<(String, Invocation)>) -> Vec<(String, Result<String>)> {
        let mut set = JoinSet::new();
        for (key, invocation) in batch {
            let runner = Arc::clone(&self.runner);
            set.spawn(async move {
                let result = runner.run(&invocation).await;
                (key, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => results.push(outcome),
                Err(e) => results.push((
                    String::new(),
                    Err(DistPublishError::resource(format!("git task failed: {}", e))),
                )),
            }
        }
        results
    }

    /// All local and remote-tracking branches, cached until invalidated
    pub async fn get_branches(&mut self, force_update: bool) -> Result<&[Branch]> {
        if force_update || self.branches.is_none() {
            let out = self
                .run(self.git().args(["branch", "--all", "--no-color"]))
                .await?;
            let branches = parse_branch_list(&out)?
                .into_iter()
                .map(|b| Branch::trusted(&self.dir, b.name, b.remote))
                .collect::<Vec<_>>();
            tracing::debug!(count = branches.len(), "branch cache refreshed");
            self.branches = Some(branches);
        }
        Ok(self.branches.as_deref().unwrap_or_default())
    }

    /// The checked-out branch, or `None` when `HEAD` is detached
    pub async fn get_current_branch(&self) -> Result<Option<Branch>> {
        let out = self
            .run(self.git().args(["rev-parse", "--abbrev-ref", "HEAD"]))
            .await?;
        if out == "HEAD" {
            return Ok(None);
        }
        Ok(Some(Branch::trusted(&self.dir, out, None)))
    }

    /// Check out `branch`, creating it when asked and not already present
    pub async fn checkout_branch(&mut self, branch: &Branch, create_if_missing: bool) -> Result<()> {
        let create = create_if_missing
            && !self
                .get_branches(false)
                .await?
                .iter()
                .any(|b| !b.is_remote() && b.name() == branch.name());

        let mut invocation = self.git().arg("checkout");
        if create {
            invocation = invocation.arg("-b");
        }
        let invocation = invocation
            .arg(branch.name())
            .describe(format!("Checking out branch {}", branch.name()));
        self.run(invocation).await?;

        if create {
            self.invalidate_branches();
        }
        Ok(())
    }

    /// Check out `hash`, leaving `HEAD` detached
    pub async fn checkout_commit(&self, hash: &CommitHash) -> Result<()> {
        self.run(
            self.git()
                .args(["checkout", "--detach", hash.as_str()])
                .describe(format!("Checking out commit {}", hash.to_short_string())),
        )
        .await
        .map(|_| ())
    }

    pub async fn stage_all(&self) -> Result<()> {
        self.run(self.git().args(["add", "--all"])).await.map(|_| ())
    }

    /// Commit staged changes and return the new commit as a log entry
    pub async fn commit(&mut self, message: &str) -> Result<LogEntry> {
        self.run(
            self.git()
                .args(["commit", "-m", message])
                .describe("Committing"),
        )
        .await?;
        self.invalidate_log();

        let hash = self.current_commit_hash().await?;
        let out = self
            .run(self.git().args([
                "show",
                "--no-patch",
                "--no-color",
                "--no-decorate",
                "--no-show-signature",
                "--format=medium",
                "--date=iso-strict",
                hash.as_str(),
            ]))
            .await?;

        parse_log(&out)?
            .into_iter()
            .next()
            .ok_or_else(|| DistPublishError::parse(format!("no log entry for commit {}", hash)))
    }

    /// Commits `HEAD` is ahead of and behind `<tracking_remote>/<branch>`.
    ///
    /// Both counts are queried concurrently. Fails when `HEAD` is detached.
    pub async fn get_commit_deltas(&self, tracking_remote: &str) -> Result<CommitDelta> {
        let branch = self.get_current_branch().await?.ok_or_else(|| {
            DistPublishError::precondition("HEAD is detached; cannot compare with a remote branch")
        })?;
        let upstream = format!("{}/{}", tracking_remote, branch.name());

        let ahead_range = format!("{}..HEAD", upstream);
        let behind_range = format!("HEAD..{}", upstream);
        let (ahead, behind) = tokio::try_join!(
            self.run(self.git().args(["rev-list", "--count", ahead_range.as_str()])),
            self.run(self.git().args(["rev-list", "--count", behind_range.as_str()])),
        )
        .map_err(|e| {
            let missing = e.process_stderr().is_some_and(|s| {
                s.contains("unknown revision") || s.contains("ambiguous argument")
            });
            if missing {
                DistPublishError::precondition(format!(
                    "branch '{}' has no counterpart on {}",
                    branch, tracking_remote
                ))
            } else {
                e
            }
        })?;

        Ok(CommitDelta {
            ahead: parse_count(&ahead)?,
            behind: parse_count(&behind)?,
        })
    }

    /// Commit history of `HEAD`, oldest first, cached until invalidated
    pub async fn get_log(&mut self, force_update: bool) -> Result<&[LogEntry]> {
        if force_update || self.log.is_none() {
            let out = self
                .run(self.git().args([
                    "log",
                    "--no-color",
                    "--no-decorate",
                    "--no-show-signature",
                    "--format=medium",
                    "--date=iso-strict",
                ]))
                .await?;
            let mut entries = parse_log(&out)?;
            entries.reverse();
            tracing::debug!(count = entries.len(), "log cache refreshed");
            self.log = Some(entries);
        }
        Ok(self.log.as_deref().unwrap_or_default())
    }

    pub fn invalidate_branches(&mut self) {
        self.branches = None;
    }

    pub fn invalidate_log(&mut self) {
        self.log = None;
    }

    /// Tracked files with uncommitted modifications
    pub async fn modified_files(&self) -> Result<Vec<FsEntry>> {
        self.list_files(&["--modified"]).await
    }

    /// Files not tracked and not ignored
    pub async fn untracked_files(&self) -> Result<Vec<FsEntry>> {
        self.list_files(&["--others", "--exclude-standard"]).await
    }

    /// Every tracked file
    pub async fn files(&self) -> Result<Vec<FsEntry>> {
        self.list_files(&[]).await
    }

    async fn list_files(&self, flags: &[&str]) -> Result<Vec<FsEntry>> {
        let invocation = self
            .git()
            .args(["ls-files", "-z"])
            .args(flags.iter().copied());
        let out = self.runner.run_raw(&invocation).await?;
        Ok(parse_nul_paths(&out)
            .into_iter()
            .map(|p| FsEntry::classify(self.dir.join(p)))
            .collect())
    }
}

fn tag_invocation(git: Invocation, name: &str, message: Option<&str>, force: bool) -> Invocation {
    let mut invocation = git.args(["tag", "-a", name, "-m", message.unwrap_or("")]);
    if force {
        invocation = invocation.arg("--force");
    }
    invocation
}

fn push_tag_invocation(git: Invocation, name: &str, remote: &str, force: bool) -> Invocation {
    let mut invocation = git.arg("push");
    if force {
        invocation = invocation.arg("--force");
    }
    invocation.args([remote.to_string(), format!("refs/tags/{}", name)])
}

fn parse_count(out: &str) -> Result<u32> {
    out.trim()
        .parse()
        .map_err(|_| DistPublishError::parse(format!("expected a commit count, got '{}'", out)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockRunner;
    use std::time::Duration;

    fn repo_with(runner: MockRunner) -> (tempfile::TempDir, GitRepository, Arc<MockRunner>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let runner = Arc::new(runner);
        let repo = GitRepository::with_runner(dir.path(), runner.clone()).unwrap();
        (dir, repo, runner)
    }

    #[test]
    fn test_from_directory_requires_git_marker() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitRepository::from_directory(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a git repository"));
        assert!(GitRepository::from_directory(dir.path().join("missing")).is_err());
    }

    #[tokio::test]
    async fn test_current_commit_hash() {
        let (_dir, repo, _) = repo_with(
            MockRunner::new().on("rev-parse HEAD", "0123456789abcdef0123456789abcdef01234567"),
        );
        let hash = repo.current_commit_hash().await.unwrap();
        assert_eq!(hash.to_short_string(), "0123456");
    }

    #[tokio::test]
    async fn test_current_commit_hash_rejects_garbage() {
        let (_dir, repo, _) = repo_with(MockRunner::new().on("rev-parse HEAD", "fatal-ish"));
        assert!(matches!(
            repo.current_commit_hash().await,
            Err(DistPublishError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_tags_empty_and_has_tag() {
        let (_dir, repo, _) = repo_with(MockRunner::new().on("tag --list", ""));
        assert!(repo.tags().await.unwrap().is_empty());

        let (_dir, repo, _) = repo_with(MockRunner::new().on("tag --list", "v1.0.0\nv1.1.0"));
        assert!(repo.has_tag("v1.1.0").await.unwrap());
        assert!(!repo.has_tag("v2.0.0").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_tag_arguments() {
        let (_dir, repo, runner) = repo_with(
            MockRunner::new()
                .on("tag -a v1.0.0 -m hello --force", "")
                .on("tag -a v1.0.0 -m ", ""),
        );
        repo.create_tag("v1.0.0", Some("hello"), true).await.unwrap();
        repo.create_tag("v1.0.0", None, false).await.unwrap();
        let calls = runner.calls();
        assert_eq!(calls[0].args, vec!["tag", "-a", "v1.0.0", "-m", "hello", "--force"]);
        assert_eq!(calls[1].args, vec!["tag", "-a", "v1.0.0", "-m", ""]);
    }

    #[tokio::test]
    async fn test_delete_missing_tag_is_a_no_op() {
        let (_dir, repo, _) = repo_with(MockRunner::new().on_failure(
            "tag -d v9.9.9",
            1,
            "error: tag 'v9.9.9' not found.",
        ));
        assert_eq!(repo.delete_tag("v9.9.9").await.unwrap(), TagDeletion::NotFound);
        assert_eq!(repo.delete_tag("v9.9.9").await.unwrap(), TagDeletion::NotFound);
    }

    #[tokio::test]
    async fn test_delete_tag_other_failure_propagates() {
        let (_dir, repo, _) = repo_with(MockRunner::new().on_failure(
            "tag -d v1",
            128,
            "fatal: not a git repository",
        ));
        let err = repo.delete_tag("v1").await.unwrap_err();
        assert!(matches!(err, DistPublishError::Process { code: 128, .. }));
    }

    #[tokio::test]
    async fn test_push_tag_arguments() {
        let (_dir, repo, runner) =
            repo_with(MockRunner::new().on("push --force origin refs/tags/v1.0.0", ""));
        repo.push_tag("v1.0.0", "origin", true).await.unwrap();
        assert_eq!(
            runner.calls()[0].args,
            vec!["push", "--force", "origin", "refs/tags/v1.0.0"]
        );
    }

    #[tokio::test]
    async fn test_push_tags_reports_each_outcome() {
        let (_dir, repo, _) = repo_with(
            MockRunner::new()
                .on("push origin refs/tags/v1", "")
                .on_failure("push origin refs/tags/latest", 1, "rejected"),
        );
        let mut results = repo
            .push_tags(&["v1".to_string(), "latest".to_string()], "origin", false)
            .await;
        results.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(results[0].0, "latest");
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, "v1");
        assert!(results[1].1.is_ok());
    }

    #[tokio::test]
    async fn test_branch_cache_and_invalidation() {
        let (_dir, mut repo, runner) = repo_with(
            MockRunner::new().on("branch --all --no-color", "* main\n  remotes/origin/main"),
        );
        assert_eq!(repo.get_branches(false).await.unwrap().len(), 2);
        assert_eq!(repo.get_branches(false).await.unwrap().len(), 2);
        assert_eq!(runner.calls().len(), 1);

        repo.get_branches(true).await.unwrap();
        assert_eq!(runner.calls().len(), 2);

        repo.invalidate_branches();
        repo.get_branches(false).await.unwrap();
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_current_branch_detached() {
        let (_dir, repo, _) = repo_with(MockRunner::new().on("rev-parse --abbrev-ref HEAD", "HEAD"));
        assert!(repo.get_current_branch().await.unwrap().is_none());

        let (_dir, repo, _) = repo_with(MockRunner::new().on("rev-parse --abbrev-ref HEAD", "main"));
        let branch = repo.get_current_branch().await.unwrap().unwrap();
        assert_eq!(branch.name(), "main");
        assert!(!branch.is_remote());
    }

    #[tokio::test]
    async fn test_checkout_existing_branch_suppresses_create() {
        let (dir, mut repo, runner) = repo_with(
            MockRunner::new()
                .on("branch --all --no-color", "* main\n  develop")
                .on("checkout develop", "")
                .on("checkout -b fresh", ""),
        );
        let develop = Branch::trusted(dir.path(), "develop".to_string(), None);
        repo.checkout_branch(&develop, true).await.unwrap();
        let fresh = Branch::trusted(dir.path(), "fresh".to_string(), None);
        repo.checkout_branch(&fresh, true).await.unwrap();

        let args: Vec<String> = runner.calls().iter().map(|c| c.args.join(" ")).collect();
        assert!(args.contains(&"checkout develop".to_string()));
        assert!(args.contains(&"checkout -b fresh".to_string()));
    }

    #[tokio::test]
    async fn test_commit_deltas_independent_of_completion_order() {
        let runner = MockRunner::new()
            .on("rev-parse --abbrev-ref HEAD", "main")
            .on_delayed("rev-list --count origin/main..HEAD", "3", Duration::from_millis(50))
            .on("rev-list --count HEAD..origin/main", "0");
        let (_dir, repo, _) = repo_with(runner);
        let delta = repo.get_commit_deltas("origin").await.unwrap();
        assert_eq!(delta, CommitDelta { ahead: 3, behind: 0 });

        let runner = MockRunner::new()
            .on("rev-parse --abbrev-ref HEAD", "main")
            .on("rev-list --count origin/main..HEAD", "3")
            .on_delayed("rev-list --count HEAD..origin/main", "0", Duration::from_millis(50));
        let (_dir, repo, _) = repo_with(runner);
        let delta = repo.get_commit_deltas("origin").await.unwrap();
        assert_eq!(delta, CommitDelta { ahead: 3, behind: 0 });
    }

    #[tokio::test]
    async fn test_commit_deltas_unpushed_branch_is_precondition() {
        let stderr = "fatal: ambiguous argument 'origin/topic..HEAD': unknown revision or path not in the working tree.";
        let runner = MockRunner::new()
            .on("rev-parse --abbrev-ref HEAD", "topic")
            .on_failure("rev-list --count origin/topic..HEAD", 128, stderr)
            .on_failure("rev-list --count HEAD..origin/topic", 128, stderr);
        let (_dir, repo, _) = repo_with(runner);
        let err = repo.get_commit_deltas("origin").await.unwrap_err();
        assert!(matches!(err, DistPublishError::Precondition(_)));
        assert!(err.to_string().contains("branch 'topic' has no counterpart on origin"));
    }

    #[tokio::test]
    async fn test_commit_deltas_fail_when_detached() {
        let (_dir, repo, _) = repo_with(MockRunner::new().on("rev-parse --abbrev-ref HEAD", "HEAD"));
        assert!(matches!(
            repo.get_commit_deltas("origin").await,
            Err(DistPublishError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn test_get_log_is_oldest_first_and_cached() {
        let log = "commit 2222222222222222222222222222222222222222
Author: B <b@example.com>
Date:   2026-10-19T10:00:00+00:00

    second

commit 1111111111111111111111111111111111111111
Author: A <a@example.com>
Date:   2026-10-18T10:00:00+00:00

    first";
        let (_dir, mut repo, runner) = repo_with(MockRunner::new().on(
            "log --no-color --no-decorate --no-show-signature --format=medium --date=iso-strict",
            log,
        ));
        let messages: Vec<String> = repo
            .get_log(false)
            .await
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        repo.get_log(false).await.unwrap();
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_file_listings() {
        let (dir, repo, _) = repo_with(
            MockRunner::new()
                .on("ls-files -z --modified", "")
                .on("ls-files -z --others --exclude-standard", "new.txt\0")
                .on("ls-files -z", "a.txt\0src/b.rs\0"),
        );
        assert!(repo.modified_files().await.unwrap().is_empty());
        let untracked = repo.untracked_files().await.unwrap();
        assert_eq!(untracked, vec![FsEntry::File(dir.path().join("new.txt"))]);
        let files = repo.files().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].path(), dir.path().join("src/b.rs"));
    }

    #[tokio::test]
    async fn test_name_prefers_remote_then_package_then_directory() {
        let (_dir, repo, _) = repo_with(
            MockRunner::new().on("remote -v", "origin\tgit@example.com:acme/widget-dist.git (fetch)"),
        );
        assert_eq!(repo.name().await.unwrap(), "widget-dist");

        let (dir, repo, _) = repo_with(MockRunner::new().on("remote -v", ""));
        std::fs::write(dir.path().join("package.json"), r#"{ "name": "from-package" }"#).unwrap();
        assert_eq!(repo.name().await.unwrap(), "from-package");

        let (dir, repo, _) = repo_with(MockRunner::new().on("remote -v", ""));
        let expected = dir.path().file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(repo.name().await.unwrap(), expected);
    }
}
