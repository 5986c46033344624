//! Fixtures that build real git repositories in temporary directories

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Fixed identity and locale for every git process, the library's included
pub fn set_git_env() {
    std::env::set_var("GIT_AUTHOR_NAME", "Test User");
    std::env::set_var("GIT_AUTHOR_EMAIL", "test@example.com");
    std::env::set_var("GIT_COMMITTER_NAME", "Test User");
    std::env::set_var("GIT_COMMITTER_EMAIL", "test@example.com");
    std::env::set_var("GIT_CONFIG_NOSYSTEM", "1");
    std::env::set_var("GIT_CONFIG_GLOBAL", "/dev/null");
    std::env::set_var("LC_ALL", "C");
}

/// Run git in `dir` and return trimmed stdout, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A development repository with a bare `origin` and a bare distribution
/// repository sharing its history
pub struct Fixture {
    pub root: TempDir,
    pub origin: PathBuf,
    pub dev: PathBuf,
    pub dist: PathBuf,
}

impl Fixture {
    pub fn new(version: &str) -> Self {
        set_git_env();
        let root = TempDir::new().unwrap();
        let origin = root.path().join("origin.git");
        let dev = root.path().join("dev");
        let dist = root.path().join("dist.git");

        git(root.path(), &["init", "--bare", "origin.git"]);
        git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(root.path(), &["clone", "origin.git", "dev"]);
        git(&dev, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        write(
            &dev.join("package.json"),
            &format!(
                r#"{{
  "name": "widget",
  "version": "{}",
  "description": "test package",
  "repository": {{
    "type": "git",
    "url": "https://example.com/acme/widget.git"
  }},
  "files": ["lib"]
}}
"#,
                version
            ),
        );
        write(&dev.join("README.md"), "# widget\n");
        write(&dev.join("lib/index.js"), "module.exports = 42;\n");
        write(&dev.join("src/index.ts"), "export default 42;\n");
        git(&dev, &["add", "--all"]);
        git(&dev, &["commit", "-m", "Initial commit"]);
        git(&dev, &["push", "origin", "main"]);

        git(root.path(), &["clone", "--bare", "origin.git", "dist.git"]);

        Fixture {
            root,
            origin,
            dev,
            dist,
        }
    }

    pub fn clone_root(&self) -> PathBuf {
        self.root.path().join("clones")
    }

    pub fn head(&self) -> String {
        git(&self.dev, &["rev-parse", "HEAD"])
    }
}
