//! External process execution.
//!
//! Every git call (and the optional packaging command) goes through a
//! [`CommandRunner`]. The real implementation, [`SystemRunner`], spawns the
//! program with `tokio::process`, collects stdout and stderr as raw bytes and
//! only resolves once both streams have closed and the exit status is known.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::error::{DistPublishError, Result};

/// A single program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    /// Human-readable label used only for progress logging
    pub description: Option<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            dir: dir.as_ref().to_path_buf(),
            description: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The command line as shown in errors and logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external programs.
///
/// Implementations make exactly one attempt per call. On exit code 0 they
/// return the trimmed standard output; otherwise a
/// [`DistPublishError::Process`] carrying the exit code and standard error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<String>;

    async fn run_raw(&self, invocation: &Invocation) -> Result<Vec<u8>>;
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run_raw(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        let command_line = invocation.command_line();
        if let Some(description) = &invocation.description {
            tracing::info!(command = %command_line, "{}...", description);
        } else {
            tracing::debug!(command = %command_line, dir = %invocation.dir.display(), "running");
        }

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DistPublishError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DistPublishError::resource("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DistPublishError::resource("child stderr was not captured"))?;

        // The exit event alone is not enough: wait for both pipes to close too.
        let (stdout, stderr, status) =
            tokio::try_join!(collect(stdout), collect(stderr), child.wait())?;

        if status.success() {
            if let Some(description) = &invocation.description {
                tracing::info!(command = %command_line, "{} succeeded", description);
            }
            Ok(stdout)
        } else {
            let code = status.code().unwrap_or(-1);
            if let Some(description) = &invocation.description {
                tracing::warn!(command = %command_line, code, "{} failed", description);
            }
            Err(DistPublishError::Process {
                command: command_line,
                code,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            })
        }
    }
}

async fn collect_lines<R>(reader: R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut collected = Vec::new();
    while let Some(line) = lines.next_line().await? {
        collected.push(line);
    }
    Ok(collected.join("\n"))
}
