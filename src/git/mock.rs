use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DistPublishError, Result};
use crate::process::{CommandRunner, Invocation};

#[derive(Debug, Clone)]
enum Scripted {
    Success(String),
    Failure { code: i32, stderr: String },
}

#[derive(Debug, Clone)]
struct Rule {
    args: String,
    response: Scripted,
    delay: Option<Duration>,
}

/// Scripted runner for testing without a git executable.
///
/// Responses are matched on the space-joined arguments, ignoring leading
/// `-c key=value` overrides. The first matching rule wins; an invocation with
/// no rule fails with exit code 127. Every invocation is recorded.
#[derive(Debug, Default)]
pub struct MockRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a runner with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with `stdout` when the arguments equal `args`
    pub fn on(self, args: &str, stdout: &str) -> Self {
        self.rule(args, Scripted::Success(stdout.to_string()), None)
    }

    /// Like [`on`](Self::on) but resolve only after `delay`
    pub fn on_delayed(self, args: &str, stdout: &str, delay: Duration) -> Self {
        self.rule(args, Scripted::Success(stdout.to_string()), Some(delay))
    }

    /// Fail with `code` and `stderr` when the arguments equal `args`
    pub fn on_failure(self, args: &str, code: i32, stderr: &str) -> Self {
        self.rule(
            args,
            Scripted::Failure {
                code,
                stderr: stderr.to_string(),
            },
            None,
        )
    }

    fn rule(mut self, args: &str, response: Scripted, delay: Option<Duration>) -> Self {
        self.rules.push(Rule {
            args: args.to_string(),
            response,
            delay,
        });
        self
    }

    /// Invocations received so far, in call order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

fn significant_args(args: &[String]) -> String {
    let mut rest = args;
    while rest.len() >= 2 && rest[0] == "-c" {
        rest = &rest[2..];
    }
    rest.join(" ")
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run_raw(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(invocation.clone());

        let key = significant_args(&invocation.args);
        let Some(rule) = self.rules.iter().find(|r| r.args == key).cloned() else {
            return Err(DistPublishError::Process {
                command: invocation.command_line(),
                code: 127,
                stderr: format!("no scripted response for `{}`", key),
            });
        };

        if let Some(delay) = rule.delay {
            tokio::time::sleep(delay).await;
        }

        match rule.response {
            Scripted::Success(stdout) => Ok(stdout.into_bytes()),
            Scripted::Failure { code, stderr } => Err(DistPublishError::Process {
                command: invocation.command_line(),
                code,
                stderr,
            }),
        }
    }
}
