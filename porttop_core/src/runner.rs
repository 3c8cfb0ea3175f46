//! Shell utility invocation. Everything the pipeline learns about the host goes through
//! [`CommandRunner`], so tests can script the outputs.

use std::{future::Future, process::Stdio, time::Duration};

use tokio::{process::Command, time::timeout};
use tracing::debug;

use crate::error::CommandError;

/// Captured result of one utility run. Non-zero exits are data, not errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<CommandOutput, CommandError>> + Send;
}

/// Runs real processes, each bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            // a timed-out child must not outlive the dropped future
            .kill_on_drop(true);

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(res) => res.map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(CommandError::TimedOut {
                    program: program.to_string(),
                    after: self.timeout,
                })
            }
        };
        debug!(program, ?args, code = ?output.status.code(), "command finished");

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
