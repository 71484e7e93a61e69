//! Shell command executor

use super::dialect::ShellDialect;
use crate::{Error, Result};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Captured result of one shell run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code, `-1` when the process had none (killed by a signal)
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock time from spawn to exit
    pub elapsed_ms: u64,
}

/// Runs commands through a dialect's shell
#[derive(Clone, Copy)]
pub struct CommandRunner {
    dialect: &'static dyn ShellDialect,
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// Runner without a timeout: a hung child blocks only its own request
    pub fn new(dialect: &'static dyn ShellDialect) -> Self {
        Self {
            dialect,
            timeout: None,
        }
    }

    /// Kill the child and fail with [`Error::CommandTimeout`] after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dialect(&self) -> &'static dyn ShellDialect {
        self.dialect
    }

    /// Run `command` to completion and capture its output
    pub async fn run(&self, command: &str) -> Result<CommandOutput> {
        let program = self.dialect.program();
        let mut child = Command::new(&program);
        child
            .args(self.dialect.args(command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let child = child.spawn().map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| Error::CommandTimeout {
                    ms: limit.as_millis() as u64,
                })??,
            None => child.wait_with_output().await?,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed_ms,
        };
        tracing::info!(
            shell = self.dialect.name(),
            exit_code = result.exit_code,
            elapsed_ms,
            "ran {:?}",
            command
        );
        Ok(result)
    }
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("dialect", &self.dialect.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::shell::dialect::Posix;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let out = CommandRunner::new(&Posix).run("echo hello").await.unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.stderr, "");
        assert_eq!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_run_captures_stderr_and_exit_code() {
        let out = CommandRunner::new(&Posix)
            .run("echo oops 1>&2; exit 3")
            .await
            .unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stderr, "oops\n");
        assert_ne!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_run_measures_time() {
        let out = CommandRunner::new(&Posix).run("sleep 0.2").await.unwrap();
        assert!(out.elapsed_ms >= 150, "{}", out.elapsed_ms);
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = CommandRunner::new(&Posix).with_timeout(Some(Duration::from_millis(100)));
        let err = runner.run("sleep 5").await.unwrap_err();
        assert!(matches!(err, Error::CommandTimeout { ms: 100 }));
    }

    #[tokio::test]
    async fn test_signal_exit_is_minus_one() {
        let out = CommandRunner::new(&Posix).run("kill -9 $$").await.unwrap();
        assert_eq!(out.exit_code, -1);
    }
}
