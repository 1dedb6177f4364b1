//! Deployment script execution with live output streaming.
//!
//! The script runs under a shell as a child process with stderr merged into
//! stdout on a single pipe. Lines are delivered to the caller as they are
//! written, and [`Supervisor::execute`] returns once the shell exits, even
//! when a job it started in the background still holds the pipe. The child
//! is not killed on interrupt; the interrupt is surfaced as
//! [`DeployError::Interrupted`], distinct from a nonzero exit.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, Instrument};

use crate::error::{DeployError, Result};
use crate::obs;

/// Shell used when none is configured.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Environment variable overriding the shell.
pub const SHELL_ENV: &str = "RIC_DEPLOY_SHELL";

/// Runs `$1` under `$0` with stderr pointed at the same pipe as stdout, so
/// the two streams keep the order in which the script wrote them.
const MERGE_STDERR: &str = "exec 2>&1; exec \"$0\" \"$1\"";

/// How long output still buffered after the shell exits is read for.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Supervisor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Interpreter the script path is passed to.
    pub shell: PathBuf,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
        }
    }
}

impl SupervisorConfig {
    /// Read `RIC_DEPLOY_SHELL`, falling back to `/bin/bash`.
    pub fn from_env() -> Self {
        match std::env::var_os(SHELL_ENV) {
            Some(shell) if !shell.is_empty() => Self {
                shell: PathBuf::from(shell),
            },
            _ => Self::default(),
        }
    }
}

/// Outcome of a script that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit code; -1 when the child was terminated by a signal.
    pub exit_code: i32,

    /// Whether the exit code was zero.
    pub succeeded: bool,
}

impl ExecutionResult {
    fn from_status(status: ExitStatus) -> Self {
        let exit_code = status.code().unwrap_or(-1);
        Self {
            exit_code,
            succeeded: exit_code == 0,
        }
    }

    /// Turn a nonzero exit into [`DeployError::ExecutionFailed`].
    pub fn into_result(self, script: &Path) -> Result<Self> {
        if self.succeeded {
            Ok(self)
        } else {
            Err(DeployError::ExecutionFailed {
                script: script.to_path_buf(),
                exit_code: self.exit_code,
            })
        }
    }
}

/// Runs deployment scripts.
#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    config: SupervisorConfig,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Run `script`, forwarding each output line to `on_line`.
    ///
    /// Ctrl-C while the script runs yields [`DeployError::Interrupted`].
    pub async fn execute<F>(&self, script: &Path, on_line: F) -> Result<ExecutionResult>
    where
        F: FnMut(&str),
    {
        self.execute_until(script, on_line, ctrl_c()).await
    }

    /// Like [`Supervisor::execute`], interrupted when `interrupt` completes.
    pub async fn execute_until<F, I>(
        &self,
        script: &Path,
        on_line: F,
        interrupt: I,
    ) -> Result<ExecutionResult>
    where
        F: FnMut(&str),
        I: Future<Output = ()>,
    {
        if !script.is_file() {
            return Err(DeployError::ScriptNotFound(script.to_path_buf()));
        }
        self.run(script, on_line, interrupt)
            .instrument(obs::execution_span(script))
            .await
    }

    async fn run<F, I>(
        &self,
        script: &Path,
        mut on_line: F,
        interrupt: I,
    ) -> Result<ExecutionResult>
    where
        F: FnMut(&str),
        I: Future<Output = ()>,
    {
        let start = Instant::now();
        let io_err = |source: std::io::Error| DeployError::Spawn {
            script: script.to_path_buf(),
            source,
        };

        obs::emit_execution_started(script, &self.config.shell);
        let mut child = Command::new(&self.config.shell)
            .arg("-c")
            .arg(MERGE_STDERR)
            .arg(&self.config.shell)
            .arg(script)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(io_err)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io_err(std::io::Error::other("stdout not captured")))?;
        let mut output = BufReader::new(stdout).split(b'\n');
        let mut lines: u64 = 0;

        tokio::pin!(interrupt);

        // Background jobs of the script inherit the pipe, so end of output
        // and exit of the shell are tracked separately.
        let mut exited = None;
        loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    obs::emit_execution_interrupted(script, lines);
                    return Err(DeployError::Interrupted { script: script.to_path_buf() });
                }
                segment = output.next_segment() => match segment.map_err(io_err)? {
                    Some(bytes) => {
                        lines += 1;
                        on_line(&decode_line(&bytes));
                    }
                    None => break,
                },
                status = child.wait() => {
                    exited = Some(status.map_err(io_err)?);
                    break;
                }
            }
        }

        let status = match exited {
            Some(status) => {
                while let Ok(segment) =
                    tokio::time::timeout(DRAIN_GRACE, output.next_segment()).await
                {
                    match segment.map_err(io_err)? {
                        Some(bytes) => {
                            lines += 1;
                            on_line(&decode_line(&bytes));
                        }
                        None => break,
                    }
                }
                status
            }
            None => {
                debug!(lines, "output closed");
                tokio::select! {
                    status = child.wait() => status.map_err(io_err)?,
                    _ = &mut interrupt => {
                        obs::emit_execution_interrupted(script, lines);
                        return Err(DeployError::Interrupted { script: script.to_path_buf() });
                    }
                }
            }
        };

        let result = ExecutionResult::from_status(status);
        obs::emit_execution_finished(
            result.exit_code,
            result.succeeded,
            lines,
            start.elapsed().as_millis() as u64,
        );
        Ok(result)
    }
}

/// Completes on the first Ctrl-C; never completes if the handler cannot be
/// installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
