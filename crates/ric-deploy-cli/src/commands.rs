//! Non-interactive subcommands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ric_deploy_core::{
    load, obs, render, script_digest, validate_ip, validate_port, write_script_to, DeployError,
    Supervisor,
};
use tracing::{info, warn};

use crate::wizard::clamp_exit_code;

/// Which validator `validate` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ValidateKind {
    Ip,
    Port,
}

/// Destination for streamed script output.
///
/// Write failures do not stop the script; the first one is logged.
pub struct OutputSink<W> {
    out: W,
    failed: bool,
}

impl<W: Write> OutputSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            if !self.failed {
                warn!(error = %e, "script output can no longer be displayed");
                self.failed = true;
            }
        }
    }

    /// True once a write has failed.
    pub fn failed(&self) -> bool {
        self.failed
    }
}

/// Re-render the script for a saved configuration, to `output` or `out`.
///
/// Returns the sha256 digest of the script text.
pub fn cmd_render(
    config_path: &Path,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<String> {
    let config = load(config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    let text = render(&config);
    let digest = script_digest(&text);
    obs::emit_script_rendered(config.ric_type(), &digest, text.len());

    match output {
        Some(path) => {
            write_script_to(path, &text)?;
            info!(path = %path.display(), digest = %digest, "script written");
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(digest)
}

/// Run an existing script, echoing its output to `out`. Returns the process
/// exit code for the tool.
pub async fn cmd_run(supervisor: &Supervisor, script: &Path, out: &mut impl Write) -> Result<u8> {
    let mut sink = OutputSink::new(out);
    let outcome = supervisor.execute(script, |line| sink.line(line)).await;

    match outcome {
        Ok(result) => {
            if !result.succeeded {
                tracing::error!(exit_code = result.exit_code, "deployment script failed");
            }
            Ok(clamp_exit_code(result.exit_code))
        }
        Err(DeployError::Interrupted { .. }) => Ok(130),
        Err(e) => Err(e.into()),
    }
}

/// Run a single validator. True when the value is accepted.
pub fn cmd_validate(kind: ValidateKind, value: &str) -> bool {
    match kind {
        ValidateKind::Ip => validate_ip(value),
        ValidateKind::Port => validate_port(value),
    }
}
