//! Structured lifecycle events for a deployment.
//!
//! Each function emits one `tracing` event tagged with an `event` field so
//! log pipelines can filter on it, e.g. `event=execution.finished`.

use std::path::Path;

use tracing::{info, warn};

use crate::config::RicType;

/// Span covering a single script execution.
pub fn execution_span(script: &Path) -> tracing::Span {
    tracing::info_span!("ric.execute", script = %script.display())
}

/// Emit event: script rendered.
pub fn emit_script_rendered(ric_type: RicType, digest: &str, bytes: usize) {
    let short: String = digest.chars().take(12).collect();
    info!(
        event = "script.rendered",
        ric_type = %ric_type,
        digest = %short,
        bytes = bytes,
    );
}

/// Emit event: configuration document written.
pub fn emit_config_saved(path: &Path) {
    info!(event = "config.saved", path = %path.display());
}

/// Emit event: deployment script written.
pub fn emit_script_written(path: &Path, bytes: usize) {
    info!(event = "script.written", path = %path.display(), bytes = bytes);
}

pub fn emit_execution_started(script: &Path, shell: &Path) {
    info!(
        event = "execution.started",
        script = %script.display(),
        shell = %shell.display(),
    );
}

/// Emit event: child process exited.
pub fn emit_execution_finished(exit_code: i32, succeeded: bool, lines: u64, duration_ms: u64) {
    info!(
        event = "execution.finished",
        exit_code = exit_code,
        succeeded = succeeded,
        lines = lines,
        duration_ms = duration_ms,
    );
}

/// Emit event: operator interrupted while output was streaming (warning level).
pub fn emit_execution_interrupted(script: &Path, lines: u64) {
    warn!(event = "execution.interrupted", script = %script.display(), lines = lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_digest_does_not_panic() {
        emit_script_rendered(RicType::Custom, "abc", 10);
        emit_script_rendered(RicType::OranSc, &"f".repeat(64), 10);
    }

    #[test]
    fn test_execution_span_create() {
        let _span = execution_span(Path::new("/tmp/deploy_configured_ric.sh")).entered();
    }
}
