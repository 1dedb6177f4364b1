//! Error types for ric-deploy-core

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while collecting, rendering, persisting or running
/// a deployment.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A raw input value was rejected by a validator
    #[error("invalid value for {field}: {value:?}")]
    Validation { field: &'static str, value: String },

    /// A required field was never set on the draft
    #[error("configuration incomplete: {0} is not set")]
    MissingField(&'static str),

    /// Directory could not be created
    #[error("failed to create directory {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration document could not be written or encoded
    #[error("failed to save configuration to {path:?}: {reason}")]
    Serialization { path: PathBuf, reason: String },

    /// Configuration document could not be read back
    #[error("invalid configuration document: {0}")]
    InvalidDocument(String),

    /// Deployment script could not be written or made executable
    #[error("failed to write deployment script {path:?}: {source}")]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Script ran to completion with a nonzero exit code
    #[error("deployment script {script:?} failed with exit code {exit_code}")]
    ExecutionFailed { script: PathBuf, exit_code: i32 },

    /// Script path missing at execution time
    #[error("deployment script not found: {0:?}")]
    ScriptNotFound(PathBuf),

    /// Child process could not be spawned or read
    #[error("failed to run deployment script {script:?}: {source}")]
    Spawn {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operator interrupted execution while output was streaming
    #[error("execution of {script:?} interrupted by operator")]
    Interrupted { script: PathBuf },
}

/// Result type for ric-deploy-core operations.
pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = DeployError::Validation {
            field: "ric_port",
            value: "99999".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ric_port"));
        assert!(msg.contains("99999"));
    }

    #[test]
    fn test_execution_failed_reports_exit_code() {
        let err = DeployError::ExecutionFailed {
            script: PathBuf::from("/tmp/deploy_configured_ric.sh"),
            exit_code: 7,
        };
        assert!(err.to_string().contains("exit code 7"));
    }

    #[test]
    fn test_missing_field_display() {
        let err = DeployError::MissingField("install_dir");
        assert_eq!(
            err.to_string(),
            "configuration incomplete: install_dir is not set"
        );
    }
}
