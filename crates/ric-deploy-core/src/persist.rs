//! Configuration document and script artifact on disk.

use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::error::{DeployError, Result};
use crate::obs;

/// File name of the saved configuration inside `config_dir`.
pub const CONFIG_FILE_NAME: &str = "ric_deployment_config.json";

/// File name of the generated script inside `install_dir`.
pub const SCRIPT_FILE_NAME: &str = "deploy_configured_ric.sh";

/// Write `config` to `<directory>/ric_deployment_config.json`, replacing any
/// existing file.
///
/// Failures are recoverable: the caller may continue without a saved
/// configuration.
pub fn save(config: &Configuration, directory: &Path) -> Result<PathBuf> {
    let path = directory.join(CONFIG_FILE_NAME);
    let fail = |reason: String| DeployError::Serialization {
        path: path.clone(),
        reason,
    };

    let mut json = serde_json::to_string_pretty(config).map_err(|e| fail(e.to_string()))?;
    json.push('\n');
    std::fs::write(&path, json).map_err(|e| fail(e.to_string()))?;

    obs::emit_config_saved(&path);
    Ok(path)
}

/// Read a configuration document written by [`save`].
pub fn load(path: &Path) -> Result<Configuration> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| DeployError::InvalidDocument(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| DeployError::InvalidDocument(format!("{}: {}", path.display(), e)))
}

/// [`load`] from `<directory>/ric_deployment_config.json`.
pub fn load_from_dir(directory: &Path) -> Result<Configuration> {
    load(&directory.join(CONFIG_FILE_NAME))
}

/// Path the deployment script is written to for `config`.
pub fn script_path(config: &Configuration) -> PathBuf {
    config.install_dir.join(SCRIPT_FILE_NAME)
}

/// Write rendered script text to `<install_dir>/deploy_configured_ric.sh`
/// with mode 0755.
pub fn write_script(config: &Configuration, script: &str) -> Result<PathBuf> {
    let path = script_path(config);
    write_script_to(&path, script)?;
    Ok(path)
}

/// Write rendered script text to an explicit path with mode 0755.
pub fn write_script_to(path: &Path, script: &str) -> Result<()> {
    let fail = |source: std::io::Error| DeployError::ScriptWrite {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(path, script).map_err(fail)?;
    make_executable(path).map_err(fail)?;

    obs::emit_script_written(path, script.len());
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
