//! Custom RIC: echoes the configuration, runs nothing implementation specific.

use super::{banner, install_dir_block, Script, ScriptBlock};
use crate::config::Configuration;
use crate::persist::CONFIG_FILE_NAME;

pub(super) fn compose(config: &Configuration) -> Script {
    Script::with_preamble()
        .block(banner(
            "Custom RIC",
            &[
                ("RIC IP", config.ric_ip.clone()),
                ("RIC Port", config.ric_port.clone()),
                ("gNB IP", config.gnb_ip.clone()),
                ("Core IP", config.core_ip.clone()),
                ("Install Dir", config.install_dir.display().to_string()),
            ],
        ))
        .block(install_dir_block(config))
        .block(
            ScriptBlock::new()
                .line("echo \"⚙️ Custom RIC deployment script generated.\"")
                .line("echo \"Please customize this script according to your specific RIC implementation.\"")
                .line(format!(
                    "echo \"Configuration has been saved to {}\"",
                    config.config_dir.join(CONFIG_FILE_NAME).display()
                )),
        )
        .block(
            ScriptBlock::new()
                .line("echo \"✅ Custom RIC deployment script ready for customization!\"")
                .line(format!("echo \"RIC endpoint: {}\"", config.ric_endpoint())),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomOptions, DeploymentOptions};
    use crate::template::fixtures;

    #[test]
    fn test_custom_script_mentions_paths() {
        let config = fixtures::config(DeploymentOptions::Custom(CustomOptions::default()));
        let text = compose(&config).render();
        assert!(text.contains("Custom RIC Deployment"));
        assert!(text.contains("mkdir -p /opt/ric-deployment"));
        assert!(text.contains("/opt/ric-deployment/configs/ric_deployment_config.json"));
    }

    #[test]
    fn test_custom_script_has_no_install_steps() {
        let config = fixtures::config(DeploymentOptions::Custom(CustomOptions::default()));
        let text = compose(&config).render();
        assert!(!text.contains("apt"));
        assert!(!text.contains("git clone"));
    }
}
