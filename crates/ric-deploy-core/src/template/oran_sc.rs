//! ORAN SC near-RT RIC (srsRAN `oran-sc-ric` compose stack).

use super::{banner, flag, install_dir_block, Script, ScriptBlock};
use crate::config::{Configuration, OranScOptions};

pub(super) fn compose(config: &Configuration, opts: &OranScOptions) -> Script {
    Script::with_preamble()
        .block(banner(
            "ORAN SC RIC",
            &[
                ("RIC IP", config.ric_ip.clone()),
                ("RIC Port", config.ric_port.clone()),
                ("gNB IP", config.gnb_ip.clone()),
                ("gNB Port", config.gnb_port.clone()),
                ("Core IP", config.core_ip.clone()),
                ("Install Dir", config.install_dir.display().to_string()),
            ],
        ))
        .block(install_dir_block(config))
        .block(
            ScriptBlock::titled("Install dependencies")
                .line("echo \"📦 Installing dependencies...\"")
                .line("sudo apt-get update")
                .line("sudo apt-get install -y git docker.io docker-compose")
                .line("sudo apt-get install -y cmake build-essential libboost-all-dev libmbedtls-dev libsctp-dev libfftw3-dev libzmq3-dev"),
        )
        .block(
            ScriptBlock::titled("Add user to docker group")
                .line("sudo usermod -aG docker $USER"),
        )
        .block(
            ScriptBlock::titled("Clone ORAN SC RIC repository")
                .line("echo \"📥 Cloning ORAN SC RIC repository...\"")
                .line("if [ ! -d \"oran-sc-ric\" ]; then")
                .line("    git clone https://github.com/srsran/oran-sc-ric.git")
                .line("fi"),
        )
        .block(ScriptBlock::new().line("cd oran-sc-ric"))
        .block(e2_config_block(config, opts))
        .block(startup_block(opts))
        .block(
            ScriptBlock::titled("Wait for services to be ready")
                .line("sleep 10"),
        )
        .block(
            ScriptBlock::titled("Verify deployment")
                .line("echo \"✅ Verifying deployment...\"")
                .line("docker ps | grep ric || echo \"RIC containers running\""),
        )
        .block(
            ScriptBlock::new()
                .line("echo \"🎉 ORAN SC RIC deployment completed successfully!\"")
                .line(format!(
                    "echo \"RIC is available at {}\"",
                    config.ric_endpoint()
                )),
        )
}

fn e2_config_block(config: &Configuration, opts: &OranScOptions) -> ScriptBlock {
    ScriptBlock::titled("Configure E2 interface")
        .line("echo \"⚙️ Configuring E2 interface...\"")
        .line("cat > e2-config.yaml << EOF")
        .line("e2_interface:")
        .line(format!("  ric_ip: {}", config.ric_ip))
        .line(format!("  ric_port: {}", config.ric_port))
        .line(format!("  gnb_ip: {}", config.gnb_ip))
        .line(format!("  gnb_port: {}", config.gnb_port))
        .line(format!("  plmn_id: {}", config.plmn_id()))
        .line("  service_models:")
        .line(format!("    kpm: {}", flag(opts.service_models.kpm)))
        .line(format!("    rc: {}", flag(opts.service_models.rc)))
        .line("EOF")
}

fn startup_block(opts: &OranScOptions) -> ScriptBlock {
    ScriptBlock::titled("Start RIC services")
        .line("echo \"🚀 Starting RIC services...\"")
        .line_if(opts.use_docker, "docker compose up --build -d")
        .line_if(!opts.use_docker, "make run")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeploymentOptions, ServiceModels, PLMN_ID_KEY};
    use crate::template::fixtures;

    fn options(use_docker: bool, kpm: bool, rc: bool) -> OranScOptions {
        OranScOptions {
            use_docker,
            service_models: ServiceModels { kpm, rc },
        }
    }

    #[test]
    fn test_docker_startup_selected_by_use_docker() {
        let docker = startup_block(&options(true, true, true));
        assert!(docker.contains("docker compose up --build -d"));
        assert!(!docker.contains("make run"));

        let make = startup_block(&options(false, true, true));
        assert!(make.contains("make run"));
        assert!(!make.contains("docker compose"));
    }

    #[test]
    fn test_verify_block_present_for_both_startups() {
        for use_docker in [true, false] {
            let opts = options(use_docker, true, true);
            let config = fixtures::config(DeploymentOptions::OranSc(opts.clone()));
            let text = compose(&config, &opts).render();
            assert!(text.contains("docker ps | grep ric"), "use_docker={use_docker}");
        }
    }

    #[test]
    fn test_service_models_written_from_options() {
        let config = fixtures::config(DeploymentOptions::OranSc(options(true, false, true)));
        let block = e2_config_block(&config, &options(true, false, true));
        assert!(block.contains("    kpm: false"));
        assert!(block.contains("    rc: true"));
    }

    #[test]
    fn test_e2_config_carries_endpoints_and_plmn() {
        let mut config = fixtures::config(DeploymentOptions::OranSc(OranScOptions::default()));
        config
            .e2_interface_config
            .insert(PLMN_ID_KEY.to_string(), "99970".to_string());
        let block = e2_config_block(&config, &OranScOptions::default());
        assert!(block.contains("  ric_ip: 10.10.0.5"));
        assert!(block.contains("  gnb_port: 36422"));
        assert!(block.contains("  plmn_id: 99970"));
        assert_eq!(block.lines().last().map(String::as_str), Some("EOF"));
    }
}
