//! OpenAirInterface gNB/nrUE with the E2 agent and bundled FlexRIC.

use super::{banner, flag, gcc13_block, install_dir_block, Script, ScriptBlock};
use crate::config::{Configuration, OaiE2Options};

/// gNB config file the E2 agent block is appended to, relative to the
/// FlexRIC build directory.
const GNB_CONF_PATH: &str =
    "../../../targets/PROJECTS/GENERIC-NR-5GC/CONF/gnb.sa.band78.fr1.106PRB.usrpb210.conf";

pub(super) fn compose(config: &Configuration, opts: &OaiE2Options) -> Script {
    Script::with_preamble()
        .block(banner(
            "OAI E2 Agent",
            &[
                ("RIC IP", config.ric_ip.clone()),
                ("RIC Port", config.ric_port.clone()),
                ("Build gNB", flag(opts.build_gnb).to_string()),
                ("Build nrUE", flag(opts.build_nrue).to_string()),
                ("Use RF Simulator", flag(opts.use_rfsim).to_string()),
            ],
        ))
        .block(install_dir_block(config))
        .block(
            ScriptBlock::titled("Install dependencies")
                .line("echo \"📦 Installing dependencies...\"")
                .line("sudo apt update && sudo apt install -y \\")
                .line("  git build-essential cmake-curses-gui libsctp-dev libpcre2-dev \\")
                .line("  gcc-13 g++-13 cpp-13 unzip python3.10-dev net-tools ninja-build"),
        )
        .block(gcc13_block())
        .block(
            ScriptBlock::titled("Clone OAI repository")
                .line("echo \"📥 Cloning OAI repository...\"")
                .line("git clone https://gitlab.eurecom.fr/oai/openairinterface5g.git")
                .line("cd openairinterface5g"),
        )
        .block(
            ScriptBlock::titled("Initialize FlexRIC submodule")
                .line("echo \"📁 Initializing FlexRIC submodule...\"")
                .line("cd openair2/E2AP/flexric")
                .line("git submodule init && git submodule update")
                .line("cd ../../../"),
        )
        .block(build_oai_block(opts))
        .block(
            ScriptBlock::titled("Build FlexRIC")
                .line("echo \"🏗️ Building FlexRIC...\"")
                .line("cd openair2/E2AP/flexric")
                .line("mkdir -p build && cd build")
                .line("cmake -GNinja -DCMAKE_BUILD_TYPE=Release -DE2AP_VERSION=E2AP_V2 -DKMP_VERSION=KMP_V2_03 ..")
                .line("ninja")
                .line("sudo make install"),
        )
        .block(e2_agent_block(config))
        .block_if(opts.use_rfsim, || {
            ScriptBlock::new()
                .line("echo \"📡 RF simulator selected: start the gNB and nrUE with --rfsim\"")
        })
        .block(
            ScriptBlock::new()
                .line("echo \"✅ OAI E2 Agent deployment completed successfully!\"")
                .line(format!(
                    "echo \"E2 Agent configured to connect to RIC at {}\"",
                    config.ric_endpoint()
                )),
        )
}

/// `build_oai` invocation; `--gNB` and `--nrUE` are independent.
fn build_oai_block(opts: &OaiE2Options) -> ScriptBlock {
    let mut args = vec!["./build_oai"];
    if opts.build_gnb {
        args.push("--gNB");
    }
    if opts.build_nrue {
        args.push("--nrUE");
    }
    args.extend([
        "--build-e2",
        "--cmake-opt",
        "-DE2AP_VERSION=E2AP_V2",
        "--cmake-opt",
        "-DKMP_VERSION=KMP_V2_03",
        "--ninja",
    ]);

    ScriptBlock::titled("Build OAI with E2 Agent")
        .line("echo \"🛠️ Building OAI with E2 Agent...\"")
        .line("cd cmake_targets")
        .line("./build_oai -I")
        .line(args.join(" "))
        .line("cd ../")
}

fn e2_agent_block(config: &Configuration) -> ScriptBlock {
    ScriptBlock::titled("Configure E2 Agent")
        .line("echo \"⚙️ Configuring E2 Agent...\"")
        .line(format!("CONF_PATH=\"{}\"", GNB_CONF_PATH))
        .line("E2_AGENT_BLOCK=\"e2_agent = {")
        .line(format!("  near_ric_ip_addr = \\\"{}\\\";", config.ric_ip))
        .line("  sm_dir = \\\"/usr/local/lib/flexric/\\\"")
        .line("}\"")
        .line("")
        .line("if ! grep -q \"e2_agent\" \"$CONF_PATH\"; then")
        .line("    echo -e \"\\n$E2_AGENT_BLOCK\" | sudo tee -a \"$CONF_PATH\" > /dev/null")
        .line("fi")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentOptions;
    use crate::template::fixtures;

    fn opts(build_gnb: bool, build_nrue: bool) -> OaiE2Options {
        OaiE2Options {
            build_gnb,
            build_nrue,
            use_rfsim: false,
        }
    }

    #[test]
    fn test_gnb_flag_follows_build_gnb() {
        assert!(build_oai_block(&opts(true, false)).contains("--gNB"));
        assert!(!build_oai_block(&opts(false, true)).contains("--gNB"));
    }

    #[test]
    fn test_nrue_flag_independent_of_gnb() {
        let block = build_oai_block(&opts(false, true));
        assert!(block.contains("./build_oai --nrUE --build-e2"));

        let block = build_oai_block(&opts(false, false));
        assert!(block.contains("./build_oai --build-e2 --cmake-opt"));
        assert!(!block.contains("--nrUE"));
    }

    #[test]
    fn test_full_script_without_gnb() {
        let o = opts(false, true);
        let config = fixtures::config(DeploymentOptions::OaiE2Agent(o.clone()));
        let text = compose(&config, &o).render();
        assert!(!text.contains("--gNB"));
        assert!(text.contains("echo \"  Build gNB: false\""));
        assert!(!text.contains("--rfsim"));
    }

    #[test]
    fn test_e2_agent_block_quotes_ric_ip() {
        let config = fixtures::config(DeploymentOptions::OaiE2Agent(OaiE2Options::default()));
        let block = e2_agent_block(&config);
        assert!(block.contains("  near_ric_ip_addr = \\\"10.10.0.5\\\";"));
    }

    #[test]
    fn test_rfsim_hint() {
        let o = OaiE2Options::default();
        let config = fixtures::config(DeploymentOptions::OaiE2Agent(o.clone()));
        assert!(compose(&config, &o).render().contains("--rfsim"));
    }
}
