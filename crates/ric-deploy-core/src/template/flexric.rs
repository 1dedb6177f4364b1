//! FlexRIC nearRT-RIC built from source.

use super::{banner, gcc13_block, install_dir_block, Script, ScriptBlock};
use crate::config::{Configuration, FlexRicOptions};

pub(super) fn compose(config: &Configuration, opts: &FlexRicOptions) -> Script {
    let install_dir = config.install_dir.display();

    Script::with_preamble()
        .block(banner(
            "FlexRIC",
            &[
                ("RIC IP", config.ric_ip.clone()),
                ("RIC Port", config.ric_port.clone()),
                ("E2AP Version", opts.e2ap_version.clone()),
                ("KMP Version", opts.kmp_version.clone()),
            ],
        ))
        .block(install_dir_block(config))
        .block(
            ScriptBlock::titled("Install dependencies")
                .line("echo \"📦 Installing dependencies...\"")
                .line("sudo apt update")
                .line("sudo apt install -y build-essential git cmake-curses-gui libsctp-dev libpcre2-dev unzip \\")
                .line("  gcc-13 g++-13 cpp-13 python3.10-dev autoconf automake libtool bison flex"),
        )
        .block(gcc13_block())
        .block(
            ScriptBlock::titled("Install ASN1C")
                .line("echo \"🔧 Installing ASN1C...\"")
                .line("cd ~")
                .line("rm -rf asn1c")
                .line("git clone https://github.com/mouse07410/asn1c.git")
                .line("cd asn1c")
                .line("git checkout aper")
                .line("autoreconf -fiv")
                .line("./configure")
                .line("make -j$(nproc)")
                .line("sudo make install"),
        )
        .block(
            ScriptBlock::titled("Clone and build FlexRIC")
                .line("echo \"📥 Cloning FlexRIC...\"")
                .line(format!("cd {}", install_dir))
                .line("git clone https://gitlab.eurecom.fr/mosaic5g/flexric.git")
                .line("cd flexric"),
        )
        .block(build_block(opts))
        .block(
            ScriptBlock::titled("Create service models directory")
                .line("sudo mkdir -p /usr/local/lib/flexric/"),
        )
        .block(conf_block(config))
        .block(
            ScriptBlock::titled("Start FlexRIC nearRT-RIC")
                .line("echo \"🚀 Starting FlexRIC nearRT-RIC...\"")
                .line("./examples/ric/nearRT-RIC &"),
        )
        .block(
            ScriptBlock::new()
                .line("echo \"✅ FlexRIC deployment completed successfully!\"")
                .line(format!(
                    "echo \"nearRT-RIC is running at {}\"",
                    config.ric_endpoint()
                )),
        )
}

fn build_block(opts: &FlexRicOptions) -> ScriptBlock {
    ScriptBlock::new()
        .line("echo \"🏗️ Building FlexRIC...\"")
        .line("rm -rf build")
        .line("mkdir build && cd build")
        .line(format!(
            "cmake -DCMAKE_BUILD_TYPE=Release -DASN1C_EXEC_PATH={} \\",
            opts.asn1c_path
        ))
        .line(format!("  -DE2AP_VERSION={} \\", opts.e2ap_version))
        .line(format!("  -DKMP_VERSION={} ..", opts.kmp_version))
        .line("make -j$(nproc)")
        .line("sudo make install")
}

fn conf_block(config: &Configuration) -> ScriptBlock {
    ScriptBlock::titled("Configure FlexRIC")
        .line("echo \"⚙️ Configuring FlexRIC...\"")
        .line("cat > /tmp/flexric.conf << EOF")
        .line("[E2]")
        .line(format!("ric_ip = {}", config.ric_ip))
        .line(format!("ric_port = {}", config.ric_port))
        .line("")
        .line("[SERVICE_MODELS]")
        .line("kpm = true")
        .line("rc = true")
        .line("EOF")
        .line("")
        .line("sudo mkdir -p /usr/local/etc/flexric")
        .line("sudo cp /tmp/flexric.conf /usr/local/etc/flexric/flexric.conf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentOptions;
    use crate::template::fixtures;

    #[test]
    fn test_build_flags_use_options() {
        let opts = FlexRicOptions {
            asn1c_path: "/opt/asn1c/bin/asn1c".to_string(),
            e2ap_version: "E2AP_V3".to_string(),
            kmp_version: "KMP_V3_00".to_string(),
        };
        let block = build_block(&opts);
        assert!(block.contains("-DASN1C_EXEC_PATH=/opt/asn1c/bin/asn1c"));
        assert!(block.contains("-DE2AP_VERSION=E2AP_V3"));
        assert!(block.contains("-DKMP_VERSION=KMP_V3_00 .."));
    }

    #[test]
    fn test_conf_enables_both_service_models() {
        let config = fixtures::config(DeploymentOptions::FlexRic(FlexRicOptions::default()));
        let block = conf_block(&config);
        assert!(block.contains("kpm = true"));
        assert!(block.contains("rc = true"));
        assert!(block.contains("ric_port = 36421"));
    }

    #[test]
    fn test_banner_shows_versions() {
        let config = fixtures::config(DeploymentOptions::FlexRic(FlexRicOptions::default()));
        let text = compose(&config, &FlexRicOptions::default()).render();
        assert!(text.contains("echo \"  E2AP Version: E2AP_V2\""));
        assert!(text.contains("echo \"  KMP Version: KMP_V2_03\""));
        assert!(text.contains("cd /opt/ric-deployment\ngit clone https://gitlab.eurecom.fr"));
    }
}
