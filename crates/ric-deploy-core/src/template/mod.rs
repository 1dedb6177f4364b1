//! Deployment script synthesis.
//!
//! Each RIC flavor has its own renderer that composes a [`Script`] out of
//! [`ScriptBlock`]s: a fixed preamble, a middle whose blocks and lines are
//! included according to the typed options, and a fixed postamble ending in
//! a success line that names `ric_ip:ric_port`.
//!
//! Rendering is pure: equal configurations produce byte-identical text.
//! Values are interpolated verbatim; IPs and ports are validated at
//! collection time, paths are not checked for shell metacharacters.

mod custom;
mod flexric;
mod oai_e2;
mod oran_sc;

use sha2::{Digest, Sha256};

use crate::config::{Configuration, DeploymentOptions};

/// Interpreter line every script starts with.
pub const SHEBANG: &str = "#!/bin/bash";

/// An ordered group of shell statements, rendered as consecutive lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptBlock {
    lines: Vec<String>,
}

impl ScriptBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block opened by a `# title` comment.
    pub fn titled(title: &str) -> Self {
        Self::new().line(format!("# {}", title))
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Append `line` only when `include` holds.
    pub fn line_if(self, include: bool, line: impl Into<String>) -> Self {
        if include {
            self.line(line)
        } else {
            self
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A whole script: blocks separated by blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    blocks: Vec<ScriptBlock>,
}

impl Script {
    /// Script holding the shebang and `set -e`.
    pub fn with_preamble() -> Self {
        Self::default()
            .block(ScriptBlock::new().line(SHEBANG))
            .block(ScriptBlock::new().line("set -e"))
    }

    pub fn block(mut self, block: ScriptBlock) -> Self {
        if !block.is_empty() {
            self.blocks.push(block);
        }
        self
    }

    pub fn block_if(self, include: bool, block: impl FnOnce() -> ScriptBlock) -> Self {
        if include {
            self.block(block())
        } else {
            self
        }
    }

    pub fn blocks(&self) -> &[ScriptBlock] {
        &self.blocks
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for line in &block.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

/// Compose the script blocks for `config`.
pub fn compose(config: &Configuration) -> Script {
    match &config.deployment_options {
        DeploymentOptions::OranSc(opts) => oran_sc::compose(config, opts),
        DeploymentOptions::FlexRic(opts) => flexric::compose(config, opts),
        DeploymentOptions::OaiE2Agent(opts) => oai_e2::compose(config, opts),
        DeploymentOptions::Custom(_) => custom::compose(config),
    }
}

/// Render the deployment script text for `config`.
pub fn render(config: &Configuration) -> String {
    compose(config).render()
}

/// SHA-256 hex digest of rendered script text.
pub fn script_digest(script: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(script.as_bytes());
    hex::encode(hasher.finalize())
}

/// `echo` banner listing the effective configuration.
fn banner(title: &str, entries: &[(&str, String)]) -> ScriptBlock {
    let mut block = ScriptBlock::new()
        .line(format!("echo \"🚀 Starting {} Deployment\"", title))
        .line("echo \"Configuration:\"");
    for (label, value) in entries {
        block = block.line(format!("echo \"  {}: {}\"", label, value));
    }
    block
}

fn install_dir_block(config: &Configuration) -> ScriptBlock {
    let dir = config.install_dir.display();
    ScriptBlock::titled("Create installation directory")
        .line(format!("mkdir -p {}", dir))
        .line(format!("cd {}", dir))
}

fn gcc13_block() -> ScriptBlock {
    ScriptBlock::titled("Configure gcc-13 as default")
        .line("sudo update-alternatives --install /usr/bin/gcc gcc /usr/bin/gcc-13 100 \\")
        .line("  --slave /usr/bin/g++ g++ /usr/bin/g++-13 --slave /usr/bin/gcov gcov /usr/bin/gcov-13")
        .line("sudo update-alternatives --set gcc /usr/bin/gcc-13")
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::config::{Configuration, CoreType, DeploymentOptions};

    pub fn config(options: DeploymentOptions) -> Configuration {
        Configuration {
            ric_ip: "10.10.0.5".to_string(),
            ric_port: "36421".to_string(),
            gnb_ip: "10.10.0.6".to_string(),
            gnb_port: "36422".to_string(),
            core_ip: "10.10.0.7".to_string(),
            core_type: CoreType::Open5gs,
            install_dir: PathBuf::from("/opt/ric-deployment"),
            config_dir: PathBuf::from("/opt/ric-deployment/configs"),
            use_existing_core: false,
            use_existing_gnb: false,
            e2_interface_config: BTreeMap::new(),
            deployment_options: options,
        }
    }
}
