//! Interactive deployment wizard.
//!
//! Collects a configuration, shows a summary, and on confirmation saves the
//! configuration, writes the deployment script and optionally runs it.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ric_deploy_core::config::{DEFAULT_GNB_PORT, DEFAULT_PLMN_ID, DEFAULT_RIC_IP, DEFAULT_RIC_PORT};
use ric_deploy_core::{
    default_config_dir, default_install_dir, obs, render, save, script_digest, write_script,
    Configuration, ConfigurationDraft, CoreType, DeployError, DeploymentOptions, FlexRicOptions,
    OaiE2Options, OranScOptions, RicType, ServiceModels, Supervisor,
};
use tracing::warn;

use crate::commands::OutputSink;
use crate::prompt::Prompter;

/// How a wizard session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Operator declined the summary; nothing written.
    Cancelled,
    /// Script written, execution declined.
    Generated { script: PathBuf },
    /// Script ran to completion.
    Executed { script: PathBuf, exit_code: i32 },
    /// Operator interrupted the running script.
    Interrupted { script: PathBuf },
}

impl WizardOutcome {
    /// Process exit code for the tool.
    pub fn exit_code(&self) -> u8 {
        match self {
            WizardOutcome::Cancelled | WizardOutcome::Generated { .. } => 0,
            WizardOutcome::Executed { exit_code, .. } => clamp_exit_code(*exit_code),
            WizardOutcome::Interrupted { .. } => 130,
        }
    }
}

/// Map a child exit code onto a process exit code; signals become 1.
pub fn clamp_exit_code(code: i32) -> u8 {
    match u8::try_from(code) {
        Ok(c) => c,
        Err(_) => 1,
    }
}

pub struct Wizard<R, W> {
    prompter: Prompter<R, W>,
    supervisor: Supervisor,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(prompter: Prompter<R, W>, supervisor: Supervisor) -> Self {
        Self {
            prompter,
            supervisor,
        }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Run the whole session.
    pub async fn run(&mut self) -> Result<WizardOutcome> {
        self.prompter.header("RIC Interactive Deployment Wizard")?;

        let config = self.collect()?;
        self.show_summary(&config)?;

        if !self.prompter.confirm("\nProceed with deployment?")? {
            self.prompter.info("Deployment cancelled by user")?;
            return Ok(WizardOutcome::Cancelled);
        }

        match save(&config, &config.config_dir) {
            Ok(path) => self
                .prompter
                .success(&format!("Configuration saved to {}", path.display()))?,
            Err(e) => {
                warn!(error = %e, "continuing without saved configuration");
                self.prompter
                    .warning(&format!("Failed to save configuration: {}", e))?;
            }
        }

        let text = render(&config);
        obs::emit_script_rendered(config.ric_type(), &script_digest(&text), text.len());
        let script = write_script(&config, &text).context("cannot continue without a script")?;
        self.prompter
            .success(&format!("Deployment script generated: {}", script.display()))?;

        self.prompter.header("Deployment Execution")?;
        if !self
            .prompter
            .confirm("Do you want to execute the deployment script now?")?
        {
            self.prompter
                .info("Deployment script generated but not executed")?;
            self.prompter
                .info(&format!("You can run it manually: {}", script.display()))?;
            return Ok(WizardOutcome::Generated { script });
        }

        self.prompter.info("Starting deployment execution...")?;
        self.execute(script).await
    }

    async fn execute(&mut self, script: PathBuf) -> Result<WizardOutcome> {
        let mut sink = OutputSink::new(self.prompter.writer());
        let outcome = self
            .supervisor
            .execute(&script, |line| sink.line(line))
            .await;

        match outcome {
            Ok(result) if result.succeeded => {
                self.prompter.success("Deployment completed successfully!")?;
                Ok(WizardOutcome::Executed {
                    script,
                    exit_code: 0,
                })
            }
            Ok(result) => {
                self.prompter.error(&format!(
                    "Deployment failed with return code {}",
                    result.exit_code
                ))?;
                Ok(WizardOutcome::Executed {
                    script,
                    exit_code: result.exit_code,
                })
            }
            Err(DeployError::Interrupted { .. }) => {
                self.prompter.info("Deployment interrupted by user")?;
                Ok(WizardOutcome::Interrupted { script })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Collect a complete configuration.
    pub fn collect(&mut self) -> Result<Configuration> {
        let mut draft = ConfigurationDraft::new();
        self.select_ric_type(&mut draft)?;
        self.collect_network(&mut draft)?;
        self.collect_deployment(&mut draft)?;
        Ok(draft.finish()?)
    }

    fn select_ric_type(&mut self, draft: &mut ConfigurationDraft) -> Result<()> {
        let p = &mut self.prompter;
        p.header("RIC Type Selection")?;
        p.say("Available RIC implementations:")?;
        for t in RicType::ALL {
            p.say(&format!("  {}. {} - {}", t.code(), t.name(), t.description()))?;
        }
        loop {
            let choice = p.ask("\nSelect RIC type (1-4)", None)?;
            match draft.select_ric_type(&choice) {
                Ok(t) => return p.success(&format!("Selected: {}", t.name())),
                Err(_) => p.error("Invalid choice. Please select 1-4.")?,
            }
        }
    }

    fn collect_network(&mut self, draft: &mut ConfigurationDraft) -> Result<()> {
        let p = &mut self.prompter;
        p.header("Network Configuration")?;

        p.say("RIC Configuration:")?;
        p.ask_until("RIC IP Address", Some(DEFAULT_RIC_IP), |s| {
            draft.set_ric_ip(s)
        })?;
        p.ask_until("RIC E2 Port", Some(DEFAULT_RIC_PORT), |s| {
            draft.set_ric_port(s)
        })?;

        p.say("\ngNB Configuration:")?;
        if p.confirm("Connect to existing gNB?")? {
            let ip = p.ask_until("gNB IP Address", Some(DEFAULT_RIC_IP), checked_ip)?;
            let port = p.ask_until("gNB E2 Port", Some(DEFAULT_GNB_PORT), checked_port)?;
            draft.use_existing_gnb(&ip, &port)?;
        } else {
            p.info("Will deploy gNB as part of the setup")?;
            draft.deploy_new_gnb();
        }

        p.say("\nCore Network Configuration:")?;
        if p.confirm("Connect to existing Core?")? {
            p.say("\nAvailable Core types:")?;
            for t in CoreType::ALL {
                p.say(&format!("  {}. {} - {}", t.code(), t.name(), t.description()))?;
            }
            let core_type = loop {
                let choice = p.ask("\nSelect Core type (1-4)", None)?;
                match CoreType::from_code(&choice) {
                    Some(t) => break t,
                    None => p.error("Invalid choice. Please select 1-4.")?,
                }
            };
            p.ask_until("Core Network IP Address", Some(DEFAULT_RIC_IP), |s| {
                draft.use_existing_core(core_type, s)
            })?;
        } else {
            p.info("Will deploy Core as part of the setup")?;
            draft.deploy_new_core();
        }
        Ok(())
    }

    fn collect_deployment(&mut self, draft: &mut ConfigurationDraft) -> Result<()> {
        let p = &mut self.prompter;
        p.header("Deployment Options")?;

        let install_dir = p.ask_directory("Installation Directory", &default_install_dir())?;
        let config_dir =
            p.ask_directory("Configuration Directory", &default_config_dir(&install_dir))?;
        draft.set_install_dir(install_dir);
        draft.set_config_dir(config_dir);

        let options = match draft.ric_type() {
            Some(RicType::OranSc) => {
                p.say("\nORAN SC RIC Options:")?;
                let use_docker = p.confirm("Use Docker deployment?")?;
                p.ask_until("E2 PLMN ID", Some(DEFAULT_PLMN_ID), |s| {
                    draft.set_plmn_id(s)
                })?;
                p.say("\nService Models to enable:")?;
                let kpm = p.confirm("Enable KPM Service Model?")?;
                let rc = p.confirm("Enable RC Service Model?")?;
                DeploymentOptions::OranSc(OranScOptions {
                    use_docker,
                    service_models: ServiceModels { kpm, rc },
                })
            }
            Some(RicType::FlexRic) => {
                p.say("\nFlexRIC Options:")?;
                let defaults = FlexRicOptions::default();
                let asn1c_path = p.ask("ASN1C Path", Some(defaults.asn1c_path.as_str()))?;
                let e2ap_version = p.ask("E2AP Version", Some(defaults.e2ap_version.as_str()))?;
                let kmp_version = p.ask("KMP Version", Some(defaults.kmp_version.as_str()))?;
                DeploymentOptions::FlexRic(FlexRicOptions {
                    asn1c_path,
                    e2ap_version,
                    kmp_version,
                })
            }
            Some(RicType::OaiE2Agent) => {
                p.say("\nOAI E2 Agent Options:")?;
                DeploymentOptions::OaiE2Agent(OaiE2Options {
                    build_gnb: p.confirm("Build gNB?")?,
                    build_nrue: p.confirm("Build nrUE?")?,
                    use_rfsim: p.confirm("Use RF simulator?")?,
                })
            }
            Some(RicType::Custom) | None => return Ok(()),
        };
        draft.set_options(options)?;
        Ok(())
    }

    fn show_summary(&mut self, config: &Configuration) -> Result<()> {
        self.prompter.header("Configuration Summary")?;
        for line in summary(config) {
            self.prompter.say(&line)?;
        }
        Ok(())
    }
}

fn checked_ip(s: &str) -> ric_deploy_core::Result<String> {
    if ric_deploy_core::validate_ip(s) {
        Ok(s.to_string())
    } else {
        Err(DeployError::Validation {
            field: "ip",
            value: s.to_string(),
        })
    }
}

fn checked_port(s: &str) -> ric_deploy_core::Result<String> {
    if ric_deploy_core::validate_port(s) {
        Ok(s.to_string())
    } else {
        Err(DeployError::Validation {
            field: "port",
            value: s.to_string(),
        })
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Human-readable configuration summary, one entry per line.
pub fn summary(config: &Configuration) -> Vec<String> {
    let mut lines = vec![
        "RIC Configuration:".to_string(),
        format!("  Type: {}", config.ric_type().name()),
        format!("  IP: {}", config.ric_ip),
        format!("  Port: {}", config.ric_port),
        String::new(),
        "gNB Configuration:".to_string(),
        format!("  Use Existing: {}", yes_no(config.use_existing_gnb)),
        format!("  IP: {}", config.gnb_ip),
        format!("  Port: {}", config.gnb_port),
        String::new(),
        "Core Configuration:".to_string(),
        format!("  Use Existing: {}", yes_no(config.use_existing_core)),
    ];
    if config.use_existing_core {
        lines.push(format!("  Type: {}", config.core_type.name()));
    }
    lines.extend([
        format!("  IP: {}", config.core_ip),
        String::new(),
        "Deployment Options:".to_string(),
        format!("  Install Directory: {}", config.install_dir.display()),
        format!("  Config Directory: {}", config.config_dir.display()),
    ]);

    let extra: Vec<String> = match &config.deployment_options {
        DeploymentOptions::OranSc(o) => {
            let models = o.service_models;
            vec![
                format!("  use_docker: {}", o.use_docker),
                format!("  plmn_id: {}", config.plmn_id()),
                format!("  service_models: kpm={} rc={}", models.kpm, models.rc),
            ]
        }
        DeploymentOptions::FlexRic(o) => vec![
            format!("  asn1c_path: {}", o.asn1c_path),
            format!("  e2ap_version: {}", o.e2ap_version),
            format!("  kmp_version: {}", o.kmp_version),
        ],
        DeploymentOptions::OaiE2Agent(o) => vec![
            format!("  build_gnb: {}", o.build_gnb),
            format!("  build_nrue: {}", o.build_nrue),
            format!("  use_rfsim: {}", o.use_rfsim),
        ],
        DeploymentOptions::Custom(_) => Vec::new(),
    };
    if !extra.is_empty() {
        lines.push(String::new());
        lines.push("Additional Options:".to_string());
        lines.extend(extra);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_exit_code() {
        assert_eq!(clamp_exit_code(0), 0);
        assert_eq!(clamp_exit_code(7), 7);
        assert_eq!(clamp_exit_code(-1), 1);
        assert_eq!(clamp_exit_code(300), 1);
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(WizardOutcome::Cancelled.exit_code(), 0);
        assert_eq!(
            WizardOutcome::Interrupted {
                script: PathBuf::from("x")
            }
            .exit_code(),
            130
        );
        assert_eq!(
            WizardOutcome::Executed {
                script: PathBuf::from("x"),
                exit_code: 7
            }
            .exit_code(),
            7
        );
    }
}
