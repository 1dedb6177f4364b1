//! Incremental configuration collection.
//!
//! The interactive driver fills a [`ConfigurationDraft`] one answer at a
//! time. Setters validate their raw input and return a typed
//! [`DeployError::Validation`] so the driver can re-ask; [`ConfigurationDraft::finish`]
//! refuses to produce a [`Configuration`] until every required field is set.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{
    default_config_dir, Configuration, CoreType, DeploymentOptions, RicType, DEFAULT_GNB_PORT,
    DEFAULT_PLMN_ID, DEFAULT_RIC_IP, PLMN_ID_KEY,
};
use crate::error::{DeployError, Result};
use crate::validate::{validate_ip, validate_port};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    ip: String,
    port: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CoreChoice {
    existing: bool,
    core_type: CoreType,
    ip: String,
}

/// Partially collected configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationDraft {
    ric_type: Option<RicType>,
    ric_ip: Option<String>,
    ric_port: Option<String>,
    gnb: Option<(bool, Endpoint)>,
    core: Option<CoreChoice>,
    install_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    e2_interface_config: BTreeMap<String, String>,
    deployment_options: Option<DeploymentOptions>,
}

fn checked_ip(field: &'static str, value: &str) -> Result<String> {
    if validate_ip(value) {
        Ok(value.to_string())
    } else {
        Err(DeployError::Validation {
            field,
            value: value.to_string(),
        })
    }
}

fn checked_port(field: &'static str, value: &str) -> Result<String> {
    if validate_port(value) {
        Ok(value.to_string())
    } else {
        Err(DeployError::Validation {
            field,
            value: value.to_string(),
        })
    }
}

impl ConfigurationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ric_type(&self) -> Option<RicType> {
        self.ric_type
    }

    /// Select the RIC type from its menu code ("1".."4").
    pub fn select_ric_type(&mut self, code: &str) -> Result<RicType> {
        let ric_type = RicType::from_code(code).ok_or_else(|| DeployError::Validation {
            field: "ric_type",
            value: code.to_string(),
        })?;
        self.set_ric_type(ric_type)?;
        Ok(ric_type)
    }

    /// Set the RIC type. It can be chosen only once.
    pub fn set_ric_type(&mut self, ric_type: RicType) -> Result<()> {
        match self.ric_type {
            Some(current) if current != ric_type => Err(DeployError::Validation {
                field: "ric_type",
                value: ric_type.code().to_string(),
            }),
            _ => {
                self.ric_type = Some(ric_type);
                Ok(())
            }
        }
    }

    pub fn set_ric_ip(&mut self, ip: &str) -> Result<()> {
        self.ric_ip = Some(checked_ip("ric_ip", ip)?);
        Ok(())
    }

    pub fn set_ric_port(&mut self, port: &str) -> Result<()> {
        self.ric_port = Some(checked_port("ric_port", port)?);
        Ok(())
    }

    /// Connect to an already running gNB.
    pub fn use_existing_gnb(&mut self, ip: &str, port: &str) -> Result<()> {
        let endpoint = Endpoint {
            ip: checked_ip("gnb_ip", ip)?,
            port: checked_port("gnb_port", port)?,
        };
        self.gnb = Some((true, endpoint));
        Ok(())
    }

    /// The gNB is deployed as part of the setup, on the local defaults.
    pub fn deploy_new_gnb(&mut self) {
        self.gnb = Some((
            false,
            Endpoint {
                ip: DEFAULT_RIC_IP.to_string(),
                port: DEFAULT_GNB_PORT.to_string(),
            },
        ));
    }

    /// Connect to an already running core network.
    pub fn use_existing_core(&mut self, core_type: CoreType, ip: &str) -> Result<()> {
        self.core = Some(CoreChoice {
            existing: true,
            core_type,
            ip: checked_ip("core_ip", ip)?,
        });
        Ok(())
    }

    /// The core is deployed as part of the setup: Open5GS on localhost.
    pub fn deploy_new_core(&mut self) {
        self.core = Some(CoreChoice {
            existing: false,
            core_type: CoreType::default(),
            ip: DEFAULT_RIC_IP.to_string(),
        });
    }

    pub fn install_dir(&self) -> Option<&PathBuf> {
        self.install_dir.as_ref()
    }

    /// Directory existence is checked by the caller with
    /// [`crate::validate::validate_directory`].
    pub fn set_install_dir(&mut self, dir: impl Into<PathBuf>) {
        self.install_dir = Some(dir.into());
    }

    pub fn set_config_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config_dir = Some(dir.into());
    }

    pub fn set_plmn_id(&mut self, plmn_id: &str) -> Result<()> {
        let plmn_id = plmn_id.trim();
        if plmn_id.is_empty() {
            return Err(DeployError::Validation {
                field: PLMN_ID_KEY,
                value: plmn_id.to_string(),
            });
        }
        self.e2_interface_config
            .insert(PLMN_ID_KEY.to_string(), plmn_id.to_string());
        Ok(())
    }

    /// Set the type-specific options. Must agree with the selected RIC type.
    pub fn set_options(&mut self, options: DeploymentOptions) -> Result<()> {
        self.set_ric_type(options.ric_type())
            .map_err(|_| DeployError::Validation {
                field: "deployment_options",
                value: options.ric_type().name().to_string(),
            })?;
        self.deployment_options = Some(options);
        Ok(())
    }

    /// Produce the complete configuration.
    ///
    /// Options not set explicitly take the collection defaults of the RIC
    /// type; ORAN SC always carries a PLMN id.
    pub fn finish(self) -> Result<Configuration> {
        let ric_type = self.ric_type.ok_or(DeployError::MissingField("ric_type"))?;
        let ric_ip = self.ric_ip.ok_or(DeployError::MissingField("ric_ip"))?;
        let ric_port = self.ric_port.ok_or(DeployError::MissingField("ric_port"))?;
        let (use_existing_gnb, gnb) = self.gnb.ok_or(DeployError::MissingField("gnb_ip"))?;
        let core = self.core.ok_or(DeployError::MissingField("core_ip"))?;
        let install_dir = self
            .install_dir
            .ok_or(DeployError::MissingField("install_dir"))?;
        let config_dir = self
            .config_dir
            .unwrap_or_else(|| default_config_dir(&install_dir));

        let deployment_options = self
            .deployment_options
            .unwrap_or_else(|| DeploymentOptions::default_for(ric_type));

        let mut e2_interface_config = self.e2_interface_config;
        if ric_type == RicType::OranSc {
            e2_interface_config
                .entry(PLMN_ID_KEY.to_string())
                .or_insert_with(|| DEFAULT_PLMN_ID.to_string());
        }

        Ok(Configuration {
            ric_ip,
            ric_port,
            gnb_ip: gnb.ip,
            gnb_port: gnb.port,
            core_ip: core.ip,
            core_type: core.core_type,
            install_dir,
            config_dir,
            use_existing_core: core.existing,
            use_existing_gnb,
            e2_interface_config,
            deployment_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OaiE2Options, DEFAULT_RIC_PORT};

    fn filled(code: &str) -> ConfigurationDraft {
        let mut draft = ConfigurationDraft::new();
        draft.select_ric_type(code).unwrap();
        draft.set_ric_ip(DEFAULT_RIC_IP).unwrap();
        draft.set_ric_port(DEFAULT_RIC_PORT).unwrap();
        draft.deploy_new_gnb();
        draft.deploy_new_core();
        draft.set_install_dir("/opt/ric");
        draft
    }

    #[test]
    fn test_finish_applies_collection_defaults() {
        let config = filled("1").finish().unwrap();
        assert_eq!(config.ric_type(), RicType::OranSc);
        assert_eq!(config.gnb_ip, "127.0.0.1");
        assert_eq!(config.gnb_port, "36422");
        assert_eq!(config.core_type, CoreType::Open5gs);
        assert!(!config.use_existing_core);
        assert!(!config.use_existing_gnb);
        assert_eq!(config.config_dir, PathBuf::from("/opt/ric/configs"));
        assert_eq!(config.plmn_id(), "00101");
        assert_eq!(
            config.deployment_options,
            DeploymentOptions::default_for(RicType::OranSc)
        );
    }

    #[test]
    fn test_non_oran_has_no_e2_interface_config() {
        let config = filled("2").finish().unwrap();
        assert!(config.e2_interface_config.is_empty());
    }

    #[test]
    fn test_incomplete_draft_reports_missing_field() {
        let err = ConfigurationDraft::new().finish().unwrap_err();
        assert!(matches!(err, DeployError::MissingField("ric_type")));

        let mut draft = filled("4");
        draft.install_dir = None;
        let err = draft.finish().unwrap_err();
        assert!(matches!(err, DeployError::MissingField("install_dir")));
    }

    #[test]
    fn test_invalid_inputs_are_rejected_with_field() {
        let mut draft = ConfigurationDraft::new();
        let err = draft.set_ric_ip("256.1.1.1").unwrap_err();
        assert!(matches!(err, DeployError::Validation { field: "ric_ip", .. }));

        let err = draft.use_existing_gnb("10.0.0.2", "0").unwrap_err();
        assert!(matches!(err, DeployError::Validation { field: "gnb_port", .. }));

        let err = draft.select_ric_type("9").unwrap_err();
        assert!(matches!(err, DeployError::Validation { field: "ric_type", .. }));
    }

    #[test]
    fn test_existing_endpoints_are_kept() {
        let mut draft = filled("3");
        draft.use_existing_gnb("10.0.0.2", "38412").unwrap();
        draft.use_existing_core(CoreType::Free5gc, "10.0.0.3").unwrap();
        let config = draft.finish().unwrap();
        assert!(config.use_existing_gnb);
        assert!(config.use_existing_core);
        assert_eq!(config.gnb_ip, "10.0.0.2");
        assert_eq!(config.gnb_port, "38412");
        assert_eq!(config.core_type, CoreType::Free5gc);
        assert_eq!(config.core_ip, "10.0.0.3");
    }

    #[test]
    fn test_options_must_match_selected_type() {
        let mut draft = filled("1");
        let err = draft
            .set_options(DeploymentOptions::OaiE2Agent(OaiE2Options::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::Validation {
                field: "deployment_options",
                ..
            }
        ));
    }

    #[test]
    fn test_options_select_type_when_unset() {
        let mut draft = ConfigurationDraft::new();
        draft
            .set_options(DeploymentOptions::OaiE2Agent(OaiE2Options {
                build_gnb: false,
                ..OaiE2Options::default()
            }))
            .unwrap();
        assert_eq!(draft.ric_type(), Some(RicType::OaiE2Agent));
    }
}
