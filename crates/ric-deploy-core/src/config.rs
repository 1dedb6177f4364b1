//! Deployment configuration model.
//!
//! [`Configuration`] is the single record every other component consumes.
//! The per-flavor option bag is a tagged variant ([`DeploymentOptions`]), so
//! the RIC type is derived from the options and the two can never disagree.
//! On disk the options are a plain mapping next to a `ric_type` code; see
//! [`ConfigDocument`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// Default RIC address offered at collection time.
pub const DEFAULT_RIC_IP: &str = "127.0.0.1";
/// Default RIC E2 port.
pub const DEFAULT_RIC_PORT: &str = "36421";
/// Default gNB E2 port.
pub const DEFAULT_GNB_PORT: &str = "36422";
/// Default PLMN id written to the E2 interface config.
pub const DEFAULT_PLMN_ID: &str = "00101";
/// Key of the PLMN id inside `e2_interface_config`.
pub const PLMN_ID_KEY: &str = "plmn_id";
/// Directory name used under `$HOME` when no install dir is given.
pub const DEFAULT_INSTALL_DIR_NAME: &str = "ric-deployment";

/// RIC implementation being deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RicType {
    #[serde(rename = "1")]
    OranSc,
    #[serde(rename = "2")]
    FlexRic,
    #[serde(rename = "3")]
    OaiE2Agent,
    #[serde(rename = "4")]
    Custom,
}

impl RicType {
    /// All RIC types in menu order.
    pub const ALL: [RicType; 4] = [
        RicType::OranSc,
        RicType::FlexRic,
        RicType::OaiE2Agent,
        RicType::Custom,
    ];

    /// Selection code used in menus and in the persisted document.
    pub fn code(&self) -> &'static str {
        match self {
            RicType::OranSc => "1",
            RicType::FlexRic => "2",
            RicType::OaiE2Agent => "3",
            RicType::Custom => "4",
        }
    }

    /// Parse a selection code ("1".."4").
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code.trim())
    }

    pub fn name(&self) -> &'static str {
        match self {
            RicType::OranSc => "ORAN SC RIC",
            RicType::FlexRic => "FlexRIC",
            RicType::OaiE2Agent => "OAI E2 Agent",
            RicType::Custom => "Custom RIC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RicType::OranSc => "Standard ORAN SC RIC implementation",
            RicType::FlexRic => "FlexRIC implementation with OAI integration",
            RicType::OaiE2Agent => "OAI with E2 Agent integration",
            RicType::Custom => "Custom RIC configuration",
        }
    }
}

impl fmt::Display for RicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 5G core network the RIC and gNB attach to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreType {
    #[default]
    #[serde(rename = "1")]
    Open5gs,
    #[serde(rename = "2")]
    OaiCn5g,
    #[serde(rename = "3")]
    Free5gc,
    #[serde(rename = "4")]
    External,
}

impl CoreType {
    /// All core types in menu order.
    pub const ALL: [CoreType; 4] = [
        CoreType::Open5gs,
        CoreType::OaiCn5g,
        CoreType::Free5gc,
        CoreType::External,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CoreType::Open5gs => "1",
            CoreType::OaiCn5g => "2",
            CoreType::Free5gc => "3",
            CoreType::External => "4",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code.trim())
    }

    pub fn name(&self) -> &'static str {
        match self {
            CoreType::Open5gs => "Open5GS",
            CoreType::OaiCn5g => "OAI CN5G",
            CoreType::Free5gc => "Free5GC",
            CoreType::External => "External Core",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CoreType::Open5gs => "Open5GS 5G Core",
            CoreType::OaiCn5g => "OpenAirInterface 5G Core",
            CoreType::Free5gc => "Free5GC implementation",
            CoreType::External => "External/Commercial 5G Core",
        }
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// E2 service models to enable.
///
/// `kmp` is accepted as a legacy spelling of `kpm` when reading documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceModels {
    #[serde(alias = "kmp")]
    pub kpm: bool,
    pub rc: bool,
}

impl Default for ServiceModels {
    fn default() -> Self {
        Self { kpm: true, rc: true }
    }
}

/// ORAN SC RIC options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OranScOptions {
    /// Start services with `docker compose` instead of `make run`.
    pub use_docker: bool,
    pub service_models: ServiceModels,
}

impl Default for OranScOptions {
    fn default() -> Self {
        Self {
            use_docker: true,
            service_models: ServiceModels::default(),
        }
    }
}

/// FlexRIC build options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexRicOptions {
    pub asn1c_path: String,
    pub e2ap_version: String,
    pub kmp_version: String,
}

impl Default for FlexRicOptions {
    fn default() -> Self {
        Self {
            asn1c_path: "/usr/local/bin/asn1c".to_string(),
            e2ap_version: "E2AP_V2".to_string(),
            kmp_version: "KMP_V2_03".to_string(),
        }
    }
}

/// OAI gNB/nrUE build options with the E2 agent enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OaiE2Options {
    pub build_gnb: bool,
    pub build_nrue: bool,
    pub use_rfsim: bool,
}

impl Default for OaiE2Options {
    fn default() -> Self {
        Self {
            build_gnb: true,
            build_nrue: true,
            use_rfsim: true,
        }
    }
}

/// Custom RIC carries no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOptions {}

/// Type-dependent deployment options. The variant decides the RIC type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOptions {
    OranSc(OranScOptions),
    FlexRic(FlexRicOptions),
    OaiE2Agent(OaiE2Options),
    Custom(CustomOptions),
}

impl DeploymentOptions {
    /// Options with every field at its collection default.
    pub fn default_for(ric_type: RicType) -> Self {
        match ric_type {
            RicType::OranSc => DeploymentOptions::OranSc(OranScOptions::default()),
            RicType::FlexRic => DeploymentOptions::FlexRic(FlexRicOptions::default()),
            RicType::OaiE2Agent => DeploymentOptions::OaiE2Agent(OaiE2Options::default()),
            RicType::Custom => DeploymentOptions::Custom(CustomOptions::default()),
        }
    }

    pub fn ric_type(&self) -> RicType {
        match self {
            DeploymentOptions::OranSc(_) => RicType::OranSc,
            DeploymentOptions::FlexRic(_) => RicType::FlexRic,
            DeploymentOptions::OaiE2Agent(_) => RicType::OaiE2Agent,
            DeploymentOptions::Custom(_) => RicType::Custom,
        }
    }

    /// Flatten to the untagged mapping stored under `deployment_options`.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            DeploymentOptions::OranSc(o) => serde_json::to_value(o),
            DeploymentOptions::FlexRic(o) => serde_json::to_value(o),
            DeploymentOptions::OaiE2Agent(o) => serde_json::to_value(o),
            DeploymentOptions::Custom(o) => serde_json::to_value(o),
        }
    }

    /// Decode an untagged mapping according to `ric_type`.
    ///
    /// Missing keys take their defaults; `null` means all defaults.
    pub fn from_value(ric_type: RicType, value: serde_json::Value) -> Result<Self, DeployError> {
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value
        };
        let invalid = |e: serde_json::Error| {
            DeployError::InvalidDocument(format!("deployment_options for {}: {}", ric_type, e))
        };
        Ok(match ric_type {
            RicType::OranSc => {
                DeploymentOptions::OranSc(serde_json::from_value(value).map_err(invalid)?)
            }
            RicType::FlexRic => {
                DeploymentOptions::FlexRic(serde_json::from_value(value).map_err(invalid)?)
            }
            RicType::OaiE2Agent => {
                DeploymentOptions::OaiE2Agent(serde_json::from_value(value).map_err(invalid)?)
            }
            RicType::Custom => {
                if !value.is_object() {
                    return Err(DeployError::InvalidDocument(
                        "deployment_options for Custom RIC must be a mapping".to_string(),
                    ));
                }
                DeploymentOptions::Custom(CustomOptions::default())
            }
        })
    }
}

/// A complete deployment configuration.
///
/// Built through [`crate::draft::ConfigurationDraft`]; read-only once handed
/// to rendering or persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ConfigDocument", try_from = "ConfigDocument")]
pub struct Configuration {
    pub ric_ip: String,
    pub ric_port: String,
    pub gnb_ip: String,
    pub gnb_port: String,
    pub core_ip: String,
    pub core_type: CoreType,
    pub install_dir: PathBuf,
    pub config_dir: PathBuf,
    pub use_existing_core: bool,
    pub use_existing_gnb: bool,
    pub e2_interface_config: BTreeMap<String, String>,
    pub deployment_options: DeploymentOptions,
}

impl Configuration {
    pub fn ric_type(&self) -> RicType {
        self.deployment_options.ric_type()
    }

    /// PLMN id from the E2 interface config, or the default.
    pub fn plmn_id(&self) -> &str {
        self.e2_interface_config
            .get(PLMN_ID_KEY)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PLMN_ID)
    }

    /// `ric_ip:ric_port`
    pub fn ric_endpoint(&self) -> String {
        format!("{}:{}", self.ric_ip, self.ric_port)
    }
}

/// `<install_dir>/configs`, the default config directory.
pub fn default_config_dir(install_dir: &Path) -> PathBuf {
    install_dir.join("configs")
}

/// `$HOME/ric-deployment`, falling back to a relative path without `HOME`.
pub fn default_install_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(DEFAULT_INSTALL_DIR_NAME),
        None => PathBuf::from(DEFAULT_INSTALL_DIR_NAME),
    }
}

/// Persisted shape of a [`Configuration`].
///
/// Keys match the configuration field names; enums are stored as their
/// selection codes and the options as an untagged mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub ric_type: RicType,
    pub ric_ip: String,
    pub ric_port: String,
    pub gnb_ip: String,
    pub gnb_port: String,
    pub core_ip: String,
    pub core_type: CoreType,
    pub install_dir: PathBuf,
    pub config_dir: PathBuf,
    pub use_existing_core: bool,
    pub use_existing_gnb: bool,
    #[serde(default)]
    pub e2_interface_config: BTreeMap<String, String>,
    #[serde(default)]
    pub deployment_options: serde_json::Value,
}

impl From<Configuration> for ConfigDocument {
    fn from(config: Configuration) -> Self {
        let ric_type = config.ric_type();
        // Option structs hold only strings and bools.
        let deployment_options = config
            .deployment_options
            .to_value()
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()));
        ConfigDocument {
            ric_type,
            ric_ip: config.ric_ip,
            ric_port: config.ric_port,
            gnb_ip: config.gnb_ip,
            gnb_port: config.gnb_port,
            core_ip: config.core_ip,
            core_type: config.core_type,
            install_dir: config.install_dir,
            config_dir: config.config_dir,
            use_existing_core: config.use_existing_core,
            use_existing_gnb: config.use_existing_gnb,
            e2_interface_config: config.e2_interface_config,
            deployment_options,
        }
    }
}

impl TryFrom<ConfigDocument> for Configuration {
    type Error = DeployError;

    fn try_from(doc: ConfigDocument) -> Result<Self, Self::Error> {
        let deployment_options =
            DeploymentOptions::from_value(doc.ric_type, doc.deployment_options)?;
        Ok(Configuration {
            ric_ip: doc.ric_ip,
            ric_port: doc.ric_port,
            gnb_ip: doc.gnb_ip,
            gnb_port: doc.gnb_port,
            core_ip: doc.core_ip,
            core_type: doc.core_type,
            install_dir: doc.install_dir,
            config_dir: doc.config_dir,
            use_existing_core: doc.use_existing_core,
            use_existing_gnb: doc.use_existing_gnb,
            e2_interface_config: doc.e2_interface_config,
            deployment_options,
        })
    }
}
