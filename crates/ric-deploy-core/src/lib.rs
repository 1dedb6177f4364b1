//! RIC Deploy Core
//!
//! Turns a validated set of network and deployment parameters into a
//! runnable shell script for one of several near-RT RIC flavors, persists
//! the parameters, and supervises execution of the script.
//!
//! ## Components
//!
//! - [`validate`]: IP, port and directory predicates
//! - [`config`] / [`draft`]: the configuration model and its collection
//! - [`template`]: per-flavor script synthesis
//! - [`persist`]: JSON document and script artifact on disk
//! - [`supervisor`]: child process execution with streamed output

pub mod config;
pub mod draft;
pub mod error;
pub mod obs;
pub mod persist;
pub mod supervisor;
pub mod telemetry;
pub mod template;
pub mod validate;

pub use config::{
    default_config_dir, default_install_dir, ConfigDocument, Configuration, CoreType,
    CustomOptions, DeploymentOptions, FlexRicOptions, OaiE2Options, OranScOptions, RicType,
    ServiceModels,
};
pub use draft::ConfigurationDraft;
pub use error::{DeployError, Result};
pub use persist::{
    load, load_from_dir, save, script_path, write_script, write_script_to, CONFIG_FILE_NAME,
    SCRIPT_FILE_NAME,
};
pub use supervisor::{ExecutionResult, Supervisor, SupervisorConfig};
pub use telemetry::init_tracing;
pub use template::{render, script_digest, Script, ScriptBlock};
pub use validate::{ensure_directory, validate_directory, validate_ip, validate_port};
