//! RIC Deploy - interactive RIC deployment script generator
//!
//! The `ric-deploy` command collects network and deployment parameters for a
//! near-RT RIC, writes a deployment script and optionally runs it.
//!
//! ## Commands
//!
//! - `wizard` (default): interactive collection, save, generate, execute
//! - `render`: re-render a script from a saved configuration
//! - `run`: execute an existing script with streamed output
//! - `validate`: check a single IP or port value

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ric_deploy_cli::commands::{cmd_render, cmd_run, cmd_validate, ValidateKind};
use ric_deploy_cli::{Prompter, Wizard};
use ric_deploy_core::telemetry::level_for;
use ric_deploy_core::{Supervisor, SupervisorConfig};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "ric-deploy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive RIC deployment script generator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true, env = "RIC_DEPLOY_LOG_JSON")]
    json: bool,

    /// Shell used to execute deployment scripts (default: $RIC_DEPLOY_SHELL or /bin/bash)
    #[arg(long, global = true)]
    shell: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect a configuration interactively, then generate and run the script
    Wizard,

    /// Render the deployment script for a saved configuration
    Render {
        /// Path to ric_deployment_config.json
        #[arg(short, long)]
        config: PathBuf,

        /// Write the script here (mode 0755) instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Execute a deployment script, streaming its output
    Run {
        /// Script to execute
        script: PathBuf,
    },

    /// Validate a single value
    Validate {
        /// Kind of value
        #[arg(value_enum)]
        kind: ValidateKind,

        /// Value to check
        value: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    ric_deploy_core::init_tracing(cli.json, level_for(cli.verbose));

    let supervisor = Supervisor::new(match cli.shell {
        Some(shell) => SupervisorConfig { shell },
        None => SupervisorConfig::from_env(),
    });
    debug!(shell = %supervisor.config().shell.display(), "supervisor configured");

    match cli.command.unwrap_or(Commands::Wizard) {
        Commands::Wizard => cmd_wizard(supervisor).await,
        Commands::Render { config, output } => {
            let mut stdout = io::stdout().lock();
            cmd_render(&config, output.as_deref(), &mut stdout)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { script } => {
            let mut stdout = io::stdout();
            let code = cmd_run(&supervisor, &script, &mut stdout).await?;
            Ok(ExitCode::from(code))
        }
        Commands::Validate { kind, value } => {
            let ok = cmd_validate(kind, &value);
            println!("{}", if ok { "valid" } else { "invalid" });
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

async fn cmd_wizard(supervisor: Supervisor) -> Result<ExitCode> {
    if running_as_root() {
        warn!("running as root is not recommended");
    }

    let stdin = io::stdin().lock();
    let stdout = io::stdout();
    let mut wizard = Wizard::new(Prompter::new(stdin, stdout), supervisor);
    let outcome = wizard.run().await?;
    debug!(?outcome, "wizard finished");
    Ok(ExitCode::from(outcome.exit_code()))
}

#[cfg(unix)]
fn running_as_root() -> bool {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata("/proc/self")
        .map(|m| m.uid() == 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}
