//! Driver for the `ric-deploy` binary: prompting, the interactive wizard and
//! the non-interactive subcommands.

pub mod commands;
pub mod prompt;
pub mod wizard;

pub use prompt::Prompter;
pub use wizard::{Wizard, WizardOutcome};
