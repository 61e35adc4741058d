//! CLI argument definitions for the skill guard.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// IronClaw skill guard -- validate community skills before installing them.
#[derive(Parser)]
#[command(
    name = "ironclaw-skills",
    version,
    about = "IronClaw skill guard -- validate community skills before installing them",
    long_about = "Checks a community skill against the maintainer-approved list, scores its \
                  repository, asks for confirmation and records the decision in the audit log.\n\n\
                  Exit code 0 means the skill was approved and the install confirmed; any \
                  rejection, decline or error exits with 1."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Skill to validate (shorthand for `check <SKILL>`).
    pub skill: Option<String>,

    /// Confirm the install without prompting.
    #[arg(long, short)]
    pub yes: bool,

    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log progress at info level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a skill and, once confirmed, install it.
    Check {
        /// Skill name or repository name.
        skill: String,

        /// Confirm the install without prompting.
        #[arg(long, short)]
        yes: bool,
    },

    /// Print the approved skill list.
    List,

    /// Re-fetch the approved list, ignoring the cache age.
    Refresh,

    /// Print recent audit log entries.
    Audit {
        /// Maximum number of entries to show.
        #[arg(long, short, default_value_t = 20)]
        limit: usize,
    },
}
