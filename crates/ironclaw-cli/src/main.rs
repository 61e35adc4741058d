//! CLI entry point for the IronClaw skill guard.
//!
//! `ironclaw-skills <skill>` validates a community skill against the approved
//! list, shows its safety score and asks before installing. The exit code is
//! authoritative: 0 for a confirmed install, 1 for anything else.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ironclaw_skills::{SkillGuardConfig, Validator};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(if cli.verbose { "info" } else { "warn" });

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("  Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = SkillGuardConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    let validator = Validator::from_config(&config);
    let stdin = std::io::stdin();
    let mut answers = stdin.lock();

    match (cli.command, cli.skill) {
        (Some(Commands::Check { skill, yes }), _) => {
            commands::cmd_check(&validator, &config, &skill, yes || cli.yes, &mut answers).await
        }
        (Some(Commands::List), _) => commands::cmd_list(&validator).await,
        (Some(Commands::Refresh), _) => commands::cmd_refresh(&validator).await,
        (Some(Commands::Audit { limit }), _) => commands::cmd_audit(&validator, limit),
        (None, Some(skill)) => {
            commands::cmd_check(&validator, &config, &skill, cli.yes, &mut answers).await
        }
        (None, None) => {
            eprintln!("  Usage: ironclaw-skills <SKILL>  (see --help)");
            Ok(ExitCode::FAILURE)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
