//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use ironclaw_skills::{
    AuditOutcome, SkillGuardConfig, ValidationResult, Validator, normalize_name, run_install,
};

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

/// Validate `name`, confirm with the operator, run the install hook and
/// audit the decision.
///
/// The confirmation answer is read from `answers`.
pub async fn cmd_check(
    validator: &Validator,
    config: &SkillGuardConfig,
    name: &str,
    assume_yes: bool,
    answers: &mut dyn BufRead,
) -> Result<ExitCode> {
    let skill_name = normalize_name(name);

    let result = match validator.validate_skill(&skill_name).await {
        Ok(r) => r,
        Err(e) => {
            validator.record_decision(&skill_name, AuditOutcome::Error, &e.to_string(), false);
            return Err(e).context("skill validation failed");
        }
    };

    let Some(skill) = result.skill.clone().filter(|_| result.approved) else {
        println!();
        println!("  [x] `{skill_name}` is not approved: {}", result.reason);
        println!("      Only skills on the approved list can be installed.");
        println!();
        return Ok(ExitCode::FAILURE);
    };

    print_report(&result);

    let confirmed = if assume_yes {
        true
    } else {
        match confirm(answers, &mut io::stdout(), "Install this skill?") {
            Ok(answer) => answer,
            Err(e) => {
                validator.record_decision(&skill_name, AuditOutcome::Error, &e.to_string(), false);
                return Err(e);
            }
        }
    };

    if !confirmed {
        validator.record_decision(
            &skill_name,
            AuditOutcome::Declined,
            "User declined installation",
            false,
        );
        println!("  Skipped.");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(template) = &config.install_command
        && let Err(e) = run_install(template, &skill).await
    {
        validator.record_decision(&skill_name, AuditOutcome::Error, &e.to_string(), true);
        return Err(e).context("install failed");
    }

    let score = result
        .safety_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "n/a".to_owned());
    validator.record_decision(
        &skill_name,
        AuditOutcome::Approved,
        &format!("Approved from {} (safety {score})", skill.url),
        true,
    );

    println!("  [+] `{}` approved.", skill.name);
    if config.install_command.is_none() {
        println!("      No install command configured; install it from {}", skill.url);
    }
    println!();
    Ok(ExitCode::SUCCESS)
}

fn print_report(result: &ValidationResult) {
    let Some(skill) = &result.skill else {
        return;
    };

    println!();
    println!("  [+] `{}` is on the approved list", skill.name);
    println!("      Repository:   {}/{}", skill.owner, skill.repo);
    println!("      URL:          {}", skill.url);

    match &result.metadata {
        Some(meta) => {
            let count = |v: Option<u64>| v.map_or_else(|| "?".to_owned(), |n| n.to_string());
            println!("      Stars:        {}", count(meta.stars));
            println!("      Forks:        {}", count(meta.forks));
            if let Some(updated) = meta.updated_at {
                let days = (Utc::now() - updated).num_days().max(0);
                println!("      Last update:  {days} days ago");
            }
            println!(
                "      License:      {}",
                if meta.has_license { "yes" } else { "none" }
            );
            if let Some(desc) = meta.description.as_deref().filter(|d| !d.is_empty()) {
                println!("      Description:  {desc}");
            }
        }
        None => println!("      Metadata:     unavailable"),
    }

    if let Some(score) = result.safety_score {
        println!("      Safety score: {score} ({} trust)", score.trust_level());
    }
    println!();
}

/// Ask a yes/no question. Anything but `y`/`yes` (including EOF) is a no.
pub fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, question: &str) -> Result<bool> {
    write!(out, "  {question} [y/N]: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("failed to read answer")?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

// ---------------------------------------------------------------------------
// list / refresh
// ---------------------------------------------------------------------------

pub async fn cmd_list(validator: &Validator) -> Result<ExitCode> {
    let list = validator
        .fetch_approved_skills()
        .await
        .context("failed to load approved skills")?;

    println!();
    println!(
        "  Approved skills ({}, fetched {})",
        list.entries.len(),
        list.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();
    for entry in &list.entries {
        println!("    {:<28} {}", entry.name, entry.url);
    }
    println!();
    Ok(ExitCode::SUCCESS)
}

pub async fn cmd_refresh(validator: &Validator) -> Result<ExitCode> {
    let list = validator
        .refresh_approved_skills()
        .await
        .context("failed to refresh approved skills")?;

    println!(
        "  {} approved skills (as of {})",
        list.entries.len(),
        list.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// audit
// ---------------------------------------------------------------------------

pub fn cmd_audit(validator: &Validator, limit: usize) -> Result<ExitCode> {
    let log = validator.audit_log();
    let lines = log
        .read_recent(limit)
        .with_context(|| format!("failed to read {}", log.path().display()))?;

    if lines.is_empty() {
        println!("  No audit entries in {}", log.path().display());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
