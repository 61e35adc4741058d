//! Post-approval install hook.
//!
//! After the operator confirms an approved skill, the configured install
//! command template is rendered and run through `sh -c`. Placeholder values
//! come from the approved list and are single-quoted before substitution.

use std::time::Duration;

use crate::error::{Result, SkillError};
use crate::types::SkillEntry;

/// Upper bound on a single install run.
pub const INSTALL_TIMEOUT_SECS: u64 = 300;

/// Render `template`, replacing `{name}`, `{owner}`, `{repo}` and `{url}`.
pub fn render_command(template: &str, skill: &SkillEntry) -> String {
    template
        .replace("{name}", &shell_quote(&skill.name))
        .replace("{owner}", &shell_quote(&skill.owner))
        .replace("{repo}", &shell_quote(&skill.repo))
        .replace("{url}", &shell_quote(&skill.url))
}

/// Quote `value` for POSIX `sh`.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Run the rendered install command, inheriting stdio so the operator sees
/// its progress.
pub async fn run_install(template: &str, skill: &SkillEntry) -> Result<()> {
    let command = render_command(template, skill);
    tracing::info!(skill = %skill.name, command = %command, "running install command");

    let mut child = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&command)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SkillError::InstallFailed {
            skill: skill.name.clone(),
            reason: format!("failed to spawn process: {e}"),
        })?;

    let status = tokio::time::timeout(Duration::from_secs(INSTALL_TIMEOUT_SECS), child.wait())
        .await
        .map_err(|_| SkillError::InstallFailed {
            skill: skill.name.clone(),
            reason: format!("timed out after {INSTALL_TIMEOUT_SECS}s"),
        })?
        .map_err(|e| SkillError::InstallFailed {
            skill: skill.name.clone(),
            reason: format!("process error: {e}"),
        })?;

    if !status.success() {
        return Err(SkillError::InstallFailed {
            skill: skill.name.clone(),
            reason: format!("exited with {status}"),
        });
    }

    tracing::info!(skill = %skill.name, "install command completed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
