//! Append-only audit trail of validation and install decisions.
//!
//! One line per decision:
//!
//! ```text
//! 2026-10-16T09:12:44.105Z | weather-forecast | APPROVED | Installed after review | User: true
//! ```
//!
//! The log is only ever appended to. Rotation is left to the host.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use crate::error::Result;
use crate::types::AuditRecord;

/// File-backed audit log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and its parent directory.
    pub fn record(&self, record: &AuditRecord) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(record))?;

        tracing::debug!(
            skill = %record.skill_name,
            outcome = %record.outcome,
            "audit record written"
        );
        Ok(())
    }

    /// Return up to `limit` most recent lines, oldest first.
    pub fn read_recent(&self, limit: usize) -> Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();
        let start = lines.len().saturating_sub(limit);
        Ok(lines[start..].iter().map(|l| (*l).to_owned()).collect())
    }
}

/// Render a record in the audit line format.
pub fn format_line(record: &AuditRecord) -> String {
    format!(
        "{} | {} | {} | {} | User: {}",
        record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        sanitize_field(&record.skill_name),
        record.outcome,
        sanitize_field(&record.reason),
        record.user_confirmed,
    )
}

/// Keep caller-supplied text inside its own column: line breaks would split
/// one decision across lines and `|` would add columns.
fn sanitize_field(value: &str) -> String {
    value.replace(['\n', '\r'], " ").replace('|', "/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
