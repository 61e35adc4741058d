//! Error types for the skill guard.

use std::path::PathBuf;

/// Skill-guard errors.
///
/// Only failures around the approved list and configuration surface here.
/// Metadata, cache-read and cache-write failures are absorbed where they
/// happen and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("no approved skill list available: {reason}")]
    ListUnavailable { reason: String },

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("invalid source document envelope: {0}")]
    InvalidEnvelope(String),

    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration in `{path}`: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("install command failed for skill `{skill}`: {reason}")]
    InstallFailed { skill: String, reason: String },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SkillError>;
