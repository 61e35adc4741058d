//! Skill guard configuration.
//!
//! Values are resolved once at startup and injected into the
//! [`Validator`](crate::Validator):
//!
//! 1. built-in defaults,
//! 2. the `[skills]` table of a TOML file (usually `config/default.toml`),
//! 3. environment variables (after `.env` has been loaded by the binary).
//!
//! ```toml
//! [skills]
//! source_url = "https://api.github.com/repos/ironclaw-supreme/community-skills/contents/APPROVED_SKILLS.md"
//! cache_ttl_secs = 3600
//! install_command = "clawhub install {name}"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SkillError};

/// Default approved-list document (GitHub contents API).
pub const DEFAULT_SOURCE_URL: &str = "https://api.github.com/repos/ironclaw-supreme/community-skills/contents/APPROVED_SKILLS.md";

/// Default repository metadata API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default cache time-to-live (one hour).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default bound on a single HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Runtime configuration for the skill guard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkillGuardConfig {
    /// URL of the approved-list document envelope.
    pub source_url: String,

    /// Base URL of the repository metadata API.
    pub api_base_url: String,

    /// Where the approved-list snapshot is cached.
    pub cache_path: PathBuf,

    /// Where audit lines are appended.
    pub audit_path: PathBuf,

    /// How long a cached list is considered fresh.
    pub cache_ttl_secs: u64,

    /// Per-request timeout.
    pub request_timeout_secs: u64,

    /// `User-Agent` sent with every request.
    pub user_agent: String,

    /// Optional API token to lift anonymous rate limits.
    pub github_token: Option<String>,

    /// Command run after a confirmed approval. Supports `{name}`, `{owner}`,
    /// `{repo}` and `{url}` placeholders.
    pub install_command: Option<String>,
}

impl Default for SkillGuardConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            cache_path: PathBuf::from("data/approved-skills-cache.json"),
            audit_path: PathBuf::from("logs/skill-installs.log"),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("IronClaw-Skill-Validator/{}", env!("CARGO_PKG_VERSION")),
            github_token: None,
            install_command: None,
        }
    }
}

/// Top-level file layout; only the `[skills]` table is ours.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    skills: Option<SkillGuardConfig>,
}

impl SkillGuardConfig {
    /// Resolve configuration from `path` (if it exists) and the process
    /// environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read the `[skills]` table from a TOML file. A missing file yields
    /// defaults; a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_toml_str(&content).map_err(|reason| SkillError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| e.to_string())?;
        Ok(file.skills.unwrap_or_default())
    }

    /// Overlay environment variables looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("IRONCLAW_SKILLS_SOURCE_URL") {
            self.source_url = v;
        }
        if let Some(v) = non_empty("IRONCLAW_GITHUB_API") {
            self.api_base_url = v;
        }
        if let Some(v) = non_empty("IRONCLAW_SKILLS_CACHE") {
            self.cache_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty("IRONCLAW_SKILLS_AUDIT_LOG") {
            self.audit_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty("IRONCLAW_SKILLS_CACHE_TTL") {
            match v.trim().parse() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid IRONCLAW_SKILLS_CACHE_TTL"),
            }
        }
        if let Some(v) = non_empty("IRONCLAW_SKILLS_INSTALL_CMD") {
            self.install_command = Some(v);
        }
        if let Some(v) = non_empty("GITHUB_TOKEN") {
            self.github_token = Some(v);
        }
    }

    /// Cache time-to-live as a chrono duration.
    pub fn cache_ttl(&self) -> chrono::Duration {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Request timeout as a std duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
