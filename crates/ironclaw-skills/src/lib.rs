//! Community skill guard for IronClaw Supreme.
//!
//! Before a community skill is installed, the guard checks it against a
//! maintainer-curated allowlist and scores how trustworthy its repository
//! looks.
//!
//! This crate provides:
//!
//! - **Extractor**: pulls `[name](https://host/owner/repo)` entries out of
//!   the approved-list markdown document.
//!
//! - **Approval cache**: a time-boxed snapshot of the last parsed list,
//!   used as a stale fallback when the remote list is unreachable.
//!
//! - **Metadata fetcher and scorer**: turns repository stars, forks,
//!   recency, description and license into a `0..=10` safety score.
//!
//! - **Validator**: orchestrates the above and records every decision in an
//!   append-only audit log.
//!
//! # Example
//!
//! ```rust,no_run
//! use ironclaw_skills::{SkillGuardConfig, Validator};
//! use std::path::Path;
//!
//! # async fn run() -> ironclaw_skills::Result<()> {
//! let config = SkillGuardConfig::load(Path::new("config/default.toml"))?;
//! let validator = Validator::from_config(&config);
//!
//! let result = validator.validate_skill("weather-forecast").await?;
//! if let Some(score) = result.safety_score {
//!     println!("approved, safety {score}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod extractor;
pub mod installer;
pub mod metadata;
pub mod scorer;
pub mod source;
pub mod transport;
pub mod types;
pub mod validator;

pub use audit::AuditLog;
pub use cache::{ApprovalCache, ApprovalStore, FileStore, MemoryStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SkillGuardConfig;
pub use error::{Result, SkillError};
pub use extractor::extract_entries;
pub use installer::run_install;
pub use metadata::MetadataFetcher;
pub use scorer::safety_score;
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
pub use types::{
    ApprovedList, AuditOutcome, AuditRecord, RepoMetadata, SafetyScore, SkillEntry, TrustLevel,
    ValidationResult,
};
pub use validator::{NOT_FOUND_REASON, Validator, find_skill, normalize_name};
