//! Skill validator — answers "is skill X approved, and how safe does it look?".
//!
//! The approved list is resolved through a small state machine:
//!
//! ```text
//! CheckCache ──fresh──────────────────────────────▶ cached entries
//!     │ stale / absent
//!     ▼
//! FetchRemote ──ok──▶ extract ──▶ save ───────────▶ remote entries
//!     │ any error
//!     ▼
//! FallbackStale ──any cache──▶ cached entries (warn)
//!     │ none
//!     ▼
//! ListUnavailable
//! ```
//!
//! Failures around the list propagate because nothing can be validated
//! without it. Failures around repository metadata only lower the soft
//! score and are absorbed.

use std::sync::Arc;

use crate::audit::AuditLog;
use crate::cache::{ApprovalCache, ApprovalStore, FileStore};
use crate::clock::{Clock, SystemClock};
use crate::config::SkillGuardConfig;
use crate::error::{Result, SkillError};
use crate::extractor::extract_entries;
use crate::metadata::MetadataFetcher;
use crate::scorer::safety_score;
use crate::source::fetch_source_document;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    ApprovedList, AuditOutcome, AuditRecord, SkillEntry, ValidationResult,
};

/// Reason recorded when a skill is not on the approved list.
pub const NOT_FOUND_REASON: &str = "Not found in approved repository";

/// Reason returned for an approved skill.
pub const FOUND_REASON: &str = "Found in approved repository";

/// Orchestrates cache, remote fetch, extraction, scoring and auditing.
pub struct Validator {
    source_url: String,
    transport: Arc<dyn HttpTransport>,
    cache: ApprovalCache,
    metadata: MetadataFetcher,
    audit: AuditLog,
    clock: Arc<dyn Clock>,
}

impl Validator {
    /// Build a validator from injected collaborators.
    pub fn new(
        config: &SkillGuardConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn ApprovalStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source_url: config.source_url.clone(),
            cache: ApprovalCache::new(store, config.cache_ttl()),
            metadata: MetadataFetcher::new(&config.api_base_url, Arc::clone(&transport)),
            audit: AuditLog::new(&config.audit_path),
            transport,
            clock,
        }
    }

    /// Production wiring: `reqwest` transport, file-backed cache, wall clock.
    pub fn from_config(config: &SkillGuardConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(
            &config.user_agent,
            config.request_timeout(),
            config.github_token.clone(),
        ));
        let store = Arc::new(FileStore::new(&config.cache_path));
        Self::new(config, transport, store, Arc::new(SystemClock))
    }

    /// The audit log decisions are written to.
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Resolve the approved list, preferring a fresh cache.
    pub async fn fetch_approved_skills(&self) -> Result<ApprovedList> {
        let cached = self.cache.load();

        if let Some(list) = &cached
            && self.cache.is_fresh(list, self.clock.now())
        {
            tracing::debug!(entries = list.entries.len(), "using fresh approval cache");
            return Ok(list.clone());
        }

        self.fetch_or_fallback(cached).await
    }

    /// Resolve the approved list from the remote source, ignoring freshness.
    ///
    /// Still falls back to any cached list if the remote fetch fails.
    pub async fn refresh_approved_skills(&self) -> Result<ApprovedList> {
        let cached = self.cache.load();
        self.fetch_or_fallback(cached).await
    }

    async fn fetch_or_fallback(&self, cached: Option<ApprovedList>) -> Result<ApprovedList> {
        match self.fetch_remote().await {
            Ok(entries) => {
                tracing::info!(entries = entries.len(), "fetched approved skill list");
                Ok(self.cache.save(entries, self.clock.now()))
            }
            Err(e) => match cached {
                Some(list) => {
                    tracing::warn!(
                        error = %e,
                        fetched_at = %list.fetched_at,
                        "approved list fetch failed, using cached copy"
                    );
                    Ok(list)
                }
                None => Err(SkillError::ListUnavailable {
                    reason: e.to_string(),
                }),
            },
        }
    }

    async fn fetch_remote(&self) -> Result<Vec<SkillEntry>> {
        tracing::debug!(url = %self.source_url, "fetching approved skill list");
        let document = fetch_source_document(self.transport.as_ref(), &self.source_url).await?;
        Ok(extract_entries(&document).collect())
    }

    /// Check whether `name` is approved and score its repository.
    ///
    /// Rejections are written to the audit log here; approvals are audited
    /// later through [`Validator::record_decision`] once the operator decides.
    pub async fn validate_skill(&self, name: &str) -> Result<ValidationResult> {
        let name = normalize_name(name);
        if name.is_empty() {
            let result = ValidationResult::rejected("Skill name is empty");
            self.record_decision(&name, AuditOutcome::Rejected, &result.reason, false);
            return Ok(result);
        }

        let list = self.fetch_approved_skills().await?;

        let Some(skill) = find_skill(&list.entries, &name).cloned() else {
            tracing::info!(skill = %name, "skill rejected");
            self.record_decision(&name, AuditOutcome::Rejected, NOT_FOUND_REASON, false);
            return Ok(ValidationResult::rejected(NOT_FOUND_REASON));
        };

        let metadata = self.metadata.fetch(&skill.owner, &skill.repo).await;
        let score = safety_score(metadata.as_ref(), self.clock.now());

        tracing::info!(
            skill = %name,
            owner = %skill.owner,
            repo = %skill.repo,
            score = score.value(),
            "skill approved"
        );

        Ok(ValidationResult {
            approved: true,
            skill: Some(skill),
            reason: FOUND_REASON.to_owned(),
            safety_score: Some(score),
            metadata,
        })
    }

    /// Append a decision to the audit log. Write failures are logged only.
    pub fn record_decision(
        &self,
        skill_name: &str,
        outcome: AuditOutcome,
        reason: &str,
        user_confirmed: bool,
    ) {
        let record = AuditRecord {
            timestamp: self.clock.now(),
            skill_name: skill_name.to_owned(),
            outcome,
            reason: reason.to_owned(),
            user_confirmed,
        };
        if let Err(e) = self.audit.record(&record) {
            tracing::warn!(
                skill = %skill_name,
                outcome = %outcome,
                error = %e,
                "failed to write audit record"
            );
        }
    }
}

/// Lowercase and trim a user-supplied skill name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Find the first entry matching an already-normalized `name`.
///
/// An entry matches on exact name, on repository name (case-insensitive), or
/// when its repository name as written contains `name`. Entries are tried in
/// document order and the first one satisfying any rule wins, so a partial
/// query can select a repository that merely contains it.
pub fn find_skill<'a>(entries: &'a [SkillEntry], name: &str) -> Option<&'a SkillEntry> {
    entries.iter().find(|entry| {
        entry.name == name || entry.repo.to_lowercase() == name || entry.repo.contains(name)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
