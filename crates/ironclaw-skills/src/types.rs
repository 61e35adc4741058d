//! Value types shared across the skill guard.
//!
//! Everything here is an immutable snapshot: entries are rebuilt on every
//! successful parse of the approved list, metadata is fetched per call and
//! scores are recomputed every time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candidate skill found in the approved-list document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Lowercased, trimmed link label (e.g. `weather-forecast`).
    pub name: String,

    /// Repository owner (first path segment after the host).
    pub owner: String,

    /// Repository name with any trailing `.git` removed.
    pub repo: String,

    /// Canonical `https://<host>/<owner>/<repo>` URL.
    pub url: String,
}

/// An ordered snapshot of approved skills and the moment it was fetched.
///
/// Entries are not de-duplicated; lookups take the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedList {
    pub fetched_at: DateTime<Utc>,
    pub entries: Vec<SkillEntry>,
}

/// Repository metadata as reported by the hosting API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoMetadata {
    /// Star count. `None` means the primary trust signal is missing.
    pub stars: Option<u64>,

    /// Fork count.
    pub forks: Option<u64>,

    /// Last time the repository was updated.
    pub updated_at: Option<DateTime<Utc>>,

    /// Repository description, if any.
    pub description: Option<String>,

    /// Whether the repository declares a license.
    pub has_license: bool,
}

/// A bounded safety score in `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SafetyScore(u8);

impl SafetyScore {
    /// Highest possible score.
    pub const MAX: u8 = 10;

    /// Build a score, clamping to [`SafetyScore::MAX`].
    pub fn new(points: u8) -> Self {
        Self(points.min(Self::MAX))
    }

    /// The raw score value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Coarse trust bucket for display.
    pub fn trust_level(self) -> TrustLevel {
        match self.0 {
            7.. => TrustLevel::High,
            4..=6 => TrustLevel::Moderate,
            _ => TrustLevel::Low,
        }
    }
}

impl fmt::Display for SafetyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Display bucket derived from a [`SafetyScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    High,
    Moderate,
    Low,
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Moderate => write!(f, "moderate"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Answer to "is skill X approved, and how safe does it look?".
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Whether the skill appears on the approved list.
    pub approved: bool,

    /// The matching entry, when approved.
    pub skill: Option<SkillEntry>,

    /// Human-readable explanation.
    pub reason: String,

    /// Safety score, when approved.
    pub safety_score: Option<SafetyScore>,

    /// Metadata the score was computed from, when it could be fetched.
    pub metadata: Option<RepoMetadata>,
}

impl ValidationResult {
    /// A negative result with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            skill: None,
            reason: reason.into(),
            safety_score: None,
            metadata: None,
        }
    }
}

/// Outcome column of an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    /// Operator confirmed the install.
    Approved,
    /// Skill is not on the approved list.
    Rejected,
    /// Operator declined the install.
    Declined,
    /// Validation or install failed.
    Error,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Declined => write!(f, "DECLINED"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub skill_name: String,
    pub outcome: AuditOutcome,
    pub reason: String,
    pub user_confirmed: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
