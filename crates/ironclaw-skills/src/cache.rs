//! Approval cache: a time-boxed snapshot of the last parsed approved list.
//!
//! The cache is an optimization and a fallback, never a source of errors.
//! Unreadable or corrupt snapshots read as "no cache"; failed writes are
//! logged and dropped. Stale snapshots are kept so the validator can fall
//! back to them when the remote list cannot be fetched.
//!
//! On disk the snapshot is a single JSON document:
//!
//! ```json
//! { "timestamp": 1760000000000, "skills": [ { "name": "...", ... } ] }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ApprovedList, SkillEntry};

// ── storage backends ─────────────────────────────────────────────────

/// Durable storage for a single approved-list snapshot.
pub trait ApprovalStore: Send + Sync {
    /// Read the stored snapshot. `Ok(None)` means nothing was ever written.
    fn read(&self) -> Result<Option<ApprovedList>>;

    /// Replace the stored snapshot.
    fn write(&self, list: &ApprovedList) -> Result<()>;
}

/// Serialized form of a snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    /// Fetch time in epoch milliseconds.
    timestamp: i64,
    skills: Vec<SkillEntry>,
}

/// Snapshot stored as a JSON file.
///
/// No lock is taken; concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ApprovalStore for FileStore {
    fn read(&self) -> Result<Option<ApprovedList>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: CacheFile = serde_json::from_str(&content)?;
        let Some(fetched_at) = DateTime::from_timestamp_millis(file.timestamp) else {
            tracing::warn!(
                path = %self.path.display(),
                timestamp = file.timestamp,
                "cache timestamp out of range"
            );
            return Ok(None);
        };

        Ok(Some(ApprovedList {
            fetched_at,
            entries: file.skills,
        }))
    }

    fn write(&self, list: &ApprovedList) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = CacheFile {
            timestamp: list.fetched_at.timestamp_millis(),
            skills: list.entries.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// In-process snapshot, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<ApprovedList>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the stored snapshot, as if it had never been written.
    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl ApprovalStore for MemoryStore {
    fn read(&self) -> Result<Option<ApprovedList>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn write(&self, list: &ApprovedList) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(list.clone());
        Ok(())
    }
}

// ── cache ────────────────────────────────────────────────────────────

/// Freshness-aware front for an [`ApprovalStore`].
#[derive(Clone)]
pub struct ApprovalCache {
    store: Arc<dyn ApprovalStore>,
    ttl: Duration,
}

impl ApprovalCache {
    pub fn new(store: Arc<dyn ApprovalStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Load the last snapshot, fresh or stale. Read failures count as absent.
    pub fn load(&self) -> Option<ApprovedList> {
        match self.store.read() {
            Ok(Some(list)) => {
                tracing::debug!(
                    entries = list.entries.len(),
                    fetched_at = %list.fetched_at,
                    "approval cache loaded"
                );
                Some(list)
            }
            Ok(None) => {
                tracing::debug!("approval cache empty");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "approval cache unreadable, ignoring");
                None
            }
        }
    }

    /// Persist `entries` as fetched at `now` and return the snapshot.
    ///
    /// A failed write is logged; the returned snapshot is usable regardless.
    pub fn save(&self, entries: Vec<SkillEntry>, now: DateTime<Utc>) -> ApprovedList {
        let list = ApprovedList {
            fetched_at: now,
            entries,
        };
        match self.store.write(&list) {
            Ok(()) => tracing::debug!(entries = list.entries.len(), "approval cache saved"),
            Err(e) => tracing::warn!(error = %e, "failed to write approval cache"),
        }
        list
    }

    /// Whether `list` is younger than the TTL at `now`.
    pub fn is_fresh(&self, list: &ApprovedList, now: DateTime<Utc>) -> bool {
        now - list.fetched_at < self.ttl
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
