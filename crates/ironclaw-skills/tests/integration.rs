//! Integration tests for the ironclaw-skills crate.
//!
//! These tests drive the validator end-to-end against a scripted transport,
//! a manual clock and real cache/audit files on disk (via tempfile).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use ironclaw_skills::{
    ApprovalStore, AuditOutcome, FileStore, HttpTransport, ManualClock, MemoryStore, Result,
    SkillError, SkillGuardConfig, TransportResponse, Validator,
};

const SOURCE_URL: &str = "https://api.test/repos/ironclaw/skills/contents/APPROVED_SKILLS.md";
const API_BASE: &str = "https://api.test";

const APPROVED_DOC: &str = "\
# Approved Community Skills

- [weather-forecast](https://github.com/weather-dev/openclaw-weather)
- [todoist](https://github.com/acme/openclaw-todoist.git)
- [tasks](https://github.com/acme/openclaw-tasks)
";

// ═══════════════════════════════════════════════════════════════════════
//  Test doubles
// ═══════════════════════════════════════════════════════════════════════

/// Transport that serves canned responses per URL and counts requests.
#[derive(Default)]
struct ScriptedTransport {
    routes: Mutex<HashMap<String, Option<TransportResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
        self.routes.lock().unwrap().insert(
            url.to_owned(),
            Some(TransportResponse {
                status,
                body: body.into(),
            }),
        );
    }

    /// Make `url` fail as if the network were down.
    fn fail(&self, url: &str) {
        self.routes.lock().unwrap().insert(url.to_owned(), None);
    }

    fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        self.calls.lock().unwrap().push(url.to_owned());
        match self.routes.lock().unwrap().get(url) {
            Some(Some(response)) => Ok(response.clone()),
            _ => Err(SkillError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("connection refused: {url}"),
            ))),
        }
    }
}

fn envelope(text: &str) -> String {
    serde_json::json!({ "content": STANDARD.encode(text), "encoding": "base64" }).to_string()
}

fn start_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-16T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

struct Harness {
    _dir: tempfile::TempDir,
    config: SkillGuardConfig,
    transport: Arc<ScriptedTransport>,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = SkillGuardConfig {
            source_url: SOURCE_URL.to_owned(),
            api_base_url: API_BASE.to_owned(),
            cache_path: dir.path().join("data").join("approved-skills-cache.json"),
            audit_path: dir.path().join("logs").join("skill-installs.log"),
            ..SkillGuardConfig::default()
        };
        let transport = Arc::new(ScriptedTransport::default());
        transport.respond(SOURCE_URL, 200, envelope(APPROVED_DOC));
        Self {
            _dir: dir,
            config,
            transport,
            clock: Arc::new(ManualClock::new(start_time())),
        }
    }

    fn validator_with(&self, store: Arc<dyn ApprovalStore>) -> Validator {
        Validator::new(
            &self.config,
            self.transport.clone(),
            store,
            self.clock.clone(),
        )
    }

    fn file_validator(&self) -> Validator {
        self.validator_with(Arc::new(FileStore::new(&self.config.cache_path)))
    }

    fn audit_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.config.audit_path)
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  fetch_approved_skills
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn remote_fetch_parses_and_persists() {
    let h = Harness::new();
    let validator = h.file_validator();

    let list = validator.fetch_approved_skills().await.unwrap();
    assert_eq!(list.entries.len(), 3);
    assert_eq!(list.entries[1].repo, "openclaw-todoist");
    assert_eq!(list.fetched_at, start_time());
    assert!(h.config.cache_path.exists());
}

#[tokio::test]
async fn fresh_cache_skips_remote_fetch() {
    let h = Harness::new();
    let validator = h.file_validator();

    let first = validator.fetch_approved_skills().await.unwrap();
    h.clock.advance(Duration::minutes(59));
    let second = validator.fetch_approved_skills().await.unwrap();

    assert_eq!(h.transport.calls_to(SOURCE_URL), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn expired_cache_triggers_remote_fetch() {
    let h = Harness::new();
    let validator = h.file_validator();

    validator.fetch_approved_skills().await.unwrap();
    h.clock.advance(Duration::hours(1));
    let list = validator.fetch_approved_skills().await.unwrap();

    assert_eq!(h.transport.calls_to(SOURCE_URL), 2);
    assert_eq!(list.fetched_at, start_time() + Duration::hours(1));
}

#[tokio::test]
async fn stale_cache_is_used_when_remote_fails() {
    let h = Harness::new();
    let validator = h.file_validator();

    let original = validator.fetch_approved_skills().await.unwrap();
    h.clock.advance(Duration::days(3));
    h.transport.fail(SOURCE_URL);

    let fallback = validator.fetch_approved_skills().await.unwrap();
    assert_eq!(fallback, original);
    assert_eq!(h.transport.calls_to(SOURCE_URL), 2);
}

#[tokio::test]
async fn non_success_status_falls_back_to_cache() {
    let h = Harness::new();
    let validator = h.file_validator();

    validator.fetch_approved_skills().await.unwrap();
    h.clock.advance(Duration::hours(2));
    h.transport.respond(SOURCE_URL, 503, "unavailable");

    let list = validator.fetch_approved_skills().await.unwrap();
    assert_eq!(list.entries.len(), 3);
}

#[tokio::test]
async fn no_cache_and_remote_failure_is_list_unavailable() {
    let h = Harness::new();
    h.transport.fail(SOURCE_URL);
    let validator = h.file_validator();

    let err = validator.fetch_approved_skills().await.unwrap_err();
    assert!(matches!(err, SkillError::ListUnavailable { .. }));
}

#[tokio::test]
async fn deleted_cache_and_remote_failure_is_list_unavailable() {
    let h = Harness::new();
    let store = Arc::new(MemoryStore::new());
    let validator = h.validator_with(store.clone());

    validator.fetch_approved_skills().await.unwrap();
    store.clear();
    h.clock.advance(Duration::hours(2));
    h.transport.respond(SOURCE_URL, 200, "not json");

    let err = validator.fetch_approved_skills().await.unwrap_err();
    assert!(matches!(err, SkillError::ListUnavailable { .. }));
}

#[tokio::test]
async fn corrupt_cache_file_is_treated_as_absent() {
    let h = Harness::new();
    std::fs::create_dir_all(h.config.cache_path.parent().unwrap()).unwrap();
    std::fs::write(&h.config.cache_path, "garbage").unwrap();
    let validator = h.file_validator();

    let list = validator.fetch_approved_skills().await.unwrap();
    assert_eq!(list.entries.len(), 3);
    assert_eq!(h.transport.calls_to(SOURCE_URL), 1);
}

#[tokio::test]
async fn refresh_bypasses_fresh_cache() {
    let h = Harness::new();
    let validator = h.file_validator();

    validator.fetch_approved_skills().await.unwrap();
    h.transport.respond(
        SOURCE_URL,
        200,
        envelope("- [only](https://github.com/o/only-skill)\n"),
    );

    let refreshed = validator.refresh_approved_skills().await.unwrap();
    assert_eq!(refreshed.entries.len(), 1);
    assert_eq!(h.transport.calls_to(SOURCE_URL), 2);
}

// ═══════════════════════════════════════════════════════════════════════
//  validate_skill
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn approved_skill_is_scored() {
    let h = Harness::new();
    let updated = (start_time() - Duration::days(10)).to_rfc3339();
    h.transport.respond(
        &format!("{API_BASE}/repos/weather-dev/openclaw-weather"),
        200,
        serde_json::json!({
            "stargazers_count": 150,
            "forks_count": 25,
            "updated_at": updated,
            "description": "Weather forecasts for IronClaw",
            "license": { "key": "mit" }
        })
        .to_string(),
    );
    let validator = h.file_validator();

    let result = validator.validate_skill("  Weather-Forecast ").await.unwrap();
    assert!(result.approved);
    assert_eq!(result.skill.as_ref().unwrap().owner, "weather-dev");
    assert!(result.safety_score.unwrap().value() >= 8);
    assert_eq!(result.metadata.unwrap().stars, Some(150));

    // Approvals are audited by the caller's decision, not here.
    assert!(h.audit_lines().is_empty());
}

#[tokio::test]
async fn metadata_failure_degrades_to_zero_score() {
    let h = Harness::new();
    h.transport.respond(
        &format!("{API_BASE}/repos/acme/openclaw-todoist"),
        404,
        r#"{"message":"Not Found"}"#,
    );
    let validator = h.file_validator();

    let result = validator.validate_skill("todoist").await.unwrap();
    assert!(result.approved);
    assert_eq!(result.safety_score.unwrap().value(), 0);
    assert!(result.metadata.is_none());
}

#[tokio::test]
async fn lookup_by_repo_name() {
    let h = Harness::new();
    let validator = h.file_validator();

    let result = validator.validate_skill("OpenClaw-Tasks").await.unwrap();
    assert!(result.approved);
    assert_eq!(result.skill.unwrap().name, "tasks");
}

#[tokio::test]
async fn unknown_skill_is_rejected_and_audited() {
    let h = Harness::new();
    let validator = h.file_validator();

    let result = validator.validate_skill("nonexistent-xyz").await.unwrap();
    assert!(!result.approved);
    assert!(result.reason.contains("Not found"));
    assert!(result.safety_score.is_none());

    let lines = h.audit_lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].ends_with(
            "| nonexistent-xyz | REJECTED | Not found in approved repository | User: false"
        ),
        "{}",
        lines[0]
    );
}

#[tokio::test]
async fn validation_propagates_list_unavailable() {
    let h = Harness::new();
    h.transport.fail(SOURCE_URL);
    let validator = h.file_validator();

    let err = validator.validate_skill("weather-forecast").await.unwrap_err();
    assert!(matches!(err, SkillError::ListUnavailable { .. }));
}

#[tokio::test]
async fn empty_name_is_rejected_without_fetching() {
    let h = Harness::new();
    let validator = h.file_validator();

    let result = validator.validate_skill("   ").await.unwrap();
    assert!(!result.approved);
    assert_eq!(h.transport.calls_to(SOURCE_URL), 0);
}

#[tokio::test]
async fn install_decisions_are_appended() {
    let h = Harness::new();
    let validator = h.file_validator();

    validator.record_decision("weather-forecast", AuditOutcome::Approved, "Installed", true);
    validator.record_decision("todoist", AuditOutcome::Declined, "User declined", false);
    validator.record_decision("tasks", AuditOutcome::Error, "install failed", true);

    let lines = h.audit_lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("2026-10-16T08:00:00.000Z | weather-forecast | APPROVED"));
    assert!(lines[1].contains("| DECLINED | User declined | User: false"));
    assert!(lines[2].contains("| ERROR |"));

    let recent = validator.audit_log().read_recent(2).unwrap();
    assert_eq!(recent, lines[1..].to_vec());
}

#[tokio::test]
async fn forged_name_writes_a_single_audit_line() {
    let h = Harness::new();
    let validator = h.file_validator();

    let forged = "ghost\n2026-01-01T00:00:00.000Z | evil | APPROVED | forged | User: true";
    let result = validator.validate_skill(forged).await.unwrap();
    assert!(!result.approved);

    let lines = h.audit_lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].ends_with("| REJECTED | Not found in approved repository | User: false"));
}
