//! Repository metadata fetcher.
//!
//! Metadata only feeds the soft safety score, so every failure here is
//! absorbed: the fetcher logs and returns `None`, and the scorer treats
//! `None` as zero trust.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::transport::HttpTransport;
use crate::types::RepoMetadata;

/// `GET /repos/{owner}/{repo}` response, reduced to the fields we score.
#[derive(Debug, Deserialize)]
struct RepoResponse {
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    updated_at: Option<DateTime<Utc>>,
    description: Option<String>,
    license: Option<serde_json::Value>,
}

impl From<RepoResponse> for RepoMetadata {
    fn from(raw: RepoResponse) -> Self {
        Self {
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            updated_at: raw.updated_at,
            description: raw.description,
            has_license: raw.license.is_some_and(|l| !l.is_null()),
        }
    }
}

/// Fetches [`RepoMetadata`] from a GitHub-compatible API.
pub struct MetadataFetcher {
    api_base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl MetadataFetcher {
    pub fn new(api_base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_owned(),
            transport,
        }
    }

    /// The metadata endpoint for a repository.
    pub fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}", self.api_base_url)
    }

    /// Fetch metadata for `owner/repo`, or `None` on any failure.
    pub async fn fetch(&self, owner: &str, repo: &str) -> Option<RepoMetadata> {
        let url = self.repo_url(owner, repo);

        let response = match self.transport.get(&url).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(owner, repo, error = %e, "metadata request failed");
                return None;
            }
        };

        if !response.is_success() {
            tracing::warn!(owner, repo, status = response.status, "metadata request rejected");
            return None;
        }

        match serde_json::from_str::<RepoResponse>(&response.body) {
            Ok(raw) => Some(raw.into()),
            Err(e) => {
                tracing::debug!(owner, repo, error = %e, "metadata response is not valid JSON");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_full_response() {
        let raw: RepoResponse = serde_json::from_str(
            r#"{
                "stargazers_count": 150,
                "forks_count": 25,
                "updated_at": "2026-10-01T12:00:00Z",
                "description": "Weather forecasts for OpenClaw",
                "license": {"key": "mit", "name": "MIT License"}
            }"#,
        )
        .unwrap();
        let meta = RepoMetadata::from(raw);
        assert_eq!(meta.stars, Some(150));
        assert_eq!(meta.forks, Some(25));
        assert!(meta.has_license);
        assert_eq!(
            meta.updated_at.unwrap().to_rfc3339(),
            "2026-10-01T12:00:00+00:00"
        );
    }

    #[test]
    fn null_fields_map_to_absent() {
        let raw: RepoResponse =
            serde_json::from_str(r#"{"description": null, "license": null}"#).unwrap();
        let meta = RepoMetadata::from(raw);
        assert_eq!(meta.stars, None);
        assert_eq!(meta.description, None);
        assert!(!meta.has_license);
    }

    #[test]
    fn repo_url_trims_trailing_slash() {
        struct Unused;
        #[async_trait::async_trait]
        impl HttpTransport for Unused {
            async fn get(&self, _url: &str) -> crate::Result<crate::TransportResponse> {
                unreachable!()
            }
        }
        let fetcher = MetadataFetcher::new("https://api.github.com/", Arc::new(Unused));
        assert_eq!(
            fetcher.repo_url("acme", "tool"),
            "https://api.github.com/repos/acme/tool"
        );
    }
}
