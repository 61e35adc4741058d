//! HTTP seam between the guard and the hosting APIs.
//!
//! The validator only ever issues plain GET requests, so the seam is a single
//! async method. [`ReqwestTransport`] is the production implementation;
//! tests plug in scripted responses instead of a live network.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A minimal GET-only HTTP client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request and return the response, whatever its status.
    ///
    /// Errors are reserved for requests that never produced a response
    /// (DNS, connect, timeout, body read).
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// `reqwest`-backed transport with GitHub API headers.
pub struct ReqwestTransport {
    http: reqwest::Client,
    token: Option<String>,
}

impl ReqwestTransport {
    /// Build a transport with a descriptive user agent and request timeout.
    pub fn new(user_agent: &str, timeout: Duration, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            token: token.filter(|t| !t.is_empty()),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if let Some(remaining) = remaining
            && remaining < 10
        {
            tracing::warn!(remaining, url, "GitHub API rate limit is low");
        }

        let body = response.text().await?;
        tracing::debug!(url, status, bytes = body.len(), "GET completed");

        Ok(TransportResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
