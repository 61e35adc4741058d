//! Approved-list source document fetch.
//!
//! The list lives in a repository file served through the GitHub contents
//! API, which wraps the file in a JSON envelope with base64 content.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::error::{Result, SkillError};
use crate::transport::HttpTransport;

/// Contents API envelope.
#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: Option<String>,
    encoding: Option<String>,
}

/// Fetch the source document at `url` and return its decoded text.
///
/// Non-2xx status, a malformed envelope or undecodable content are errors.
pub async fn fetch_source_document(transport: &dyn HttpTransport, url: &str) -> Result<String> {
    let response = transport.get(url).await?;
    if !response.is_success() {
        return Err(SkillError::HttpStatus {
            status: response.status,
            url: url.to_owned(),
        });
    }
    decode_envelope(&response.body)
}

/// Decode a contents API envelope into its UTF-8 text.
pub fn decode_envelope(body: &str) -> Result<String> {
    let envelope: ContentEnvelope = serde_json::from_str(body)?;

    if let Some(encoding) = envelope.encoding.as_deref()
        && encoding != "base64"
    {
        return Err(SkillError::InvalidEnvelope(format!(
            "unsupported encoding `{encoding}`"
        )));
    }

    let content = envelope
        .content
        .ok_or_else(|| SkillError::InvalidEnvelope("missing `content` field".into()))?;

    // The API wraps base64 at 60 columns.
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;

    String::from_utf8(bytes)
        .map_err(|e| SkillError::InvalidEnvelope(format!("content is not UTF-8: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
