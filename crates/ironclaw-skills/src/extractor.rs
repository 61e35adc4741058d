//! Approved-list extractor.
//!
//! The approved-skills document is plain markdown where every approved skill
//! is a link to its hosted repository:
//!
//! ```text
//! # Approved Community Skills
//!
//! - [weather-forecast](https://github.com/weather-dev/openclaw-weather)
//! - [Todoist](https://github.com/acme/openclaw-todoist.git) - task sync
//! ```
//!
//! Each line is scanned independently. Lines without a link of that shape are
//! skipped; only the first link on a line counts. A label or repository
//! segment containing `]` or `)` does not parse, which is accepted as part of
//! the document format.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::SkillEntry;

/// `[label](https://host/owner/repo-segment)`
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(https://([^/\s)]+)/([^/\s)]+)/([^)]+)\)")
        .expect("link pattern is a valid regex")
});

/// Lazily extract skill entries from a markdown document, in document order.
///
/// The iterator holds no state beyond the borrowed text; call again to start
/// over.
pub fn extract_entries(text: &str) -> impl Iterator<Item = SkillEntry> + '_ {
    text.lines().filter_map(parse_line)
}

/// Parse a single line, returning the entry for its first repository link.
pub fn parse_line(line: &str) -> Option<SkillEntry> {
    let caps = LINK_PATTERN.captures(line)?;

    let name = caps[1].trim().to_lowercase();
    let host = &caps[2];
    let owner = caps[3].to_owned();
    let segment = &caps[4];
    let repo = segment.strip_suffix(".git").unwrap_or(segment).to_owned();
    let url = format!("https://{host}/{owner}/{repo}");

    Some(SkillEntry {
        name,
        owner,
        repo,
        url,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
