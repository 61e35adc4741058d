//! Safety scoring over repository metadata.
//!
//! The score is additive over independent buckets:
//!
//! | Signal                    | Points                          |
//! |---------------------------|---------------------------------|
//! | stars                     | >=100: 3, >=20: 2, >=5: 1       |
//! | forks                     | >=10: 2, >=2: 1                 |
//! | days since last update    | <=30: 3, <=90: 2, <=180: 1      |
//! | description > 10 chars    | 1                               |
//! | license present           | 1                               |
//!
//! A missing star count is treated as maximal distrust and scores 0 no
//! matter what else is known.

use chrono::{DateTime, Utc};

use crate::types::{RepoMetadata, SafetyScore};

/// Score `metadata` as of `now`.
pub fn safety_score(metadata: Option<&RepoMetadata>, now: DateTime<Utc>) -> SafetyScore {
    let Some(meta) = metadata else {
        return SafetyScore::new(0);
    };
    let Some(stars) = meta.stars else {
        return SafetyScore::new(0);
    };

    let points = star_points(stars)
        + fork_points(meta.forks.unwrap_or(0))
        + meta.updated_at.map_or(0, |t| recency_points(t, now))
        + description_points(meta.description.as_deref())
        + u8::from(meta.has_license);

    SafetyScore::new(points)
}

fn star_points(stars: u64) -> u8 {
    match stars {
        100.. => 3,
        20..=99 => 2,
        5..=19 => 1,
        _ => 0,
    }
}

fn fork_points(forks: u64) -> u8 {
    match forks {
        10.. => 2,
        2..=9 => 1,
        _ => 0,
    }
}

fn recency_points(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    // Clock skew can put `updated_at` in the future; count that as today.
    let days = (now - updated_at).num_days().max(0);
    match days {
        0..=30 => 3,
        31..=90 => 2,
        91..=180 => 1,
        _ => 0,
    }
}

fn description_points(description: Option<&str>) -> u8 {
    match description {
        Some(d) if d.chars().count() > 10 => 1,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
