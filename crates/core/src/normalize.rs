//! Vote normalization.

use std::collections::BTreeMap;

use assembly_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A count of votes for one response code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub code: String,
    pub count: i32,
}

impl VoteCount {
    /// Create a vote count.
    pub fn new(code: impl Into<String>, count: i32) -> Self {
        Self {
            code: code.into(),
            count,
        }
    }
}

/// Merge a raw submission into one entry per response code.
///
/// Codes match by exact string equality; counts within a code are summed.
/// Output is ordered by code regardless of input order. Zero and negative
/// counts pass through untouched. A sum outside the `i32` range is a bad
/// request.
pub fn normalize(raw_votes: Vec<VoteCount>) -> AppResult<Vec<VoteCount>> {
    let mut merged: BTreeMap<String, i32> = BTreeMap::new();
    for vote in raw_votes {
        let total = merged.entry(vote.code).or_insert(0);
        *total = total.checked_add(vote.count).ok_or_else(|| {
            AppError::BadRequest("Vote count for a response code is out of range".to_string())
        })?;
    }

    Ok(merged
        .into_iter()
        .map(|(code, count)| VoteCount { code, count })
        .collect())
}
