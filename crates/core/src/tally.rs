//! Weighted tally of live votes.
//!
//! Stored votes keep the raw counts each voter submitted. Weights from the
//! vote definition are applied only here, per on-behalf-of user.

use std::collections::{BTreeMap, BTreeSet};

use assembly_db::entities::motion_vote;
use serde::Serialize;

use crate::definition::VoteDefinition;

/// Totals for one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyLine {
    pub code: String,
    pub label: String,
    pub raw_votes: i64,
    pub weighted_votes: i64,
}

/// Tally of a motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub motion_id: String,
    /// Distinct on-behalf-of users with at least one live vote.
    pub voters: usize,
    pub lines: Vec<TallyLine>,
}

/// Tally `votes` against `definition`.
///
/// `weight_of` returns the vote weight of an on-behalf-of user. Votes for
/// codes the definition no longer lists are left out. Totals saturate at the
/// `i64` bounds.
pub fn tally<F>(
    motion_id: &str,
    definition: &VoteDefinition,
    votes: &[motion_vote::Model],
    weight_of: F,
) -> Tally
where
    F: Fn(&str) -> i64,
{
    let mut totals: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    let mut voters = BTreeSet::new();

    for vote in votes {
        voters.insert(vote.on_behalf_of_user_id.as_str());
        let weight = weight_of(&vote.on_behalf_of_user_id);
        let entry = totals.entry(vote.response_code.as_str()).or_insert((0, 0));
        let raw = i64::from(vote.votes);
        entry.0 = entry.0.saturating_add(raw);
        entry.1 = entry.1.saturating_add(raw.saturating_mul(weight));
    }

    let lines = definition
        .ordered_responses()
        .into_iter()
        .map(|response| {
            let (raw_votes, weighted_votes) = totals
                .get(response.code.as_str())
                .copied()
                .unwrap_or((0, 0));
            TallyLine {
                code: response.code.clone(),
                label: response.label.clone(),
                raw_votes,
                weighted_votes,
            }
        })
        .collect();

    let known = definition.response_codes();
    for code in totals.keys().filter(|code| !known.contains(**code)) {
        tracing::warn!(motion_id = motion_id, code = %code, "Live vote for unlisted response code");
    }

    Tally {
        motion_id: motion_id.to_string(),
        voters: voters.len(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ResponseOption;
    use chrono::Utc;

    fn vote(user: &str, code: &str, votes: i32) -> motion_vote::Model {
        motion_vote::Model {
            id: format!("{user}-{code}"),
            motion_id: "42".to_string(),
            on_behalf_of_user_id: user.to_string(),
            submitted_by_user_id: user.to_string(),
            response_code: code.to_string(),
            votes,
            proxy: false,
            created_at: Utc::now().into(),
        }
    }

    fn yes_no() -> VoteDefinition {
        VoteDefinition {
            roles: Vec::new(),
            responses: vec![
                ResponseOption {
                    code: "N".to_string(),
                    label: "No".to_string(),
                    sequence: 2,
                },
                ResponseOption {
                    code: "Y".to_string(),
                    label: "Yes".to_string(),
                    sequence: 1,
                },
            ],
        }
    }

    #[test]
    fn test_weights_apply_per_voter() {
        let votes = vec![vote("group", "Y", 1), vote("solo", "Y", 1), vote("solo", "N", 2)];
        let result = tally("42", &yes_no(), &votes, |user| if user == "group" { 10 } else { 1 });

        assert_eq!(result.voters, 2);
        assert_eq!(result.lines[0].code, "Y");
        assert_eq!(result.lines[0].raw_votes, 2);
        assert_eq!(result.lines[0].weighted_votes, 11);
        assert_eq!(result.lines[1].raw_votes, 2);
        assert_eq!(result.lines[1].weighted_votes, 2);
    }

    #[test]
    fn test_every_response_listed_even_without_votes() {
        let result = tally("42", &yes_no(), &[], |_| 1);
        assert_eq!(result.voters, 0);
        assert_eq!(result.lines.len(), 2);
        assert!(result.lines.iter().all(|line| line.raw_votes == 0));
    }

    #[test]
    fn test_unlisted_codes_are_left_out() {
        let result = tally("42", &yes_no(), &[vote("u1", "Z", 3)], |_| 1);
        assert_eq!(result.voters, 1);
        assert!(result.lines.iter().all(|line| line.raw_votes == 0));
    }

    #[test]
    fn test_huge_weight_saturates() {
        let votes = vec![vote("a", "Y", 3), vote("b", "Y", 2)];
        let result = tally("42", &yes_no(), &votes, |_| i64::MAX);
        assert_eq!(result.lines[0].raw_votes, 5);
        assert_eq!(result.lines[0].weighted_votes, i64::MAX);
    }
}
