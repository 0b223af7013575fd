//! Motion vote definitions.

use std::collections::BTreeSet;

use assembly_common::{AppError, AppResult};
use assembly_db::entities::motion;
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Which roles may vote on a motion, with what weight, and the valid
/// responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDefinition {
    #[serde(default)]
    pub roles: Vec<RoleWeight>,
    #[serde(default)]
    pub responses: Vec<ResponseOption>,
}

/// Vote weight granted to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleWeight {
    pub role: Role,
    pub vote_weight: i64,
}

/// A valid response to a motion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOption {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub sequence: i32,
}

impl VoteDefinition {
    /// Parse the vote definition stored on a motion.
    pub fn from_motion(motion: &motion::Model) -> AppResult<Self> {
        serde_json::from_value(motion.vote_definition.clone()).map_err(|e| {
            AppError::Internal(format!(
                "Invalid vote definition on motion {}: {e}",
                motion.id
            ))
        })
    }

    /// The set of recognized response codes.
    #[must_use]
    pub fn response_codes(&self) -> BTreeSet<String> {
        self.responses.iter().map(|r| r.code.clone()).collect()
    }

    /// Responses in presentation order.
    #[must_use]
    pub fn ordered_responses(&self) -> Vec<&ResponseOption> {
        let mut responses: Vec<_> = self.responses.iter().collect();
        responses.sort_by_key(|r| r.sequence);
        responses
    }

    /// Whether any of `roles` is entitled to vote.
    #[must_use]
    pub fn allows_any(&self, roles: &BTreeSet<Role>) -> bool {
        self.roles.iter().any(|rw| roles.contains(&rw.role))
    }

    /// Highest weight among `roles` listed in the definition, 0 if none.
    #[must_use]
    pub fn weight_for(&self, roles: &BTreeSet<Role>) -> i64 {
        self.roles
            .iter()
            .filter(|rw| roles.contains(&rw.role))
            .map(|rw| rw.vote_weight)
            .max()
            .unwrap_or(0)
    }
}
