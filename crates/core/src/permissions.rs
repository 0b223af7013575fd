//! Role to permission table.
//!
//! The table is process-wide, built on first use and never mutated, so
//! lookups need no synchronization.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::identity::User;
use crate::roles::{Role, resolve_roles};

/// An action a role may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Permission {
    #[serde(rename = "event:read")]
    EventRead,
    #[serde(rename = "event:write")]
    EventWrite,
    #[serde(rename = "motion:read")]
    MotionRead,
    #[serde(rename = "motion:write")]
    MotionWrite,
    #[serde(rename = "motion-vote:read-all")]
    MotionVoteReadAll,
    #[serde(rename = "motion-vote:read-own-current")]
    MotionVoteReadOwnCurrent,
    #[serde(rename = "motion-vote:write-own")]
    MotionVoteWriteOwn,
    #[serde(rename = "motion-vote:write-all")]
    MotionVoteWriteAll,
    #[serde(rename = "motion-vote-audit:read-all")]
    MotionVoteAuditReadAll,
    #[serde(rename = "motion-vote-audit:read-own")]
    MotionVoteAuditReadOwn,
}

impl Permission {
    /// Every permission.
    pub const ALL: [Self; 10] = [
        Self::EventRead,
        Self::EventWrite,
        Self::MotionRead,
        Self::MotionWrite,
        Self::MotionVoteReadAll,
        Self::MotionVoteReadOwnCurrent,
        Self::MotionVoteWriteOwn,
        Self::MotionVoteWriteAll,
        Self::MotionVoteAuditReadAll,
        Self::MotionVoteAuditReadOwn,
    ];

    /// Wire name of the permission.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventRead => "event:read",
            Self::EventWrite => "event:write",
            Self::MotionRead => "motion:read",
            Self::MotionWrite => "motion:write",
            Self::MotionVoteReadAll => "motion-vote:read-all",
            Self::MotionVoteReadOwnCurrent => "motion-vote:read-own-current",
            Self::MotionVoteWriteOwn => "motion-vote:write-own",
            Self::MotionVoteWriteAll => "motion-vote:write-all",
            Self::MotionVoteAuditReadAll => "motion-vote-audit:read-all",
            Self::MotionVoteAuditReadOwn => "motion-vote-audit:read-own",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VOTER_PERMISSIONS: &[Permission] = &[
    Permission::MotionVoteReadOwnCurrent,
    Permission::MotionVoteWriteOwn,
    Permission::MotionVoteAuditReadOwn,
];

static PERMISSION_TABLE: Lazy<HashMap<Role, Vec<Permission>>> = Lazy::new(|| {
    use Permission::{
        EventRead, EventWrite, MotionRead, MotionVoteAuditReadAll, MotionVoteReadAll, MotionWrite,
    };

    let mut table = HashMap::new();
    table.insert(Role::Administrator, Permission::ALL.to_vec());
    table.insert(
        Role::Committee,
        vec![MotionRead, EventRead, MotionWrite, EventWrite],
    );
    table.insert(Role::Member, vec![MotionRead, EventRead]);
    table.insert(Role::GroupMember, vec![MotionRead]);
    table.insert(Role::IndividualMember, vec![MotionRead]);
    table.insert(Role::Delegate, vec![MotionRead, EventRead]);
    table.insert(Role::GroupDelegate, vec![MotionRead, EventRead]);
    table.insert(
        Role::TellorDelegate,
        vec![MotionRead, EventRead, MotionVoteReadAll, MotionVoteAuditReadAll],
    );
    table.insert(Role::Voter, VOTER_PERMISSIONS.to_vec());
    table.insert(Role::GroupVoter, VOTER_PERMISSIONS.to_vec());
    table.insert(Role::IndividualVoter, VOTER_PERMISSIONS.to_vec());
    table
});

/// Union of the permissions granted to `roles`.
#[must_use]
pub fn permissions_for(roles: &BTreeSet<Role>) -> BTreeSet<Permission> {
    roles
        .iter()
        .filter_map(|role| PERMISSION_TABLE.get(role))
        .flatten()
        .copied()
        .collect()
}

/// Whether `user` currently holds `permission`. An absent user holds none.
#[must_use]
pub fn has_permission(user: Option<&User>, permission: Permission) -> bool {
    user.is_some_and(|user| permissions_for(&resolve_roles(user)).contains(&permission))
}
