//! Role resolution.
//!
//! Roles are derived from a user's account or link attributes on every
//! check and never stored, since those attributes can change between
//! requests.

use std::collections::BTreeSet;
use std::fmt;

use assembly_db::entities::user::{LinkType, MembershipType};
use serde::{Deserialize, Serialize};

use crate::identity::{User, UserDetails};

/// A voting or administrative role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrator,
    Member,
    GroupMember,
    IndividualMember,
    Committee,
    Delegate,
    GroupDelegate,
    TellorDelegate,
    Voter,
    GroupVoter,
    IndividualVoter,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Administrator,
        Self::Member,
        Self::GroupMember,
        Self::IndividualMember,
        Self::Committee,
        Self::Delegate,
        Self::GroupDelegate,
        Self::TellorDelegate,
        Self::Voter,
        Self::GroupVoter,
        Self::IndividualVoter,
    ];

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::Member => "MEMBER",
            Self::GroupMember => "GROUP_MEMBER",
            Self::IndividualMember => "INDIVIDUAL_MEMBER",
            Self::Committee => "COMMITTEE",
            Self::Delegate => "DELEGATE",
            Self::GroupDelegate => "GROUP_DELEGATE",
            Self::TellorDelegate => "TELLOR_DELEGATE",
            Self::Voter => "VOTER",
            Self::GroupVoter => "GROUP_VOTER",
            Self::IndividualVoter => "INDIVIDUAL_VOTER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn is_group_membership(membership: MembershipType) -> bool {
    matches!(
        membership,
        MembershipType::Group
            | MembershipType::Junior
            | MembershipType::Associate
            | MembershipType::Overseas
    )
}

const fn is_individual_membership(membership: MembershipType) -> bool {
    matches!(
        membership,
        MembershipType::Individual | MembershipType::Honorary
    )
}

/// Derive the role set of a user. Total: missing attributes contribute
/// nothing, so a user may well have no roles at all.
#[must_use]
pub fn resolve_roles(user: &User) -> BTreeSet<Role> {
    let mut roles = BTreeSet::new();

    match &user.details {
        UserDetails::Account(account) => {
            if account.is_admin {
                roles.insert(Role::Administrator);
            }
            if let Some(membership) = account.membership_type {
                if membership == MembershipType::Committee {
                    roles.insert(Role::Committee);
                }
                if is_group_membership(membership) {
                    roles.insert(Role::GroupMember);
                }
                if is_individual_membership(membership) {
                    roles.insert(Role::IndividualMember);
                }
            }
        }
        UserDetails::Link(link) => match link.link_type {
            Some(LinkType::GroupDelegate) => {
                roles.insert(Role::GroupDelegate);
            }
            Some(LinkType::Tellor) => {
                roles.insert(Role::TellorDelegate);
            }
            Some(LinkType::Clerk) | None => {}
        },
    }

    // Derived roles
    if roles.contains(&Role::GroupMember) || roles.contains(&Role::IndividualMember) {
        roles.insert(Role::Member);
    }
    if roles.contains(&Role::GroupDelegate) {
        roles.insert(Role::Delegate);
    }
    if roles.contains(&Role::GroupDelegate) || roles.contains(&Role::GroupMember) {
        roles.insert(Role::GroupVoter);
    }
    if roles.contains(&Role::IndividualMember) {
        roles.insert(Role::IndividualVoter);
    }
    if roles.contains(&Role::GroupVoter) || roles.contains(&Role::IndividualVoter) {
        roles.insert(Role::Voter);
    }

    roles
}
