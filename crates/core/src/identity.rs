//! Resolved user identities.
//!
//! A user is exactly one of an account-sourced identity or a link-sourced
//! identity; [`UserDetails`] makes the other combinations unrepresentable.

use assembly_db::entities::user::{self, LinkType, MembershipType, UserSource};
use serde::Serialize;

/// An identified user, as supplied by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub details: UserDetails,
}

/// Source-specific user details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum UserDetails {
    Account(AccountDetails),
    Link(LinkDetails),
}

/// Details of a membership account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub membership_type: Option<MembershipType>,
    pub is_admin: bool,
}

/// Details of a link identity (delegate, tellor or clerk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetails {
    pub link_type: Option<LinkType>,
    /// Event the link is bound to.
    pub event_id: Option<String>,
    /// Account the link acts for.
    pub account_user_id: Option<String>,
}

impl User {
    /// Where this identity comes from.
    #[must_use]
    pub const fn source(&self) -> UserSource {
        match self.details {
            UserDetails::Account(_) => UserSource::Account,
            UserDetails::Link(_) => UserSource::Link,
        }
    }

    /// Full display name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { self.id.clone() } else { name }
    }

    /// The account a link identity votes for, if any.
    #[must_use]
    pub fn represented_account_id(&self) -> Option<&str> {
        match &self.details {
            UserDetails::Link(link) => link.account_user_id.as_deref(),
            UserDetails::Account(_) => None,
        }
    }

    /// The identity this user's votes are cast for.
    #[must_use]
    pub fn on_behalf_of_user_id(&self) -> &str {
        self.represented_account_id().unwrap_or(&self.id)
    }

    /// Whether votes by this user are proxy votes.
    #[must_use]
    pub fn is_proxy(&self) -> bool {
        self.represented_account_id().is_some()
    }

    /// Event a link identity is restricted to.
    #[must_use]
    pub fn bound_event_id(&self) -> Option<&str> {
        match &self.details {
            UserDetails::Link(link) => link.event_id.as_deref(),
            UserDetails::Account(_) => None,
        }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        let details = match model.source {
            UserSource::Account => UserDetails::Account(AccountDetails {
                membership_type: model.membership_type,
                is_admin: model.is_admin,
            }),
            UserSource::Link => UserDetails::Link(LinkDetails {
                link_type: model.link_type,
                event_id: model.link_event_id,
                account_user_id: model.link_account_user_id,
            }),
        };

        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            details,
        }
    }
}
