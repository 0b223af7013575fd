//! User entity.
//!
//! A user is either sourced from a membership account or from a link
//! (a proxy identity provisioned for a delegate, tellor or clerk).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a user identity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserSource {
    #[sea_orm(string_value = "account")]
    Account,
    #[sea_orm(string_value = "link")]
    Link,
}

/// Membership category of an account-sourced user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum MembershipType {
    #[sea_orm(string_value = "committee")]
    Committee,
    #[sea_orm(string_value = "group")]
    Group,
    #[sea_orm(string_value = "junior")]
    Junior,
    #[sea_orm(string_value = "associate")]
    Associate,
    #[sea_orm(string_value = "overseas")]
    Overseas,
    #[sea_orm(string_value = "individual")]
    Individual,
    #[sea_orm(string_value = "honorary")]
    Honorary,
}

/// Kind of link identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    #[sea_orm(string_value = "group-delegate")]
    GroupDelegate,
    #[sea_orm(string_value = "tellor")]
    Tellor,
    #[sea_orm(string_value = "clerk")]
    Clerk,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub source: UserSource,

    #[sea_orm(nullable)]
    pub first_name: Option<String>,

    #[sea_orm(nullable)]
    pub last_name: Option<String>,

    /// Access token issued by the authentication service
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    // --- account details (source = account) ---
    #[sea_orm(nullable)]
    pub membership_type: Option<MembershipType>,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    // --- link details (source = link) ---
    #[sea_orm(nullable)]
    pub link_type: Option<LinkType>,

    /// Event the link identity is bound to
    #[sea_orm(nullable)]
    pub link_event_id: Option<String>,

    /// Account user the link identity acts for
    #[sea_orm(nullable)]
    pub link_account_user_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Full display name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() { self.id.clone() } else { name }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
