//! Motion vote audit entity.
//!
//! Append-only history of submitted votes. Rows are never deleted; the only
//! permitted mutation is flipping `superseded` to true.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::user::UserSource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "motion_vote_audit")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Groups the rows written by one logical submission
    #[sea_orm(indexed)]
    pub submission_id: String,

    #[sea_orm(indexed)]
    pub motion_id: String,

    // Snapshot of the submitter at submission time
    pub submitted_by_user_id: String,
    pub submitted_by_source: UserSource,
    pub submitted_by_name: String,

    // Snapshot of the represented identity at submission time
    pub on_behalf_of_user_id: String,
    pub on_behalf_of_name: String,

    pub response_code: String,

    pub votes: i32,

    pub proxy: bool,

    #[sea_orm(default_value = false)]
    pub superseded: bool,

    /// Ids of the audit rows this row replaced (JSON array of strings)
    #[sea_orm(column_type = "Json")]
    pub supersedes: JsonValue,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Ids of the audit rows this row replaced.
    #[must_use]
    pub fn supersedes_ids(&self) -> Vec<String> {
        serde_json::from_value(self.supersedes.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::motion::Entity",
        from = "Column::MotionId",
        to = "super::motion::Column::Id",
        on_delete = "Restrict"
    )]
    Motion,
}

impl Related<super::motion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Motion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
