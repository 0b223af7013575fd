//! Live motion vote: the current vote for a
//! (motion, on-behalf-of user, response code) triple.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "motion_vote")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub motion_id: String,

    /// Identity the vote is cast for
    #[sea_orm(indexed)]
    pub on_behalf_of_user_id: String,

    /// Identity that submitted the vote
    pub submitted_by_user_id: String,

    pub response_code: String,

    pub votes: i32,

    /// Whether the vote was cast by a link identity acting for an account
    #[sea_orm(default_value = false)]
    pub proxy: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::motion::Entity",
        from = "Column::MotionId",
        to = "super::motion::Column::Id",
        on_delete = "Cascade"
    )]
    Motion,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OnBehalfOfUserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    OnBehalfOfUser,
}

impl Related<super::motion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Motion.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OnBehalfOfUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
