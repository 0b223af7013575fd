//! Create `motion_vote` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MotionVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MotionVote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MotionVote::MotionId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(MotionVote::OnBehalfOfUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVote::SubmittedByUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVote::ResponseCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MotionVote::Votes).integer().not_null())
                    .col(
                        ColumnDef::new(MotionVote::Proxy)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MotionVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_motion_vote_motion")
                            .from(MotionVote::Table, MotionVote::MotionId)
                            .to(Motion::Table, Motion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_motion_vote_on_behalf_of_user")
                            .from(MotionVote::Table, MotionVote::OnBehalfOfUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: backstop for the replace-all protocol
        manager
            .create_index(
                Index::create()
                    .name("idx_motion_vote_motion_user_code")
                    .table(MotionVote::Table)
                    .col(MotionVote::MotionId)
                    .col(MotionVote::OnBehalfOfUserId)
                    .col(MotionVote::ResponseCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MotionVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MotionVote {
    Table,
    Id,
    MotionId,
    OnBehalfOfUserId,
    SubmittedByUserId,
    ResponseCode,
    Votes,
    Proxy,
    CreatedAt,
}

#[derive(Iden)]
enum Motion {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
