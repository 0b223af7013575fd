//! Create `motion_vote_audit` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MotionVoteAudit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MotionVoteAudit::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::SubmissionId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::MotionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::SubmittedByUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::SubmittedBySource)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::SubmittedByName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::OnBehalfOfUserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::OnBehalfOfName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::ResponseCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MotionVoteAudit::Votes).integer().not_null())
                    .col(ColumnDef::new(MotionVoteAudit::Proxy).boolean().not_null())
                    .col(
                        ColumnDef::new(MotionVoteAudit::Superseded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::Supersedes)
                            .json()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(MotionVoteAudit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Audit rows outlive motion deletion attempts
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_motion_vote_audit_motion")
                            .from(MotionVoteAudit::Table, MotionVoteAudit::MotionId)
                            .to(Motion::Table, Motion::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (motion_id, on_behalf_of_user_id, superseded) for finding active rows
        manager
            .create_index(
                Index::create()
                    .name("idx_motion_vote_audit_motion_user_active")
                    .table(MotionVoteAudit::Table)
                    .col(MotionVoteAudit::MotionId)
                    .col(MotionVoteAudit::OnBehalfOfUserId)
                    .col(MotionVoteAudit::Superseded)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_motion_vote_audit_submission_id")
                    .table(MotionVoteAudit::Table)
                    .col(MotionVoteAudit::SubmissionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MotionVoteAudit::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MotionVoteAudit {
    Table,
    Id,
    SubmissionId,
    MotionId,
    SubmittedByUserId,
    SubmittedBySource,
    SubmittedByName,
    OnBehalfOfUserId,
    OnBehalfOfName,
    ResponseCode,
    Votes,
    Proxy,
    Superseded,
    Supersedes,
    CreatedAt,
}

#[derive(Iden)]
enum Motion {
    Table,
    Id,
}
