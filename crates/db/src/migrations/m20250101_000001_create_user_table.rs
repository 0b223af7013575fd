//! Create `user` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Source).string_len(16).not_null())
                    .col(ColumnDef::new(User::FirstName).string_len(128))
                    .col(ColumnDef::new(User::LastName).string_len(128))
                    .col(ColumnDef::new(User::Token).string_len(128).unique_key())
                    .col(ColumnDef::new(User::MembershipType).string_len(32))
                    .col(
                        ColumnDef::new(User::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(User::LinkType).string_len(32))
                    .col(ColumnDef::new(User::LinkEventId).string_len(32))
                    .col(ColumnDef::new(User::LinkAccountUserId).string_len(32))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: link_account_user_id (links acting for an account)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_link_account_user_id")
                    .table(User::Table)
                    .col(User::LinkAccountUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Source,
    FirstName,
    LastName,
    Token,
    MembershipType,
    IsAdmin,
    LinkType,
    LinkEventId,
    LinkAccountUserId,
    CreatedAt,
}
