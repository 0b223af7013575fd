//! Create `motion` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Motion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Motion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Motion::EventId).string_len(32).not_null())
                    .col(ColumnDef::new(Motion::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Motion::Description).text())
                    .col(
                        ColumnDef::new(Motion::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Motion::VoteDefinition).json().not_null())
                    .col(
                        ColumnDef::new(Motion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Motion::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_motion_event")
                            .from(Motion::Table, Motion::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_motion_event_id")
                    .table(Motion::Table)
                    .col(Motion::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Motion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Motion {
    Table,
    Id,
    EventId,
    Title,
    Description,
    Status,
    VoteDefinition,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
}
