//! Create `event` table with FK to the owning `user`.
//!
//! `num_participants` mirrors the row count in `event_participant`. There is
//! no check against `max_participants` here since an edit may lower the cap
//! below the current count.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(uuid(Event::Id).primary_key())
                    .col(uuid(Event::UserId).not_null())
                    .col(string_len(Event::Title, 200).not_null())
                    .col(text(Event::Description).not_null())
                    .col(timestamp_with_time_zone(Event::Date).not_null())
                    .col(string_len(Event::Location, 200).not_null())
                    .col(integer(Event::MaxParticipants).not_null())
                    .col(integer(Event::NumParticipants).not_null().default(0))
                    .col(timestamp_with_time_zone(Event::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Event::UpdatedAt).not_null())
                    .check(Expr::col(Event::NumParticipants).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_user")
                            .from(Event::Table, Event::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Event::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Date,
    Location,
    MaxParticipants,
    NumParticipants,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
