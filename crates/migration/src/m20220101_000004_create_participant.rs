//! Create `participant` table.
//!
//! Registrants are deduplicated on `(name, email)`, see the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Participant::Table)
                    .if_not_exists()
                    .col(uuid(Participant::Id).primary_key())
                    .col(string_len(Participant::Name, 200).not_null())
                    .col(string_len(Participant::Email, 254).not_null())
                    .col(timestamp_with_time_zone(Participant::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Participant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Participant { Table, Id, Name, Email, CreatedAt }
