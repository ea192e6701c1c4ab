//! Create `event_participant` join table (many-to-many between `event` and
//! `participant`). Both sides cascade so deleting an event drops its
//! registrations without touching the participants.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventParticipant::Table)
                    .if_not_exists()
                    .col(uuid(EventParticipant::Id).primary_key())
                    .col(uuid(EventParticipant::EventId).not_null())
                    .col(uuid(EventParticipant::ParticipantId).not_null())
                    .col(timestamp_with_time_zone(EventParticipant::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_participant_event")
                            .from(EventParticipant::Table, EventParticipant::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_participant_participant")
                            .from(EventParticipant::Table, EventParticipant::ParticipantId)
                            .to(Participant::Table, Participant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventParticipant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventParticipant { Table, Id, EventId, ParticipantId, CreatedAt }

#[derive(DeriveIden)]
enum Event { Table, Id }

#[derive(DeriveIden)]
enum Participant { Table, Id }
