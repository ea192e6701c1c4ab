use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Event: listings filter and order by date
        manager
            .create_index(
                Index::create()
                    .name("idx_event_date")
                    .table(Event::Table)
                    .col(Event::Date)
                    .to_owned(),
            )
            .await?;

        // Event: "my events" lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_event_user")
                    .table(Event::Table)
                    .col(Event::UserId)
                    .to_owned(),
            )
            .await?;

        // Participant: dedup key (name, email)
        manager
            .create_index(
                Index::create()
                    .name("uniq_participant_name_email")
                    .table(Participant::Table)
                    .col(Participant::Name)
                    .col(Participant::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // EventParticipant: one registration per participant per event
        manager
            .create_index(
                Index::create()
                    .name("uniq_event_participant")
                    .table(EventParticipant::Table)
                    .col(EventParticipant::EventId)
                    .col(EventParticipant::ParticipantId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_event_date").table(Event::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_event_user").table(Event::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_participant_name_email").table(Participant::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_event_participant").table(EventParticipant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Event { Table, Date, UserId }

#[derive(DeriveIden)]
enum Participant { Table, Name, Email }

#[derive(DeriveIden)]
enum EventParticipant { Table, EventId, ParticipantId }
