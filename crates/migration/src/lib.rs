//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000001_create_user;
mod m20220101_000002_create_user_credentials;
mod m20220101_000003_create_event;
mod m20220101_000004_create_participant;
mod m20220101_000005_create_event_participant;
mod m20220101_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000001_create_user::Migration),
            Box::new(m20220101_000002_create_user_credentials::Migration),
            Box::new(m20220101_000003_create_event::Migration),
            Box::new(m20220101_000004_create_participant::Migration),
            Box::new(m20220101_000005_create_event_participant::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000006_add_indexes::Migration),
        ]
    }
}
