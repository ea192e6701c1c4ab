#![cfg(test)]
use sea_orm::DatabaseConnection;
use models::db::{connect_and_migrate, DatabaseConfig};
use models::user;

/// Fresh migrated in-memory database per test; nothing is shared between tests.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    connect_and_migrate(&DatabaseConfig::sqlite_memory()).await
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, anyhow::Error> {
    Ok(user::create(db, username).await?)
}
