use sea_orm::DatabaseConnection;
use chrono::{DateTime, Duration, Utc};

use crate::db::{connect_and_migrate, DatabaseConfig};
use crate::{event, user};


/// CRUD operations tests for all models
pub mod crud_tests;

/// Transaction handling and isolation tests
pub mod transaction_tests;

/// Fresh, fully migrated in-memory database.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    connect_and_migrate(&DatabaseConfig::sqlite_memory()).await
}

pub(crate) async fn seed_user(db: &DatabaseConnection, username: &str) -> anyhow::Result<user::Model> {
    Ok(user::create(db, username).await?)
}

pub(crate) fn new_event(owner: &user::Model, title: &str, date: DateTime<Utc>, max: i32) -> event::NewEvent {
    event::NewEvent {
        user_id: owner.id,
        title: title.to_string(),
        description: format!("{title} description"),
        date,
        location: "Main hall".to_string(),
        max_participants: max,
    }
}

pub(crate) fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
