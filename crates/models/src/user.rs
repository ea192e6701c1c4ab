use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{check_len, ModelError};
use crate::event;

pub const USERNAME_MAX_LEN: usize = 150;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Events,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Events => Entity::has_many(event::Entity).into() }
    }
}

impl Related<event::Entity> for Entity {
    fn to() -> RelationDef { Relation::Events.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Usernames follow the usual account rules: non-empty, bounded, and made
/// of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    check_len("username", username, USERNAME_MAX_LEN)?;
    if !username.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
        return Err(ModelError::Validation("username may only contain letters, digits and @.+-_".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, username: &str) -> Result<Model, ModelError> {
    validate_username(username)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username)).one(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}
