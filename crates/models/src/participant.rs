use sea_orm::{entity::prelude::*, ConnectionTrait, Set, SqlErr};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{check_len, ModelError};
use crate::{event, event_participant};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Registrations,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Registrations => Entity::has_many(event_participant::Entity).into() }
    }
}

impl Related<event_participant::Entity> for Entity {
    fn to() -> RelationDef { Relation::Registrations.def() }
}

impl Related<event::Entity> for Entity {
    fn to() -> RelationDef { event_participant::Relation::Event.def() }

    fn via() -> Option<RelationDef> { Some(event_participant::Relation::Participant.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub const NAME_MAX_LEN: usize = 200;
pub const EMAIL_MAX_LEN: usize = 254;

pub fn validate_identity(name: &str, email: &str) -> Result<(), ModelError> {
    check_len("name", name, NAME_MAX_LEN)?;
    check_len("email", email, EMAIL_MAX_LEN)
}

pub async fn find_by_identity<C: ConnectionTrait>(db: &C, name: &str, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Name.eq(name))
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

/// Look up the participant by `(name, email)`, inserting it on first sight.
/// The boolean is `true` when a row was created. Must not run inside a
/// transaction: a lost insert race is resolved by re-reading the winner's row.
pub async fn find_or_create<C: ConnectionTrait>(db: &C, name: &str, email: &str) -> Result<(Model, bool), ModelError> {
    validate_identity(name, email)?;
    if let Some(found) = find_by_identity(db, name, email).await? {
        return Ok((found, false));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now().into()),
    };
    match am.insert(db).await {
        Ok(created) => Ok((created, true)),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let winner = find_by_identity(db, name, email)
                .await?
                .ok_or(ModelError::NotFound("participant"))?;
            Ok((winner, false))
        }
        Err(e) => Err(e.into()),
    }
}
