use sea_orm::{entity::prelude::*, ConnectionTrait, Set, SqlErr};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{event, participant};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Event,
    Participant,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Event => Entity::belongs_to(event::Entity)
                .from(Column::EventId)
                .to(event::Column::Id)
                .into(),
            Relation::Participant => Entity::belongs_to(participant::Entity)
                .from(Column::ParticipantId)
                .to(participant::Column::Id)
                .into(),
        }
    }
}

impl Related<event::Entity> for Entity {
    fn to() -> RelationDef { Relation::Event.def() }
}

impl Related<participant::Entity> for Entity {
    fn to() -> RelationDef { Relation::Participant.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn is_registered<C: ConnectionTrait>(db: &C, event_id: Uuid, participant_id: Uuid) -> Result<bool, ModelError> {
    let n = Entity::find()
        .filter(Column::EventId.eq(event_id))
        .filter(Column::ParticipantId.eq(participant_id))
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Insert the join row. Returns `false` if the pair already exists
/// (unique index hit); callers inside a transaction must roll back then.
pub async fn link<C: ConnectionTrait>(db: &C, event_id: Uuid, participant_id: Uuid) -> Result<bool, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(event_id),
        participant_id: Set(participant_id),
        created_at: Set(Utc::now().into()),
    };
    match am.insert(db).await {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
