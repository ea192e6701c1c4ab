use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{check_len, ModelError};
use crate::{event_participant, participant, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date: DateTimeWithTimeZone,
    pub location: String,
    pub max_participants: i32,
    pub num_participants: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_full(&self) -> bool { self.num_participants >= self.max_participants }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool { self.date < now }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Registrations,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Registrations => Entity::has_many(event_participant::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl Related<event_participant::Entity> for Entity {
    fn to() -> RelationDef { Relation::Registrations.def() }
}

impl Related<participant::Entity> for Entity {
    fn to() -> RelationDef { event_participant::Relation::Participant.def() }

    fn via() -> Option<RelationDef> { Some(event_participant::Relation::Event.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

pub const TITLE_MAX_LEN: usize = 200;
pub const LOCATION_MAX_LEN: usize = 200;

/// Fields of a new event; `date` is already resolved to an instant.
#[derive(Clone, Debug)]
pub struct NewEvent {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
}

pub fn validate_max_participants(max: i32) -> Result<(), ModelError> {
    if max < 0 {
        return Err(ModelError::Validation("max_participants must not be negative".into()));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    check_len("title", title, TITLE_MAX_LEN)
}

pub fn validate_location(location: &str) -> Result<(), ModelError> {
    check_len("location", location, LOCATION_MAX_LEN)
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_title(&self.title)?;
        validate_location(&self.location)?;
        validate_max_participants(self.max_participants)
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewEvent) -> Result<Model, ModelError> {
    new.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new.user_id),
        title: Set(new.title),
        description: Set(new.description),
        date: Set(new.date.into()),
        location: Set(new.location),
        max_participants: Set(new.max_participants),
        num_participants: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Events dated at or after `now`, soonest first.
pub async fn list_from<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> Result<Vec<Model>, ModelError> {
    let now: DateTimeWithTimeZone = now.into();
    Ok(Entity::find()
        .filter(Column::Date.gte(now))
        .order_by_asc(Column::Date)
        .all(db)
        .await?)
}

/// Events dated strictly before `now`, oldest first.
pub async fn list_before<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> Result<Vec<Model>, ModelError> {
    let now: DateTimeWithTimeZone = now.into();
    Ok(Entity::find()
        .filter(Column::Date.lt(now))
        .order_by_asc(Column::Date)
        .all(db)
        .await?)
}

pub async fn list_by_owner<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::Date)
        .all(db)
        .await?)
}

/// Take one seat if any is left: a single conditional
/// `num_participants = num_participants + 1 WHERE num_participants < max_participants`.
/// Returns `false` when the event is full (or gone); nothing is written then.
pub async fn reserve_seat<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::NumParticipants, Expr::col(Column::NumParticipants).add(1))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Expr::col(Column::NumParticipants).lt(Expr::col(Column::MaxParticipants)))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

/// Number of join rows for the event, independent of the stored counter.
pub async fn count_participants<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, ModelError> {
    Ok(event_participant::Entity::find()
        .filter(event_participant::Column::EventId.eq(id))
        .count(db)
        .await?)
}

pub async fn participants<C: ConnectionTrait>(db: &C, event: &Model) -> Result<Vec<participant::Model>, ModelError> {
    Ok(event
        .find_related(participant::Entity)
        .order_by_asc(participant::Column::Name)
        .all(db)
        .await?)
}

/// Remove the event and its registrations. Returns `false` if nothing was deleted.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    event_participant::Entity::delete_many()
        .filter(event_participant::Column::EventId.eq(id))
        .exec(db)
        .await?;
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
