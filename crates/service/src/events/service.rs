use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{event, participant};
use crate::errors::ServiceError;
use super::domain::{EventForm, EventPatch};

/// Create an event owned by `owner`.
#[instrument(skip(db, form), fields(owner = %owner))]
pub async fn create_event(
    db: &DatabaseConnection,
    owner: Uuid,
    form: EventForm,
    offset: FixedOffset,
) -> Result<event::Model, ServiceError> {
    let new = form.into_new_event(owner, offset)?;
    let created = event::create(db, new).await?;
    info!(event_id = %created.id, date = %created.date, max = created.max_participants, "event_created");
    Ok(created)
}

/// Get event by id.
pub async fn get_event(db: &DatabaseConnection, id: Uuid) -> Result<event::Model, ServiceError> {
    event::find(db, id).await?.ok_or_else(|| ServiceError::not_found("event"))
}

/// Event plus its registrants.
pub async fn get_event_with_participants(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<(event::Model, Vec<participant::Model>), ServiceError> {
    let ev = get_event(db, id).await?;
    let people = event::participants(db, &ev).await?;
    Ok((ev, people))
}

/// Update event: present fields overwrite, absent ones are kept.
#[instrument(skip(db, patch))]
pub async fn update_event(
    db: &DatabaseConnection,
    id: Uuid,
    patch: EventPatch,
    offset: FixedOffset,
) -> Result<event::Model, ServiceError> {
    let current = get_event(db, id).await?;
    let changes = patch.resolve(&current, offset)?;
    if let Some(t) = &changes.title { event::validate_title(t)?; }
    if let Some(l) = &changes.location { event::validate_location(l)?; }
    let mut am: event::ActiveModel = current.into();
    if let Some(t) = changes.title { am.title = Set(t); }
    if let Some(d) = changes.description { am.description = Set(d); }
    if let Some(at) = changes.date { am.date = Set(at.into()); }
    if let Some(l) = changes.location { am.location = Set(l); }
    if let Some(m) = changes.max_participants { am.max_participants = Set(m); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(event_id = %updated.id, "event_updated");
    Ok(updated)
}

/// Delete event. No ownership check is made.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if !event::delete(db, id).await? {
        return Err(ServiceError::not_found("event"));
    }
    info!(event_id = %id, "event_deleted");
    Ok(())
}

/// Events happening at or after `now`.
pub async fn list_upcoming(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<Vec<event::Model>, ServiceError> {
    Ok(event::list_from(db, now).await?)
}

/// Events strictly before `now`.
pub async fn list_past(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<Vec<event::Model>, ServiceError> {
    Ok(event::list_before(db, now).await?)
}

pub async fn list_owned_by(db: &DatabaseConnection, owner: Uuid) -> Result<Vec<event::Model>, ServiceError> {
    Ok(event::list_by_owner(db, owner).await?)
}
