use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::event::NewEvent;
use crate::errors::ServiceError;
use super::schedule::{parse_capacity, parse_local, split_local};

/// Create-event form. Text fields are stored as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub max_participants: String,
}

impl EventForm {
    pub fn into_new_event(self, owner: Uuid, offset: FixedOffset) -> Result<NewEvent, ServiceError> {
        Ok(NewEvent {
            user_id: owner,
            date: parse_local(&self.date, &self.time, offset)?,
            max_participants: parse_capacity(&self.max_participants)?,
            title: self.title,
            description: self.description,
            location: self.location,
        })
    }

    /// Prefill values for an edit form.
    pub fn from_model(event: &models::event::Model, offset: FixedOffset) -> Self {
        let (date, time) = split_local(&event.date, offset);
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date,
            time,
            location: event.location.clone(),
            max_participants: event.max_participants.to_string(),
        }
    }
}

/// Edit-event form: only the fields that are present get written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub max_participants: Option<String>,
}

/// A validated patch, ready to apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl EventPatch {
    /// Resolve against the stored event. A lone date or time is combined
    /// with the other half of the stored local timestamp.
    pub fn resolve(self, current: &models::event::Model, offset: FixedOffset) -> Result<EventChanges, ServiceError> {
        let date = match (non_blank(self.date), non_blank(self.time)) {
            (None, None) => None,
            (d, t) => {
                let (cur_date, cur_time) = split_local(&current.date, offset);
                let d = d.unwrap_or(cur_date);
                let t = t.unwrap_or(cur_time);
                Some(parse_local(&d, &t, offset)?)
            }
        };
        let max_participants = non_blank(self.max_participants)
            .map(|raw| parse_capacity(&raw))
            .transpose()?;
        Ok(EventChanges {
            title: self.title,
            description: self.description,
            date,
            location: self.location,
            max_participants,
        })
    }
}
