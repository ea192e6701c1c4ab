//! Page templates and the view rows they display.

use askama::Template;
use axum::response::Html;
use chrono::{DateTime, FixedOffset, Utc};

use models::{event, participant};
use service::events::{domain::EventForm, schedule::display_local};

use crate::errors::AppError;
use crate::flash::FlashView;

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

/// One event as listed on a page.
#[derive(Clone, Debug)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub when: String,
    pub location: String,
    pub max_participants: i32,
    pub num_participants: i32,
    pub is_full: bool,
    pub is_past: bool,
}

impl EventRow {
    pub fn new(e: &event::Model, offset: FixedOffset, now: DateTime<Utc>) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.title.clone(),
            description: e.description.clone(),
            when: display_local(&e.date, offset),
            location: e.location.clone(),
            max_participants: e.max_participants,
            num_participants: e.num_participants,
            is_full: e.is_full(),
            is_past: e.is_past(now),
        }
    }

    pub fn list(events: &[event::Model], offset: FixedOffset, now: DateTime<Utc>) -> Vec<Self> {
        events.iter().map(|e| Self::new(e, offset, now)).collect()
    }
}

#[derive(Clone, Debug)]
pub struct ParticipantRow {
    pub name: String,
}

impl From<&participant::Model> for ParticipantRow {
    fn from(p: &participant::Model) -> Self {
        Self { name: p.name.clone() }
    }
}

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventListPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub heading: String,
    pub empty_text: &'static str,
    pub events: Vec<EventRow>,
}

#[derive(Template)]
#[template(path = "event_detail.html")]
pub struct EventDetailPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub event: EventRow,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Template)]
#[template(path = "event_register.html")]
pub struct RegisterEventPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub event: EventRow,
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "event_form.html")]
pub struct EventFormPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub heading: &'static str,
    pub action: String,
    pub form: EventForm,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub login_name: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub new_username: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub flash: Option<FlashView>,
    pub username: Option<String>,
    pub status: u16,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn model(max: i32, num: i32, at: DateTime<Utc>) -> event::Model {
        event::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "<b>Launch</b>".into(),
            description: "d".into(),
            date: at.into(),
            location: "Dock 4".into(),
            max_participants: max,
            num_participants: num,
            created_at: at.into(),
            updated_at: at.into(),
        }
    }

    #[test]
    fn rows_reflect_capacity_and_time() {
        let now = Utc::now();
        let utc = FixedOffset::east_opt(0).unwrap();
        let row = EventRow::new(&model(2, 2, now - Duration::hours(1)), utc, now);
        assert!(row.is_full);
        assert!(row.is_past);
        let row = EventRow::new(&model(3, 1, now + Duration::hours(1)), utc, now);
        assert!(!row.is_full);
        assert!(!row.is_past);
    }

    #[test]
    fn list_page_escapes_titles() {
        let now = Utc::now();
        let utc = FixedOffset::east_opt(0).unwrap();
        let page = EventListPage {
            flash: Some(crate::flash::Flash::EventFull.view()),
            username: Some("zoe".into()),
            heading: "Upcoming Events".into(),
            empty_text: "No upcoming events.",
            events: EventRow::list(&[model(5, 0, now)], utc, now),
        };
        let html = page.render().unwrap();
        assert!(html.contains("&lt;b&gt;Launch&lt;/b&gt;"));
        assert!(html.contains("This Event is Full!"));
        assert!(html.contains("zoe"));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let page = EventListPage {
            flash: None,
            username: None,
            heading: "Past Events".into(),
            empty_text: "No past events.",
            events: vec![],
        };
        let html = page.render().unwrap();
        assert!(html.contains("No past events."));
        assert!(html.contains("Log in"));
    }
}
