//! Event pages: listings, detail, registration and the create/edit/cancel
//! forms.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use uuid::Uuid;

use service::auth::domain::AuthUser;
use service::events::{self as event_service, domain::{EventForm, EventPatch}};
use service::registration::{self, RegistrationRequest};

use crate::errors::AppError;
use crate::flash::{self, Flash};
use crate::pages::{
    render, EventDetailPage, EventFormPage, EventListPage, EventRow, ParticipantRow, RegisterEventPage,
};
use crate::session::MaybeUser;
use crate::state::ServerState;

const EVENTS_PATH: &str = "/events/";

/// Malformed ids are reported exactly like unknown ones.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found())
}

fn done(jar: CookieJar, message: Flash) -> Response {
    (flash::push(jar, message), Redirect::to(EVENTS_PATH)).into_response()
}

pub async fn upcoming(
    State(state): State<ServerState>,
    user: MaybeUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let now = Utc::now();
    let events = event_service::list_upcoming(&state.db, now).await?;
    let (jar, flash) = flash::take(jar);
    let page = EventListPage {
        flash,
        username: user.username(),
        heading: "Upcoming Events".into(),
        empty_text: "No upcoming events.",
        events: EventRow::list(&events, state.offset, now),
    };
    Ok((jar, render(&page)?).into_response())
}

pub async fn past(
    State(state): State<ServerState>,
    user: MaybeUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let now = Utc::now();
    let events = event_service::list_past(&state.db, now).await?;
    let (jar, flash) = flash::take(jar);
    let page = EventListPage {
        flash,
        username: user.username(),
        heading: "Past Events".into(),
        empty_text: "No past events.",
        events: EventRow::list(&events, state.offset, now),
    };
    Ok((jar, render(&page)?).into_response())
}

pub async fn my_events(
    State(state): State<ServerState>,
    Extension(me): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let now = Utc::now();
    let events = event_service::list_owned_by(&state.db, me.id).await?;
    let (jar, flash) = flash::take(jar);
    let page = EventListPage {
        flash,
        heading: format!("{}'s Events", me.username),
        username: Some(me.username),
        empty_text: "You have not created any events yet.",
        events: EventRow::list(&events, state.offset, now),
    };
    Ok((jar, render(&page)?).into_response())
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: MaybeUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let (event, people) = event_service::get_event_with_participants(&state.db, id).await?;
    let (jar, flash) = flash::take(jar);
    let page = EventDetailPage {
        flash,
        username: user.username(),
        event: EventRow::new(&event, state.offset, Utc::now()),
        participants: people.iter().map(ParticipantRow::from).collect(),
    };
    Ok((jar, render(&page)?).into_response())
}

pub async fn register_form(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: MaybeUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let event = event_service::get_event(&state.db, parse_id(&id)?).await?;
    let (jar, flash) = flash::take(jar);
    let page = RegisterEventPage {
        flash,
        username: user.username(),
        event: EventRow::new(&event, state.offset, Utc::now()),
        name: String::new(),
        email: String::new(),
        error: None,
    };
    Ok((jar, render(&page)?).into_response())
}

/// Every outcome, accepted or not, ends on the upcoming list with a flash.
pub async fn register(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: MaybeUser,
    jar: CookieJar,
    Form(req): Form<RegistrationRequest>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    match registration::register_participant(&state.db, id, &req).await {
        Ok(outcome) => Ok(done(jar, Flash::from(&outcome))),
        Err(e) => {
            let Some(msg) = e.validation_message().map(str::to_string) else {
                return Err(e.into());
            };
            let event = event_service::get_event(&state.db, id).await?;
            let page = RegisterEventPage {
                flash: None,
                username: user.username(),
                event: EventRow::new(&event, state.offset, Utc::now()),
                name: req.name,
                email: req.email,
                error: Some(msg),
            };
            Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response())
        }
    }
}

fn form_page(heading: &'static str, action: String, form: EventForm, username: Option<String>, error: Option<String>) -> EventFormPage {
    EventFormPage { flash: None, username, heading, action, form, error }
}

pub async fn add_form(Extension(me): Extension<AuthUser>) -> Result<Response, AppError> {
    let page = form_page("New Event", "/events/add/".into(), EventForm::default(), Some(me.username), None);
    Ok(render(&page)?.into_response())
}

pub async fn add(
    State(state): State<ServerState>,
    Extension(me): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    match event_service::create_event(&state.db, me.id, form.clone(), state.offset).await {
        Ok(_) => Ok(done(jar, Flash::EventCreated)),
        Err(e) => {
            let Some(msg) = e.validation_message().map(str::to_string) else {
                return Err(e.into());
            };
            let page = form_page("New Event", "/events/add/".into(), form, Some(me.username), Some(msg));
            Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: MaybeUser,
) -> Result<Response, AppError> {
    let event = event_service::get_event(&state.db, parse_id(&id)?).await?;
    let page = form_page(
        "Edit Event",
        format!("/events/{}/edit/", event.id),
        EventForm::from_model(&event, state.offset),
        user.username(),
        None,
    );
    Ok(render(&page)?.into_response())
}

/// Values the user typed, laid over the stored event, for re-display.
fn overlay(mut form: EventForm, patch: EventPatch) -> EventForm {
    let fields = [
        (&mut form.title, patch.title),
        (&mut form.description, patch.description),
        (&mut form.date, patch.date),
        (&mut form.time, patch.time),
        (&mut form.location, patch.location),
        (&mut form.max_participants, patch.max_participants),
    ];
    for (slot, value) in fields {
        if let Some(v) = value {
            *slot = v;
        }
    }
    form
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: MaybeUser,
    jar: CookieJar,
    Form(patch): Form<EventPatch>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    match event_service::update_event(&state.db, id, patch.clone(), state.offset).await {
        Ok(_) => Ok(done(jar, Flash::EventEdited)),
        Err(e) => {
            let Some(msg) = e.validation_message().map(str::to_string) else {
                return Err(e.into());
            };
            let event = event_service::get_event(&state.db, id).await?;
            let form = overlay(EventForm::from_model(&event, state.offset), patch);
            let page = form_page("Edit Event", format!("/events/{id}/edit/"), form, user.username(), Some(msg));
            Ok((StatusCode::BAD_REQUEST, render(&page)?).into_response())
        }
    }
}

/// Deletes immediately; there is no confirmation step.
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    event_service::delete_event(&state.db, parse_id(&id)?).await?;
    Ok(done(jar, Flash::EventDeleted))
}
