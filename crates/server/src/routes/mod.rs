use axum::{
    middleware,
    response::Redirect,
    routing::get,
    Json, Router,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::AppError;
use crate::session;
use crate::state::ServerState;

pub mod accounts;
pub mod events;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn not_found() -> AppError {
    AppError::not_found()
}

/// Build the full application router: account pages, event pages, static
/// assets and the health probe.
pub fn build_router(state: ServerState, static_dir: &str) -> Router {
    // Pages that need a logged-in user
    let members = Router::new()
        .route("/events/add/", get(events::add_form).post(events::add))
        .route("/events/my/", get(events::my_events))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::require_login));

    let accounts = Router::new()
        .route("/events/register/", get(accounts::signup_form).post(accounts::signup))
        .route("/events/login/", get(accounts::login_form).post(accounts::login))
        .route("/events/logout/", get(accounts::logout).post(accounts::logout))
        .route("/events/dashboard/", get(accounts::dashboard));

    let public = Router::new()
        .route("/", get(|| async { Redirect::to("/events/") }))
        .route("/health", get(health))
        .route("/events/", get(events::upcoming))
        .route("/events/past/", get(events::past))
        .route("/events/:id/", get(events::detail))
        .route("/events/:id/register/", get(events::register_form).post(events::register))
        .route("/events/:id/edit/", get(events::edit_form).post(events::edit))
        .route("/events/:id/cancel/", get(events::cancel).post(events::cancel));

    public
        .merge(accounts)
        .merge(members)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
