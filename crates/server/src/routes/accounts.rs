//! Sign-up, login, logout and the dashboard.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use service::auth::{
    domain::{LoginInput, RegisterInput},
    errors::AuthError,
};

use crate::errors::AppError;
use crate::flash;
use crate::pages::{render, DashboardPage, LoginPage, SignupPage};
use crate::session::{self, MaybeUser, LOGIN_PATH};
use crate::state::ServerState;

pub async fn signup_form(user: MaybeUser, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    let page = SignupPage { flash, username: user.username(), new_username: String::new(), error: None };
    Ok((jar, render(&page)?).into_response())
}

/// Create the account, then log the new user in and send them to the login
/// page.
pub async fn signup(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(input): Form<RegisterInput>,
) -> Result<Response, AppError> {
    let svc = state.auth_service();
    let password = input.password1.clone();
    let requested = input.username.clone();
    let user = match svc.register(input).await {
        Ok(user) => user,
        Err(e @ (AuthError::Validation(_) | AuthError::Conflict)) => {
            let status = if matches!(e, AuthError::Conflict) { StatusCode::CONFLICT } else { StatusCode::BAD_REQUEST };
            let page = SignupPage { flash: None, username: None, new_username: requested, error: Some(e.to_string()) };
            return Ok((status, render(&page)?).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let auth = svc.login(LoginInput { username: user.username, password }).await?;
    let jar = match auth.token {
        Some(token) => session::start(jar, token),
        None => jar,
    };
    Ok((jar, Redirect::to(LOGIN_PATH)).into_response())
}

pub async fn login_form(user: MaybeUser, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    let page = LoginPage { flash, username: user.username(), login_name: String::new(), error: None };
    Ok((jar, render(&page)?).into_response())
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Form(input): Form<LoginInput>,
) -> Result<Response, AppError> {
    let login_name = input.username.clone();
    match state.auth_service().login(input).await {
        Ok(auth) => {
            info!(user_id = %auth.user.id, "session_started");
            let jar = match auth.token {
                Some(token) => session::start(jar, token),
                None => jar,
            };
            Ok((jar, Redirect::to("/events/")).into_response())
        }
        Err(e @ AuthError::Unauthorized) => {
            let page = LoginPage { flash: None, username: None, login_name, error: Some(e.to_string()) };
            Ok((StatusCode::UNAUTHORIZED, render(&page)?).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    (session::end(jar), Redirect::to(LOGIN_PATH)).into_response()
}

pub async fn dashboard(user: MaybeUser, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    let page = DashboardPage { flash, username: user.username() };
    Ok((jar, render(&page)?).into_response())
}
