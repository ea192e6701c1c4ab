//! Session cookie handling: issuing, reading, and the login gate.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

use service::auth::{domain::AuthUser, token};

use crate::errors::AppError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";
pub const LOGIN_PATH: &str = "/events/login/";

fn session_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn start(jar: CookieJar, token: String) -> CookieJar {
    jar.add(session_cookie(token))
}

pub fn end(jar: CookieJar) -> CookieJar {
    jar.remove(session_cookie(String::new()))
}

/// Resolve the logged-in user from the cookie; invalid or expired tokens
/// are treated as anonymous.
pub fn current_user(jar: &CookieJar, secret: &str) -> Option<AuthUser> {
    let raw = jar.get(AUTH_COOKIE)?.value();
    match token::verify(secret, raw) {
        Ok(claims) => Some(claims.user()),
        Err(e) => {
            tracing::debug!(err = %e, "ignoring invalid session cookie");
            None
        }
    }
}

/// Optional user for pages that render differently when logged in.
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.username.clone())
    }
}

#[async_trait]
impl FromRequestParts<ServerState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(MaybeUser(Some(user.clone())));
        }
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(MaybeUser(current_user(&jar, &state.auth.jwt_secret)))
    }
}

/// Route layer for pages that need an account: anonymous requests are sent
/// to the login page, authenticated ones get the `AuthUser` as an extension.
/// The token's user must still exist; a stale session is cleared.
pub async fn require_login(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(claimed) = current_user(&jar, &state.auth.jwt_secret) else {
        tracing::info!(path = %req.uri().path(), "login required; redirecting");
        return Redirect::to(LOGIN_PATH).into_response();
    };
    match models::user::find(&state.db, claimed.id).await {
        Ok(Some(account)) => {
            req.extensions_mut().insert(AuthUser { id: account.id, username: account.username });
            next.run(req).await
        }
        Ok(None) => {
            tracing::info!(user_id = %claimed.id, "session names an unknown user; redirecting");
            (end(jar), Redirect::to(LOGIN_PATH)).into_response()
        }
        Err(e) => AppError::Internal(e.to_string()).into_response(),
    }
}
