#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::FixedOffset;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use configs::DatabaseConfig;
use server::{routes, state::{ServerAuthConfig, ServerState}};

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// Router over a fresh in-memory database.
pub async fn build_app() -> anyhow::Result<TestApp> {
    let db = models::db::connect_and_migrate(&DatabaseConfig::sqlite_memory()).await?;
    let state = ServerState {
        db: db.clone(),
        auth: ServerAuthConfig { jwt_secret: "test-secret".into(), session_hours: 1 },
        offset: FixedOffset::east_opt(0).expect("utc offset"),
    };
    Ok(TestApp { router: routes::build_router(state, "static"), db })
}

impl TestApp {
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        Ok(self.router.clone().oneshot(req.body(Body::empty())?).await?)
    }

    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        Ok(self.router.clone().oneshot(req.body(Body::from(form.to_string()))?).await?)
    }

    /// Sign up and return the `auth_token=...` cookie pair.
    pub async fn signup(&self, username: &str) -> anyhow::Result<String> {
        let form = format!("username={username}&password1=Str0ngPass&password2=Str0ngPass");
        let resp = self.post_form("/events/register/", &form, None).await?;
        anyhow::ensure!(resp.status().is_redirection(), "signup failed: {}", resp.status());
        cookie_pair(&resp, "auth_token").ok_or_else(|| anyhow::anyhow!("no session cookie"))
    }
}

/// `name=value` of a cookie set by the response.
pub fn cookie_pair(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

pub async fn body_text(resp: Response<Body>) -> anyhow::Result<String> {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
