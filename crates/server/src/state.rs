use chrono::FixedOffset;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use service::auth::{repo::seaorm::SeaOrmAuthRepository, service::{AuthConfig, AuthService}};

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub session_hours: i64,
}

/// Shared handler state: the connection pool plus the few settings
/// handlers need on every request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    /// Local zone for event form dates and page rendering.
    pub offset: FixedOffset,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(repo, AuthConfig::with_secret(self.auth.jwt_secret.clone(), self.auth.session_hours))
    }
}
