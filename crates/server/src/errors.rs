use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use models::errors::ModelError;
use service::{auth::errors::AuthError, errors::ServiceError};

use crate::pages::{render, ErrorPage};

/// Handler failure rendered as an HTML error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found() -> Self { AppError::NotFound("Page not found".into()) }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) | ServiceError::Model(ModelError::NotFound(_)) => AppError::not_found(),
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => AppError::BadRequest(msg),
            AuthError::Conflict => AppError::Conflict(AuthError::Conflict.to_string()),
            AuthError::Unauthorized => AppError::Unauthorized(AuthError::Unauthorized.to_string()),
            other => AppError::Internal(format!("[{}] {}", other.code(), other)),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self { AppError::Internal(format!("template: {e}")) }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(detail) => {
                error!(error = %detail, "request failed");
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        };
        let page = ErrorPage { flash: None, username: None, status: status.as_u16(), message };
        match render(&page) {
            Ok(html) => (status, html).into_response(),
            Err(_) => (status, Html(page.message)).into_response(),
        }
    }
}
