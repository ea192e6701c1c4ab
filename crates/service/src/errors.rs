use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// The message to show the user when the input was rejected, from
    /// either layer; `None` for every other failure.
    pub fn validation_message(&self) -> Option<&str> {
        use models::errors::ModelError;
        match self {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => Some(msg),
            _ => None,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::Db(e.to_string()) }
}
