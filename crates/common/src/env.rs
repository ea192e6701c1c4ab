//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{path} exists but is not a directory")]
    NotADirectory { path: String },
}

/// Check the static asset directory. A missing directory is only warned
/// about (pages still render without stylesheets); a path that points to a
/// regular file is an error.
pub async fn ensure_env(static_dir: &str) -> Result<(), EnvError> {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if !meta.is_dir() => Err(EnvError::NotADirectory { path: static_dir.to_string() }),
        Ok(_) => Ok(()),
        Err(_) => {
            warn!(%static_dir, "static assets directory not found; /static requests will 404");
            Ok(())
        }
    }
}
