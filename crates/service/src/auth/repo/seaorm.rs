use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use models::errors::ModelError;
use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_user(u: models::user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username }
}

fn to_credentials(c: models::user_credentials::Model) -> Credentials {
    Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }
}

fn repo_err(e: impl ToString) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_username(&self.db, username).await.map_err(repo_err)?;
        Ok(res.map(to_user))
    }

    async fn create_user_with_password(
        &self,
        username: &str,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let created = match models::user::create(&txn, username).await {
            Ok(created) => created,
            Err(e) => {
                // the transaction holds a connection; release it before looking again
                txn.rollback().await.map_err(repo_err)?;
                if let ModelError::Validation(msg) = e {
                    return Err(AuthError::Validation(msg));
                }
                // lost a sign-up race on the unique username
                if self.find_user_by_username(username).await?.is_some() {
                    tracing::debug!(err = %e, "username taken concurrently");
                    return Err(AuthError::Conflict);
                }
                return Err(repo_err(e));
            }
        };
        if let Err(e) = models::user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm).await {
            txn.rollback().await.map_err(repo_err)?;
            return Err(repo_err(e));
        }
        txn.commit().await.map_err(repo_err)?;
        Ok(to_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await.map_err(repo_err)?;
        Ok(res.map(to_credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn failed_credentials_leave_no_user_behind() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmAuthRepository { db: db.clone() };

        // a blank hash is refused by the credentials step, after the user insert
        let res = repo.create_user_with_password("halfway", " ".into(), "argon2".into()).await;
        assert!(matches!(res, Err(AuthError::Repository(_))));
        assert!(repo.find_user_by_username("halfway").await?.is_none());

        // the name is still free afterwards
        let user = repo.create_user_with_password("halfway", "hash".into(), "argon2".into()).await?;
        let creds = repo.get_credentials(user.id).await?.expect("credentials stored");
        assert_eq!(creds.password_hash, "hash");
        Ok(())
    }

    #[tokio::test]
    async fn taken_and_invalid_usernames() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmAuthRepository { db };
        repo.create_user_with_password("twice", "hash".into(), "argon2".into()).await?;
        let again = repo.create_user_with_password("twice", "hash".into(), "argon2".into()).await;
        assert!(matches!(again, Err(AuthError::Conflict)));
        let bad = repo.create_user_with_password("has space", "hash".into(), "argon2".into()).await;
        assert!(matches!(bad, Err(AuthError::Validation(_))));
        Ok(())
    }
}
