use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for user records, keyed by unique email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the user unless the email is taken. The uniqueness check and
    /// the write are one atomic step.
    async fn insert_if_absent(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Exact email match, full record including the hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Profile projection, the hash is never read.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_if_absent(&self, new_user: NewUser) -> Result<User, StoreError> {
        // The UNIQUE constraint on email decides; a losing writer gets no row back.
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .fetch_optional(&self.db)
        .await;

        match inserted {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!(email = %new_user.email, "insert skipped, email taken");
                Err(StoreError::Conflict)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(profile)
    }
}

#[cfg(test)]
pub use memory::MemoryUserStore;
