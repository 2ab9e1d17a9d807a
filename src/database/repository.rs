use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Credential, Entity, Player};

/// Failures surfaced by any datastore implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("Duplicate value for a unique field")]
    Duplicate,

    /// Foreign-key or not-null violation, with a client-safe message.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation => StoreError::Duplicate,
                ErrorKind::ForeignKeyViolation => StoreError::Constraint(
                    "El registro referenciado no existe o sigue en uso".to_string(),
                ),
                ErrorKind::NotNullViolation => {
                    StoreError::Constraint("Faltan campos requeridos".to_string())
                }
                ErrorKind::CheckViolation => {
                    StoreError::Constraint("Valor fuera de rango".to_string())
                }
                _ => StoreError::Backend(db.to_string()),
            },
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Key-based CRUD access for one entity kind.
///
/// `save` inserts when the entity has no id and updates otherwise; updating a
/// missing id yields [`StoreError::NotFound`].
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn find_all(&self) -> Result<Vec<T>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, StoreError>;

    async fn save(&self, entity: T) -> Result<T, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PlayerLookup: Send + Sync {
    async fn find_by_team(&self, team_id: i64) -> Result<Vec<Player>, StoreError>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the username is taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<Credential, StoreError>;
}
