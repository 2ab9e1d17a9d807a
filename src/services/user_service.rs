use std::sync::Arc;
use thiserror::Error;
use tokio::task;

use crate::auth::password;
use crate::database::models::Credential;
use crate::database::repository::{CredentialStore, StoreError};

/// Every account carries the same single authority.
pub const DEFAULT_AUTHORITY: &str = "ROLE_USER";

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the authentication gate attaches to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub username: String,
    pub authorities: Vec<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn CredentialStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, UserServiceError> {
        Ok(self.store.find_by_username(username).await?)
    }

    /// Hash and persist a new credential.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Credential, UserServiceError> {
        if username.trim().is_empty() {
            return Err(UserServiceError::Validation(
                "El nombre de usuario es requerido".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(UserServiceError::Validation(
                "La contraseña es requerida".to_string(),
            ));
        }
        if self.store.find_by_username(username).await?.is_some() {
            return Err(UserServiceError::UserExists(username.to_string()));
        }

        // Argon2 is CPU-bound; keep it off the async workers.
        let plain = password.to_string();
        let hash = task::spawn_blocking(move || password::hash_password(&plain))
            .await
            .map_err(|e| UserServiceError::Hashing(e.to_string()))?
            .map_err(|e| UserServiceError::Hashing(e.to_string()))?;

        match self.store.insert(username, &hash).await {
            Ok(credential) => {
                tracing::info!("Registered user '{}'", credential.username);
                Ok(credential)
            }
            // Lost a race with a concurrent registration.
            Err(StoreError::Duplicate) => {
                Err(UserServiceError::UserExists(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load_user_by_username(
        &self,
        username: &str,
    ) -> Result<UserDetails, UserServiceError> {
        let credential = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserServiceError::UserNotFound(username.to_string()))?;

        Ok(UserDetails {
            username: credential.username,
            authorities: vec![DEFAULT_AUTHORITY.to_string()],
        })
    }

    pub async fn verify_password(
        &self,
        credential: &Credential,
        password: &str,
    ) -> Result<bool, UserServiceError> {
        let plain = password.to_string();
        let hash = credential.password_hash.clone();
        task::spawn_blocking(move || password::verify_password(&plain, &hash))
            .await
            .map_err(|e| UserServiceError::Hashing(e.to_string()))
    }
}
