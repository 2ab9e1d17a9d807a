pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use crate::config::{DatabaseConfig, StorageBackend};
use models::{Coach, League, Player, Team};

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{CredentialStore, PlayerLookup, Repository, StoreError};

/// Handles to every repository, all backed by one concrete store.
#[derive(Clone)]
pub struct Datastore {
    pub leagues: Arc<dyn Repository<League>>,
    pub teams: Arc<dyn Repository<Team>>,
    pub players: Arc<dyn Repository<Player>>,
    pub player_lookup: Arc<dyn PlayerLookup>,
    pub coaches: Arc<dyn Repository<Coach>>,
    pub credentials: Arc<dyn CredentialStore>,
    manager: Option<DatabaseManager>,
}

impl Datastore {
    fn from_store<S>(store: S, manager: Option<DatabaseManager>) -> Self
    where
        S: Repository<League>
            + Repository<Team>
            + Repository<Player>
            + Repository<Coach>
            + PlayerLookup
            + CredentialStore
            + 'static,
    {
        let store = Arc::new(store);
        Self {
            leagues: store.clone(),
            teams: store.clone(),
            players: store.clone(),
            player_lookup: store.clone(),
            coaches: store.clone(),
            credentials: store,
            manager,
        }
    }

    pub fn memory() -> Self {
        Self::from_store(MemoryStore::new(), None)
    }

    pub fn postgres(manager: DatabaseManager) -> Self {
        Self::from_store(PgStore::new(manager.pool().clone()), Some(manager))
    }

    /// Open the configured backend; Postgres tables are bootstrapped on connect.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.storage {
            StorageBackend::Memory => Ok(Self::memory()),
            StorageBackend::Postgres => {
                let manager = DatabaseManager::connect(config).await?;
                manager.bootstrap_schema().await?;
                Ok(Self::postgres(manager))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        if self.manager.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.manager {
            Some(manager) => manager.health_check().await,
            None => Ok(()),
        }
    }

    pub async fn close(&self) {
        if let Some(manager) = &self.manager {
            manager.close().await;
        }
    }
}
