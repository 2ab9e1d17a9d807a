use axum::extract::FromRef;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{JwtError, TokenService};
use crate::config::AppConfig;
use crate::database::models::{Coach, League, Player, Team};
use crate::database::{DatabaseError, Datastore, PlayerLookup};
use crate::services::{CrudService, UserService};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid JWT configuration: {0}")]
    Jwt(#[from] JwtError),

    #[error("Database initialization failed: {0}")]
    Database(#[from] DatabaseError),
}

/// Shared, immutable per-process wiring handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub datastore: Datastore,
    pub tokens: Arc<TokenService>,
    pub users: UserService,
    pub leagues: CrudService<League>,
    pub teams: CrudService<Team>,
    pub players: CrudService<Player>,
    pub coaches: CrudService<Coach>,
}

impl AppState {
    /// Fails fast on a missing or short JWT secret.
    pub fn new(config: AppConfig, datastore: Datastore) -> Result<Self, StartupError> {
        let tokens = TokenService::from_config(&config.security)?;

        Ok(Self {
            users: UserService::new(datastore.credentials.clone()),
            leagues: CrudService::new(datastore.leagues.clone()),
            teams: CrudService::new(datastore.teams.clone()),
            players: CrudService::new(datastore.players.clone()),
            coaches: CrudService::new(datastore.coaches.clone()),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
            datastore,
        })
    }

    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let datastore = Datastore::connect(&config.database).await?;
        Self::new(config, datastore)
    }

    pub fn in_memory(config: AppConfig) -> Result<Self, StartupError> {
        Self::new(config, Datastore::memory())
    }

    pub fn player_lookup(&self) -> Arc<dyn PlayerLookup> {
        self.datastore.player_lookup.clone()
    }
}

impl FromRef<AppState> for CrudService<League> {
    fn from_ref(state: &AppState) -> Self {
        state.leagues.clone()
    }
}

impl FromRef<AppState> for CrudService<Team> {
    fn from_ref(state: &AppState) -> Self {
        state.teams.clone()
    }
}

impl FromRef<AppState> for CrudService<Player> {
    fn from_ref(state: &AppState) -> Self {
        state.players.clone()
    }
}

impl FromRef<AppState> for CrudService<Coach> {
    fn from_ref(state: &AppState) -> Self {
        state.coaches.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
