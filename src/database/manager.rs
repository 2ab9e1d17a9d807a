use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Tables are created idempotently at startup. Schema evolution is out of scope.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE CHECK (username <> ''),
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS coaches (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        experience INTEGER,
        nationality TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leagues (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        country TEXT NOT NULL,
        current_season TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        city TEXT,
        coach_id BIGINT UNIQUE REFERENCES coaches(id),
        league_id BIGINT REFERENCES leagues(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        position TEXT,
        nationality TEXT,
        team_id BIGINT REFERENCES teams(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS players_team_id_idx ON players(team_id)",
];

/// Owns the Postgres connection pool.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create any missing tables.
    pub async fn bootstrap_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
