use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Development-only signing secret, used when `JWT_SECRET` is unset outside production.
const DEV_JWT_SECRET: &str = "deportes-dev-secret-change-me-before-deploying-anywhere";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub storage: StorageBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Extra allowed origins; `http://localhost:*` is always allowed.
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Login historically issued tokens without checking the password.
    pub verify_login_password: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server
        if let Some(port) = env::var("DEPORTES_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database
        if let Ok(v) = env::var("STORAGE") {
            self.database.storage = match v.to_ascii_lowercase().as_str() {
                "memory" | "mem" => StorageBackend::Memory,
                _ => StorageBackend::Postgres,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_VERIFY_LOGIN_PASSWORD") {
            self.security.verify_login_password =
                v.parse().unwrap_or(self.security.verify_login_password);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                storage: StorageBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                cors_origins: vec!["https://eje-10.vercel.app".to_string()],
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24,
                verify_login_password: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                storage: StorageBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                cors_origins: vec!["https://eje-10.vercel.app".to_string()],
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24,
                verify_login_password: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                storage: StorageBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                cors_origins: vec!["https://eje-10.vercel.app".to_string()],
                // No fallback: TokenService refuses to start with an empty secret.
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                verify_login_password: false,
            },
        }
    }

    /// In-memory configuration used by tests and `STORAGE=memory` runs.
    pub fn in_memory() -> Self {
        let mut config = Self::development();
        config.database.storage = StorageBackend::Memory;
        config
    }

    /// True when the dev fallback secret is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.security.jwt_secret == DEV_JWT_SECRET
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
