use tracing_subscriber::EnvFilter;

use deportes_api::{app, config::config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deportes_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting Deportes API in {:?} mode", config.environment);

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; signing tokens with the development secret");
    }
    if !config.security.verify_login_password {
        tracing::warn!("Login does not verify passwords (SECURITY_VERIFY_LOGIN_PASSWORD=false)");
    }

    let state = match AppState::from_config(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };
    let datastore = state.datastore.clone();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Deportes API listening on http://{} ({} storage)",
        bind_addr,
        datastore.backend_name()
    );

    if let Err(e) = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    datastore.close().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
