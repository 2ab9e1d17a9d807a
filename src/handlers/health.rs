use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Deportes API",
        "version": version,
        "endpoints": {
            "auth": "/api/auth/register, /api/auth/login (public)",
            "ligas": "/api/ligas[/:id] (GET public, POST/PUT/DELETE bearer token)",
            "equipos": "/api/equipos[/:id] (GET public, POST/PUT/DELETE bearer token)",
            "jugadores": "/api/jugadores[/:id] (GET public, POST/PUT/DELETE bearer token)",
            "entrenadores": "/api/entrenadores[/:id] (GET public, POST/PUT/DELETE bearer token)",
            "roster": "/api/equipos/:id/jugadores (public)",
            "health": "/health (public)",
            "docs": "/swagger-ui, /api-docs/openapi.json (public)",
        }
    }))
}

/// GET /health - datastore connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Datastore reachable"),
        (status = 503, description = "Datastore unavailable")
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.datastore.backend_name();

    match state.datastore.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": backend,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": backend,
                    "database_error": "unavailable",
                })),
            )
        }
    }
}
