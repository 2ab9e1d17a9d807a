// handlers/auth/login.rs - POST /api/auth/login

use axum::{extract::State, http::StatusCode, Json};

use super::{AuthBody, AuthReply, CredentialsRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// Issue a bearer token for an existing account.
///
/// The password is only checked when `security.verify_login_password` is on;
/// otherwise any password is accepted for a known username.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Usuario logueado, con token", body = AuthReply),
        (status = 401, description = "Credenciales inválidas", body = AuthReply),
        (status = 404, description = "Usuario no encontrado", body = AuthReply),
        (status = 500, description = "Error interno")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AuthBody(request): AuthBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthReply>), ApiError> {
    let credential = state
        .users
        .find_by_username(&request.username)
        .await
        .map_err(|e| {
            tracing::error!("Login lookup for '{}' failed: {}", request.username, e);
            ApiError::internal("Error al iniciar sesión")
        })?;

    let Some(credential) = credential else {
        return Ok(AuthReply::failure(StatusCode::NOT_FOUND, "Usuario no encontrado"));
    };

    if state.config.security.verify_login_password {
        let matches = state
            .users
            .verify_password(&credential, &request.password)
            .await
            .map_err(|e| {
                tracing::error!("Password check for '{}' failed: {}", credential.username, e);
                ApiError::internal("Error al iniciar sesión")
            })?;

        if !matches {
            tracing::warn!("Rejected login for '{}': wrong password", credential.username);
            return Ok(AuthReply::failure(
                StatusCode::UNAUTHORIZED,
                "Credenciales inválidas",
            ));
        }
    }

    let token = state.tokens.issue(&credential.username).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal("Error al generar el token")
    })?;

    tracing::info!("Issued token for '{}'", credential.username);
    Ok((
        StatusCode::OK,
        Json(AuthReply {
            token: Some(token),
            ..AuthReply::ok("Usuario logueado")
        }),
    ))
}
