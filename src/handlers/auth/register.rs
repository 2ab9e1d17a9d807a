// handlers/auth/register.rs - POST /api/auth/register

use axum::{extract::State, http::StatusCode, Json};

use super::{AuthBody, AuthReply, CredentialsRequest};
use crate::error::ApiError;
use crate::services::{UserService, UserServiceError};

/// Create an account. The password is stored only as an Argon2id hash.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Usuario registrado", body = AuthReply),
        (status = 400, description = "Usuario o contraseña vacíos", body = AuthReply),
        (status = 409, description = "El usuario ya existe", body = AuthReply),
        (status = 500, description = "Error interno")
    )
)]
pub async fn register(
    State(users): State<UserService>,
    AuthBody(request): AuthBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthReply>), ApiError> {
    match users.register(&request.username, &request.password).await {
        Ok(credential) => Ok((
            StatusCode::CREATED,
            Json(AuthReply {
                usuario: Some(credential),
                ..AuthReply::ok("Usuario registrado")
            }),
        )),
        Err(UserServiceError::UserExists(_)) => {
            Ok(AuthReply::failure(StatusCode::CONFLICT, "El usuario ya existe"))
        }
        Err(UserServiceError::Validation(msg)) => {
            Ok(AuthReply::failure(StatusCode::BAD_REQUEST, msg))
        }
        Err(e) => {
            tracing::error!("Registration of '{}' failed: {}", request.username, e);
            Err(ApiError::internal("Error al registrar el usuario"))
        }
    }
}
