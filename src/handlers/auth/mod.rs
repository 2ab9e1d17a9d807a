// handlers/auth/mod.rs - credential endpoints under /api/auth
//
// These replies use a numeric `estado` (1 ok, 0 failure) instead of the
// string `estado` that resource errors carry.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::models::Credential;

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthReply {
    /// 1 on success, 0 on failure.
    pub estado: u8,
    pub mensaje: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<Credential>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthReply {
    pub fn ok(mensaje: impl Into<String>) -> Self {
        Self {
            estado: 1,
            mensaje: mensaje.into(),
            usuario: None,
            token: None,
        }
    }

    pub fn failure(status: StatusCode, mensaje: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                estado: 0,
                mensaje: mensaje.into(),
                usuario: None,
                token: None,
            }),
        )
    }
}

/// JSON body for the auth endpoints; a malformed payload is answered with
/// the same `{estado: 0, mensaje}` shape as every other auth failure.
#[derive(Debug)]
pub struct AuthBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AuthBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<AuthReply>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(AuthBody(body)),
            Err(rejection) => Err(AuthReply::failure(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}
