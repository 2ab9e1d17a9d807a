// HTTP API Error Types
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::database::models::Labels;
use crate::database::repository::StoreError;

/// Body of every resource error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorReply {
    /// "Error", "No encontrado", "Petición inválida" or "No autorizado".
    pub estado: String,
    pub mensaje: String,
}

/// HTTP API error. Every variant renders as an [`ErrorReply`].
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    InvalidArgument(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value of the `estado` field
    pub fn estado(&self) -> &'static str {
        match self {
            ApiError::InvalidArgument(_) => "Petición inválida",
            ApiError::Unauthorized(_) => "No autorizado",
            ApiError::NotFound(_) => "No encontrado",
            ApiError::Internal(_) => "Error",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidArgument(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    pub fn reply(&self) -> ErrorReply {
        ErrorReply {
            estado: self.estado().to_string(),
            mensaje: self.message().to_string(),
        }
    }
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// "No se encontró una liga con el ID proporcionado"
    pub fn entity_not_found(labels: &Labels) -> Self {
        Self::not_found(format!(
            "No se encontró {} con el ID proporcionado",
            labels.indefinite
        ))
    }

    /// Map a failed insert/update. Constraint failures are the client's fault;
    /// anything else is logged and hidden behind `fallback`.
    pub fn from_write(err: StoreError, labels: &Labels, fallback: String) -> Self {
        match err {
            StoreError::Duplicate => Self::invalid_argument(format!(
                "Ya existe {} con ese nombre o con esa referencia única",
                labels.indefinite
            )),
            StoreError::Constraint(msg) => Self::invalid_argument(msg),
            StoreError::NotFound => Self::entity_not_found(labels),
            StoreError::Backend(msg) => {
                tracing::error!("Write to {} failed: {}", labels.plural, msg);
                Self::internal(fallback)
            }
        }
    }

    /// Map any failure that should surface as a generic 500.
    pub fn from_store(err: StoreError, fallback: impl Into<String>) -> Self {
        tracing::error!("Datastore error: {}", err);
        Self::internal(fallback)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_argument(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.estado(), self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.reply())).into_response()
    }
}

/// `Json<T>` whose rejection renders as a 400 `Petición inválida` body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
