use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::services::{UserDetails, UserServiceError};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller attached to a request by the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<String>,
}

impl From<UserDetails> for Principal {
    fn from(details: UserDetails) -> Self {
        Self {
            username: details.username,
            authorities: details.authorities,
        }
    }
}

/// Per-request authentication state. Lives in request extensions, never in
/// shared state, so concurrent requests cannot observe each other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl AuthContext {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthContext::Authenticated(principal) => Some(principal),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }
}

/// Runs on every request and never rejects: it only decides whether the
/// request is authenticated. Route-level guards enforce the decision.
pub async fn authentication_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let already_authenticated = request
        .extensions()
        .get::<AuthContext>()
        .is_some_and(AuthContext::is_authenticated);

    if !already_authenticated {
        let context = match bearer_token(request.headers()) {
            Some(token) => authenticate(&state, token).await,
            None => AuthContext::Anonymous,
        };
        request.extensions_mut().insert(context);
    }

    next.run(request).await
}

/// Route guard for write operations.
pub async fn require_authentication(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<AuthContext>()
        .and_then(AuthContext::principal)
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Se requiere un token válido"))?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Token after `Bearer `, or `None` when the header is absent or uses another scheme.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

async fn authenticate(state: &AppState, token: &str) -> AuthContext {
    // Malformed tokens fall through as anonymous rather than failing the request.
    let username = match state.tokens.extract_subject(token) {
        Ok(username) => username,
        Err(e) => {
            tracing::debug!("Ignoring bearer token: {}", e);
            return AuthContext::Anonymous;
        }
    };

    let details = match state.users.load_user_by_username(&username).await {
        Ok(details) => details,
        Err(UserServiceError::UserNotFound(_)) => {
            tracing::warn!("Token subject '{}' has no account", username);
            return AuthContext::Anonymous;
        }
        Err(e) => {
            tracing::error!("User lookup failed during authentication: {}", e);
            return AuthContext::Anonymous;
        }
    };

    if state.tokens.is_valid(&details.username, token) {
        tracing::debug!("Authenticated request for '{}'", details.username);
        AuthContext::Authenticated(details.into())
    } else {
        tracing::debug!("Rejected expired or mismatched token for '{}'", username);
        AuthContext::Anonymous
    }
}
