pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// HS256 needs at least 256 bits of key material.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// `None` when `now + lifetime` falls outside the representable range.
    pub fn new(username: &str, now: DateTime<Utc>, lifetime: Duration) -> Option<Self> {
        let expires = now.checked_add_signed(lifetime)?;
        Some(Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret must be at least {MIN_SECRET_BYTES} bytes")]
    InvalidSecret,

    #[error("JWT lifetime must be a positive number of hours within range")]
    InvalidLifetime,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Issues and validates HS256 bearer tokens.
///
/// Expiry is checked separately from the signature so that an expired but
/// authentic token still yields its subject.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(JwtError::InvalidSecret);
        }
        if lifetime <= Duration::zero() || Utc::now().checked_add_signed(lifetime).is_none() {
            return Err(JwtError::InvalidLifetime);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        let lifetime = i64::try_from(security.jwt_expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or(JwtError::InvalidLifetime)?;
        Self::new(&security.jwt_secret, lifetime)
    }

    pub fn issue(&self, username: &str) -> Result<String, JwtError> {
        self.issue_at(username, Utc::now())
    }

    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims =
            Claims::new(username, now, self.lifetime).ok_or(JwtError::InvalidLifetime)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and structure only; expiry is not checked here.
    pub fn claims(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.claims(token)?;
        if claims.sub.is_empty() {
            return Err(JwtError::InvalidToken("empty subject".to_string()));
        }
        Ok(claims.sub)
    }

    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now())
    }

    /// Unparseable tokens count as expired.
    pub fn is_expired_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.claims(token)
            .map(|claims| claims.is_expired_at(now))
            .unwrap_or(true)
    }

    pub fn is_valid(&self, username: &str, token: &str) -> bool {
        self.is_valid_at(username, token, Utc::now())
    }

    pub fn is_valid_at(&self, username: &str, token: &str, now: DateTime<Utc>) -> bool {
        match self.claims(token) {
            Ok(claims) => claims.sub == username && !claims.is_expired_at(now),
            Err(_) => false,
        }
    }
}
