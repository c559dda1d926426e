//! Access token issuance and validation
//!
//! HS256-signed JWTs carrying the username as `sub`. Tokens are stateless;
//! validation only checks signature and expiry, the caller then loads the user.

use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEV_SECRET: &str = "daybook-dev-secret-not-for-production-use";
const MIN_SECRET_LEN: usize = 32;

/// Payload stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expiration (unix seconds)
    pub exp: u64,
}

/// Signs and verifies access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_seconds: u64,
}

impl TokenIssuer {
    /// Create an issuer. The secret must be at least 32 characters.
    pub fn new(secret: String, expiry_minutes: u64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config(format!(
                "JWT secret must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            secret,
            expiry_seconds: expiry_minutes.saturating_mul(60),
        })
    }

    /// Issuer with a fixed development secret
    pub fn new_dev(expiry_minutes: u64) -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            expiry_seconds: expiry_minutes.saturating_mul(60),
        }
    }

    /// Issue a token for `username`
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.issue_at(username, now)
    }

    fn issue_at(&self, username: &str, now: u64) -> Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now.saturating_add(self.expiry_seconds),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::Auth(format!("Failed to generate token: {}", e)))
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| {
            let reason = match err.kind() {
                ErrorKind::ExpiredSignature => "Token expired",
                ErrorKind::InvalidSignature => "Invalid signature",
                ErrorKind::InvalidToken => "Invalid token",
                _ => "Could not validate credentials",
            };
            Error::Unauthorized(reason.to_string())
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
