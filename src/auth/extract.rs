//! Bearer-token extractor for authenticated routes

use crate::auth::handler::AuthState;
use crate::auth::jwt::extract_bearer;
use crate::auth::types::User;
use crate::error::Error;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

/// The authenticated caller. Add it as a handler argument to require a
/// valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer)
            .ok_or_else(|| Error::Unauthorized("Not authenticated".into()))?;

        let claims = auth.tokens.verify(token)?;

        let record = auth
            .users
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| Error::Unauthorized("Could not validate credentials".into()))?;

        Ok(AuthUser(record.user))
    }
}
