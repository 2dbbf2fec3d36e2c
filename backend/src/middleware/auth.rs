//! Bearer identity middleware
//!
//! Tokens are issued elsewhere; this server only verifies them. Identity is
//! optional on every route, so a missing or unusable token never blocks a
//! request here. Routes that need an identity ask for [`CurrentUser`], which
//! rejects with 401 and the reason the token was refused.

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::AppState;

/// Identity of the caller taken from a verified token
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub user_id: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Decode and validate an HS256 token
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Why a presented bearer token was not accepted
#[derive(Clone, Debug)]
pub struct RejectedToken(pub String);

/// Verify a bearer token and return the caller's identity
pub fn identify(token: &str, secret: &str) -> Result<Identity, String> {
    let claims = decode_token(token, secret)?;
    if claims.sub.trim().is_empty() {
        return Err("Token has no subject".to_string());
    }
    Ok(Identity {
        user_id: claims.sub,
    })
}

/// Attaches an [`Identity`] to requests carrying a valid bearer token, or a
/// [`RejectedToken`] when the token does not verify
pub async fn identity_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        match identify(bearer.token(), &state.config.jwt.secret) {
            Ok(identity) => {
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::warn!("Ignoring bearer token on {}: {}", request.uri().path(), e);
                request.extensions_mut().insert(RejectedToken(e));
            }
        }
    }

    next.run(request).await
}

/// Extractor for an identified caller
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Identity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(CurrentUser(identity.clone()));
        }
        match parts.extensions.get::<RejectedToken>() {
            Some(RejectedToken(reason)) => Err(AppError::Unauthorized(reason.clone())),
            None => Err(AppError::Unauthorized("Authentication required".to_string())),
        }
    }
}
