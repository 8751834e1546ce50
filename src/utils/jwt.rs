// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::profile::Role};

/// Session token claims.
///
/// The token is a handle on a learner's storage scope, not proof of identity.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionClaims {
    /// Subject - the learner session id (storage scope).
    pub sub: String,
    pub role: Role,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Session claims when the request may be anonymous.
#[derive(Debug, Clone, Default)]
pub struct MaybeSession(pub Option<SessionClaims>);

/// Signs a new session token for `session_id`, valid for `ttl_seconds`.
pub fn sign_session_token(
    session_id: &str,
    role: Role,
    secret: &str,
    ttl_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + ttl_seconds as usize;

    let claims = SessionClaims {
        sub: session_id.to_owned(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid session token".to_string()))?;

    Ok(token_data.claims)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Axum Middleware: required session.
///
/// Validates the `Authorization: Bearer <token>` header and injects
/// `SessionClaims` into the request extensions. Returns 401 otherwise.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)
        .ok_or(AppError::AuthError("Missing session token".to_string()))?;

    let claims = verify_session_token(token, &config.session_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Axum Middleware: optional session.
///
/// Always injects `MaybeSession`; a missing or invalid token yields an
/// anonymous request instead of a rejection.
pub async fn optional_session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let claims = bearer_token(&req)
        .and_then(|token| verify_session_token(token, &config.session_secret).ok());

    req.extensions_mut().insert(MaybeSession(claims));
    next.run(req).await
}
