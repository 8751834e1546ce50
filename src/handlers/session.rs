// src/handlers/session.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    catalog::{LessonRegistry, progress},
    config::Config,
    error::AppError,
    models::profile::{Role, StartSessionRequest, UpdateProfileRequest},
    session::{LearnerSession, SessionLocks, gamification::BadgeInfo},
    storage::ClientStorage,
    utils::jwt::{SessionClaims, sign_session_token},
};

/// Starts a learner session and returns its token.
///
/// There is no password: the token only identifies the storage scope that
/// holds the learner's profile and progress.
pub async fn start_session(
    State(storage): State<Arc<dyn ClientStorage>>,
    State(config): State<Config>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let role = if config.is_admin_email(&payload.email) {
        Role::Admin
    } else {
        Role::User
    };

    let session = LearnerSession::start(storage, payload.name, payload.email, role).await?;
    let token = sign_session_token(
        session.id(),
        role,
        &config.session_secret,
        config.session_ttl,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "type": "Bearer",
            "profile": session.require_profile()?,
        })),
    ))
}

/// Current profile, badges and overall progress.
pub async fn get_session(
    State(registry): State<Arc<LessonRegistry>>,
    State(storage): State<Arc<dyn ClientStorage>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let session = LearnerSession::init(storage, claims.sub).await;
    let profile = session.require_profile()?;

    let badges: Vec<BadgeInfo> = session
        .gamification()
        .unlocked_badges
        .iter()
        .map(|badge| BadgeInfo::from(*badge))
        .collect();

    Ok(Json(json!({
        "profile": profile,
        "badges": badges,
        "lastActivity": session.gamification().last_activity,
        "overall": progress::overall_progress(&registry, session.completed()),
    })))
}

pub async fn update_session(
    State(storage): State<Arc<dyn ClientStorage>>,
    State(locks): State<SessionLocks>,
    Extension(claims): Extension<SessionClaims>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let _guard = locks.acquire(&claims.sub).await;
    let mut session = LearnerSession::init(storage, claims.sub).await;
    let profile = session.update_profile(payload).await?;

    Ok(Json(profile.clone()))
}

/// Ends the session and deletes its stored state.
pub async fn end_session(
    State(storage): State<Arc<dyn ClientStorage>>,
    State(locks): State<SessionLocks>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let _guard = locks.acquire(&claims.sub).await;
    let session = LearnerSession::init(storage, claims.sub).await;
    session.require_profile()?;
    session.teardown().await?;

    Ok(StatusCode::NO_CONTENT)
}
