// src/handlers/progress.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    catalog::{LessonRegistry, progress},
    error::AppError,
    models::{
        lesson::LessonKey,
        progress::{CompleteLessonRequest, ProgressResponse},
    },
    session::{LearnerSession, SessionLocks, gamification::CompletionOutcome},
    storage::ClientStorage,
    utils::jwt::SessionClaims,
};

/// Completed lessons and per-module progress of the current session.
pub async fn get_progress(
    State(registry): State<Arc<LessonRegistry>>,
    State(storage): State<Arc<dyn ClientStorage>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse, AppError> {
    let session = LearnerSession::init(storage, claims.sub).await;
    session.require_profile()?;

    Ok(Json(ProgressResponse {
        completed: session.completed().iter().cloned().collect(),
        modules: progress::compute_module_summaries(&registry, session.completed()),
    }))
}

/// Marks a lesson as completed and returns what it earned.
///
/// Completing the same lesson twice earns nothing; the response then carries
/// `alreadyCompleted: true` and no reward.
pub async fn complete_lesson(
    State(registry): State<Arc<LessonRegistry>>,
    State(storage): State<Arc<dyn ClientStorage>>,
    State(locks): State<SessionLocks>,
    Extension(claims): Extension<SessionClaims>,
    Path((module_id, lesson_id)): Path<(String, String)>,
    payload: Result<Json<CompleteLessonRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let key = LessonKey::from_parts(&module_id, &lesson_id)
        .ok()
        .filter(|key| registry.contains(key))
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let outcome = CompletionOutcome {
        accuracy: payload.accuracy,
        fast_completion: payload.fast_completion,
    };

    // Held until the reward is persisted, so concurrent completions for one
    // learner apply in turn.
    let _guard = locks.acquire(&claims.sub).await;
    let mut session = LearnerSession::init(storage, claims.sub).await;
    let reward = session
        .complete_lesson(&registry, &key, outcome, Utc::now().date_naive())
        .await?;

    Ok(Json(json!({
        "alreadyCompleted": reward.is_none(),
        "reward": reward,
    })))
}
