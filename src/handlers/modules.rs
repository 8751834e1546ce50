// src/handlers/modules.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use super::completed_for;
use crate::{
    catalog::{LessonRegistry, progress},
    error::AppError,
    models::lesson::ModuleId,
    storage::ClientStorage,
    utils::jwt::MaybeSession,
};

/// List every module with progress for the caller's session.
/// Anonymous callers see zero progress.
pub async fn list_modules(
    State(registry): State<Arc<LessonRegistry>>,
    State(storage): State<Arc<dyn ClientStorage>>,
    Extension(session): Extension<MaybeSession>,
) -> Result<impl IntoResponse, AppError> {
    let completed = completed_for(&storage, &session).await;
    Ok(Json(progress::compute_module_summaries(&registry, &completed)))
}

/// Get one module with per-lesson completion and lock state.
pub async fn get_module(
    State(registry): State<Arc<LessonRegistry>>,
    State(storage): State<Arc<dyn ClientStorage>>,
    Extension(session): Extension<MaybeSession>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound(format!("Module '{}' not found", module_id));

    let id = ModuleId::new(module_id.as_str()).map_err(|_| not_found())?;
    let completed = completed_for(&storage, &session).await;

    let detail = progress::compute_module_detail(&registry, &id, &completed).ok_or_else(not_found)?;
    Ok(Json(detail))
}
