// src/handlers/lessons.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use validator::Validate;

use super::completed_for;
use crate::{
    catalog::{LessonFilter, LessonRegistry, quiz::grade_quiz},
    error::AppError,
    models::{
        lesson::{LessonRef, LessonView, PublicLesson},
        progress::QuizSubmission,
    },
    storage::ClientStorage,
    utils::jwt::MaybeSession,
};

/// List lessons in key order, optionally filtered by difficulty, tag or text.
pub async fn list_lessons(
    State(registry): State<Arc<LessonRegistry>>,
    filter: Result<Query<LessonFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = filter?;
    let lessons: Vec<PublicLesson> = registry
        .search(&filter)
        .into_iter()
        .map(PublicLesson::from)
        .collect();

    Ok(Json(lessons))
}

/// List the lessons of one module. Unknown modules have no lessons.
pub async fn list_module_lessons(
    State(registry): State<Arc<LessonRegistry>>,
    Path(module_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lessons: Vec<PublicLesson> = registry
        .get_module_lessons(&module_id)
        .into_iter()
        .map(PublicLesson::from)
        .collect();

    Ok(Json(lessons))
}

/// Get a single lesson with its prerequisites and neighbours.
///
/// The `completed` flag reflects the caller's session, if any.
pub async fn get_lesson(
    State(registry): State<Arc<LessonRegistry>>,
    State(storage): State<Arc<dyn ClientStorage>>,
    Extension(session): Extension<MaybeSession>,
    Path((module_id, lesson_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = registry
        .get_lesson(&module_id, &lesson_id)
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let completed = completed_for(&storage, &session).await;
    let (previous, next) = registry.adjacent(&lesson.key);

    Ok(Json(LessonView {
        lesson: PublicLesson::from(lesson),
        prerequisite_lessons: registry.prerequisite_refs(lesson),
        previous: previous.map(LessonRef::from),
        next: next.map(LessonRef::from),
        completed: completed.contains(&lesson.key),
    }))
}

/// Grade quiz answers for a lesson.
///
/// Grading is stateless; the client reports the accuracy when it completes
/// the lesson.
pub async fn submit_quiz(
    State(registry): State<Arc<LessonRegistry>>,
    Path((module_id, lesson_id)): Path<(String, String)>,
    payload: Result<Json<QuizSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let lesson = registry
        .get_lesson(&module_id, &lesson_id)
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;
    let quiz = lesson
        .quiz
        .as_ref()
        .ok_or(AppError::NotFound("Lesson has no quiz".to_string()))?;

    if payload.answers.len() > quiz.questions.len() {
        return Err(AppError::BadRequest(format!(
            "Quiz has {} questions but {} answers were given",
            quiz.questions.len(),
            payload.answers.len()
        )));
    }

    Ok(Json(grade_quiz(quiz, &payload.answers)))
}
