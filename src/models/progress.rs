// src/models/progress.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{lesson::LessonKey, module::ModuleSummary};

/// DTO for marking a lesson as completed.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    /// Quiz accuracy in `[0, 1]`, when the learner took the quiz.
    #[validate(range(min = 0.0, max = 1.0, message = "Accuracy must be between 0 and 1."))]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub fast_completion: bool,
}

/// DTO for submitting quiz answers, one per question in order.
#[derive(Debug, Deserialize, Validate)]
pub struct QuizSubmission {
    #[validate(length(min = 1, max = 100, message = "At least one answer is required."))]
    pub answers: Vec<String>,
}

/// Result of grading a quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
    pub correct: usize,
    pub total: usize,
    /// `correct / total`, `0.0` for an empty quiz.
    pub accuracy: f64,
    pub results: Vec<bool>,
}

/// Snapshot of a learner's completed lessons and module summaries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub completed: Vec<LessonKey>,
    pub modules: Vec<ModuleSummary>,
}
