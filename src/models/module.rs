// src/models/module.rs

use serde::{Deserialize, Serialize};

use super::lesson::{Difficulty, LessonKey, ModuleId};

/// Static module metadata from `modules.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl ModuleInfo {
    /// Metadata used when a module has lessons but no entry in `modules.json`.
    pub fn fallback(id: &ModuleId) -> Self {
        Self {
            id: id.clone(),
            title: format!("Module {id}"),
            description: String::new(),
            difficulty: Difficulty::Beginner,
        }
    }
}

/// Derived view of a module against a learner's completed-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub lessons: Vec<LessonKey>,
    /// Sum of lesson durations, in minutes.
    pub duration: u32,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    /// Rounded percentage in `[0, 100]`.
    pub progress: u8,
    pub is_completed: bool,
}

/// Per-lesson completion flags inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub id: LessonKey,
    pub title: String,
    pub duration: u32,
    pub difficulty: Difficulty,
    pub completed: bool,
    /// A prerequisite held by the registry is not completed yet.
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetail {
    #[serde(flatten)]
    pub summary: ModuleSummary,
    pub lesson_progress: Vec<LessonProgress>,
}

/// Totals across every module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub progress: u8,
}
