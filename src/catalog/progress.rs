// src/catalog/progress.rs

use std::collections::BTreeSet;

use super::LessonRegistry;
use crate::models::{
    lesson::{LessonKey, LessonRecord, ModuleId},
    module::{LessonProgress, ModuleDetail, ModuleSummary, OverallProgress},
};

/// Lessons a learner has finished. Only ever grows.
pub type CompletionSet = BTreeSet<LessonKey>;

/// `round(done / total * 100)`, or 0 for an empty total.
pub fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done.min(total) as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Summaries of every module, in module order.
///
/// Recomputed in full from the completed-set on every call.
pub fn compute_module_summaries(
    registry: &LessonRegistry,
    completed: &CompletionSet,
) -> Vec<ModuleSummary> {
    registry
        .module_ids()
        .iter()
        .filter_map(|id| compute_module_summary(registry, id, completed))
        .collect()
}

/// Summary of one module; `None` when it has no lessons.
pub fn compute_module_summary(
    registry: &LessonRegistry,
    id: &ModuleId,
    completed: &CompletionSet,
) -> Option<ModuleSummary> {
    let lessons: Vec<&LessonRecord> = registry.lessons_of(id).collect();
    if lessons.is_empty() {
        return None;
    }

    let info = registry.module_info(id);
    let total = lessons.len();
    let done = lessons.iter().filter(|l| completed.contains(&l.key)).count();
    let progress = percentage(done, total);

    Some(ModuleSummary {
        id: id.clone(),
        title: info.title,
        description: info.description,
        difficulty: info.difficulty,
        lessons: lessons.iter().map(|l| l.key.clone()).collect(),
        duration: lessons
            .iter()
            .fold(0u32, |total, l| total.saturating_add(l.duration)),
        completed_lessons: done,
        total_lessons: total,
        progress,
        is_completed: progress == 100,
    })
}

/// Module summary plus per-lesson completion and lock flags.
pub fn compute_module_detail(
    registry: &LessonRegistry,
    id: &ModuleId,
    completed: &CompletionSet,
) -> Option<ModuleDetail> {
    let summary = compute_module_summary(registry, id, completed)?;

    let lesson_progress = registry
        .lessons_of(id)
        .map(|lesson| lesson_progress(registry, lesson, completed))
        .collect();

    Some(ModuleDetail {
        summary,
        lesson_progress,
    })
}

pub fn lesson_progress(
    registry: &LessonRegistry,
    lesson: &LessonRecord,
    completed: &CompletionSet,
) -> LessonProgress {
    // Prerequisites the registry does not know about never lock a lesson.
    let locked = lesson
        .prerequisite_keys()
        .any(|key| registry.contains(&key) && !completed.contains(&key));

    LessonProgress {
        id: lesson.key.clone(),
        title: lesson.title.clone(),
        duration: lesson.duration,
        difficulty: lesson.difficulty,
        completed: completed.contains(&lesson.key),
        locked,
    }
}

pub fn overall_progress(registry: &LessonRegistry, completed: &CompletionSet) -> OverallProgress {
    let summaries = compute_module_summaries(registry, completed);
    let completed_lessons: usize = summaries.iter().map(|s| s.completed_lessons).sum();
    let total_lessons: usize = summaries.iter().map(|s| s.total_lessons).sum();

    OverallProgress {
        completed_lessons,
        total_lessons,
        completed_modules: summaries.iter().filter(|s| s.is_completed).count(),
        total_modules: summaries.len(),
        progress: percentage(completed_lessons, total_lessons),
    }
}
