// src/catalog/resolver.rs

use std::collections::HashSet;

use crate::models::lesson::{KEY_SEPARATOR, LessonRecord, ModuleId};

/// Ordered, de-duplicated module ids of a lesson sequence.
///
/// Ids are collected in first-seen order and then sorted with the
/// [`ModuleId`] ordering, so the result only depends on the set of lessons.
pub fn resolve_module_ids<'a>(lessons: impl IntoIterator<Item = &'a LessonRecord>) -> Vec<ModuleId> {
    collect_sorted(lessons.into_iter().map(|lesson| lesson.key.module.clone()))
}

/// Same as [`resolve_module_ids`] over raw string keys.
///
/// Keys without a separator, or with an unusable module segment, are skipped.
pub fn resolve_module_ids_from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<ModuleId> {
    collect_sorted(keys.into_iter().filter_map(|key| {
        let (module, _) = key.split_once(KEY_SEPARATOR)?;
        match ModuleId::new(module) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!("Skipping lesson key {:?}: {}", key, e);
                None
            }
        }
    }))
}

fn collect_sorted(ids: impl Iterator<Item = ModuleId>) -> Vec<ModuleId> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for id in ids {
        if seen.insert(id.clone()) {
            ordered.push(id);
        }
    }

    ordered.sort();
    ordered
}
