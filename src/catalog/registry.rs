// src/catalog/registry.rs

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::Path,
};

use serde::Deserialize;

use super::{CatalogError, resolver};
use crate::{
    models::{
        lesson::{Difficulty, LessonKey, LessonRecord, LessonRef, ModuleId, RawLesson},
        module::ModuleInfo,
    },
    utils::html::clean_html,
};

const BUNDLED_LESSONS: &str = include_str!("../../content/lessons.json");
const BUNDLED_MODULES: &str = include_str!("../../content/modules.json");

/// Query parameters for filtering the lesson list.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LessonFilter {
    pub difficulty: Option<Difficulty>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

/// Immutable registry of every lesson, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct LessonRegistry {
    lessons: BTreeMap<LessonKey, LessonRecord>,
    modules: HashMap<ModuleId, ModuleInfo>,
}

impl LessonRegistry {
    /// Loads the content compiled into the binary.
    pub fn load_bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_LESSONS, BUNDLED_MODULES)
    }

    /// Loads `lessons.json` and `modules.json` from a content directory.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
        };

        Self::from_json(&read("lessons.json")?, &read("modules.json")?)
    }

    pub fn from_json(lessons: &str, modules: &str) -> Result<Self, CatalogError> {
        let lessons: Vec<RawLesson> = serde_json::from_str(lessons).map_err(|source| {
            CatalogError::Parse {
                document: "lessons",
                source,
            }
        })?;
        let modules: Vec<ModuleInfo> = serde_json::from_str(modules).map_err(|source| {
            CatalogError::Parse {
                document: "modules",
                source,
            }
        })?;

        Ok(Self::from_parts(lessons, modules))
    }

    /// Builds the registry, skipping lessons whose key is malformed.
    pub fn from_parts(lessons: Vec<RawLesson>, modules: Vec<ModuleInfo>) -> Self {
        let mut registry = Self::default();

        for raw in lessons {
            let key = match raw.id.parse::<LessonKey>() {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!("Skipping lesson {:?}: {}", raw.title, e);
                    continue;
                }
            };

            if registry.lessons.contains_key(&key) {
                tracing::warn!("Duplicate lesson key {}, keeping the first record", key);
                continue;
            }

            registry.lessons.insert(key.clone(), into_record(key, raw));
        }

        for info in modules {
            if registry.modules.contains_key(&info.id) {
                tracing::warn!("Duplicate metadata for module {}, keeping the first entry", info.id);
                continue;
            }
            registry.modules.insert(info.id.clone(), info);
        }

        tracing::debug!(
            "Lesson registry loaded: {} lessons, {} module entries",
            registry.lessons.len(),
            registry.modules.len()
        );

        registry
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn get(&self, key: &LessonKey) -> Option<&LessonRecord> {
        self.lessons.get(key)
    }

    pub fn contains(&self, key: &LessonKey) -> bool {
        self.lessons.contains_key(key)
    }

    /// Looks a lesson up by its two path segments. Unknown or malformed ids yield `None`.
    pub fn get_lesson(&self, module_id: &str, lesson_id: &str) -> Option<&LessonRecord> {
        let key = LessonKey::from_parts(module_id, lesson_id).ok()?;
        self.lessons.get(&key)
    }

    /// Every lesson in key order.
    pub fn get_all_lessons(&self) -> Vec<&LessonRecord> {
        self.lessons.values().collect()
    }

    /// Lessons of one module in key order; empty for unknown modules.
    pub fn get_module_lessons(&self, module_id: &str) -> Vec<&LessonRecord> {
        match ModuleId::new(module_id) {
            Ok(id) => self.lessons_of(&id).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub(crate) fn lessons_of<'a>(
        &'a self,
        module: &ModuleId,
    ) -> impl Iterator<Item = &'a LessonRecord> + use<'a> {
        let module = module.clone();
        self.lessons
            .values()
            .filter(move |lesson| lesson.key.belongs_to(&module))
    }

    /// Ordered module ids that own at least one lesson.
    pub fn module_ids(&self) -> Vec<ModuleId> {
        resolver::resolve_module_ids(self.lessons.values())
    }

    /// Static metadata, or a generated default when the module has none.
    pub fn module_info(&self, id: &ModuleId) -> ModuleInfo {
        self.modules
            .get(id)
            .cloned()
            .unwrap_or_else(|| ModuleInfo::fallback(id))
    }

    /// Previous and next lesson within the same module.
    pub fn adjacent(&self, key: &LessonKey) -> (Option<&LessonRecord>, Option<&LessonRecord>) {
        let siblings: Vec<_> = self.lessons_of(&key.module).collect();
        let Some(pos) = siblings.iter().position(|l| &l.key == key) else {
            return (None, None);
        };

        let prev = pos.checked_sub(1).and_then(|i| siblings.get(i)).copied();
        let next = siblings.get(pos + 1).copied();
        (prev, next)
    }

    /// Prerequisites with their titles; unknown ones are returned verbatim.
    pub fn prerequisite_refs(&self, lesson: &LessonRecord) -> Vec<LessonRef> {
        lesson
            .prerequisites
            .iter()
            .map(|prereq| {
                let known = prereq
                    .parse::<LessonKey>()
                    .ok()
                    .and_then(|key| self.get(&key));

                match known {
                    Some(record) => LessonRef {
                        id: record.key.to_string(),
                        title: record.title.clone(),
                        known: true,
                    },
                    None => LessonRef {
                        id: prereq.clone(),
                        title: prereq.clone(),
                        known: false,
                    },
                }
            })
            .collect()
    }

    /// Lessons matching every set criterion, in key order.
    pub fn search(&self, filter: &LessonFilter) -> Vec<&LessonRecord> {
        let tag = filter.tag.as_deref().map(str::to_lowercase);
        let query = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.lessons
            .values()
            .filter(|l| filter.difficulty.is_none_or(|d| l.difficulty == d))
            .filter(|l| {
                tag.as_ref()
                    .is_none_or(|t| l.tags.iter().any(|lt| lt.to_lowercase() == *t))
            })
            .filter(|l| {
                query.as_ref().is_none_or(|q| {
                    l.title.to_lowercase().contains(q.as_str())
                        || l.description.to_lowercase().contains(q.as_str())
                })
            })
            .collect()
    }
}

fn into_record(key: LessonKey, raw: RawLesson) -> LessonRecord {
    let mut seen = HashSet::new();
    let tags = raw
        .tags
        .into_iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect();

    LessonRecord {
        key,
        title: raw.title,
        description: raw.description,
        difficulty: raw.difficulty,
        duration: raw.duration,
        tags,
        prerequisites: raw.prerequisites,
        content: clean_html(&raw.content),
        example: raw.example,
        exercise: raw.exercise,
        quiz: raw.quiz,
        project: raw.project,
    }
}
