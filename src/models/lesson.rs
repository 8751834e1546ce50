// src/models/lesson.rs

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between the module and lesson parts of a lesson key (`"3-2"`).
pub const KEY_SEPARATOR: char = '-';

/// Reasons a lesson key or module id is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("lesson key `{0}` has no module separator")]
    MissingSeparator(String),
    #[error("module id in `{0}` is empty")]
    EmptyModule(String),
    #[error("module id `{0}` must not contain a separator")]
    InvalidModule(String),
    #[error("lesson number in `{0}` is not a positive integer")]
    InvalidLesson(String),
}

/// Identifier of a module, the part of a lesson key before the separator.
///
/// Ordering is total: numeric ids compare by value, numeric ids come before
/// non-numeric ones, and non-numeric ids compare as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Result<Self, KeyError> {
        let id = id.into();
        if id.is_empty() {
            return Err(KeyError::EmptyModule(id));
        }
        if id.contains(KEY_SEPARATOR) {
            return Err(KeyError::InvalidModule(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for ModuleId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            // "01" and "1" are equal numerically; the string tie-break keeps Ord consistent with Eq.
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ModuleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModuleId {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleId> for String {
    fn from(id: ModuleId) -> Self {
        id.0
    }
}

/// Composite lesson identifier: the module it belongs to and its position in it.
///
/// The string form `"<module>-<lesson>"` is derived from the pair and only
/// parsed back at the edges (content files, storage, URLs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LessonKey {
    pub module: ModuleId,
    pub lesson: u32,
}

impl LessonKey {
    pub fn new(module: ModuleId, lesson: u32) -> Self {
        Self { module, lesson }
    }

    /// Builds a key from the two path segments used by the HTTP routes.
    pub fn from_parts(module: &str, lesson: &str) -> Result<Self, KeyError> {
        format!("{module}{KEY_SEPARATOR}{lesson}").parse()
    }

    pub fn belongs_to(&self, module: &ModuleId) -> bool {
        &self.module == module
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.module, KEY_SEPARATOR, self.lesson)
    }
}

impl FromStr for LessonKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, lesson) = s
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| KeyError::MissingSeparator(s.to_string()))?;

        if module.is_empty() {
            return Err(KeyError::EmptyModule(s.to_string()));
        }

        // Canonical decimal only, so a key prints back exactly as it was read.
        let canonical = !lesson.is_empty()
            && lesson.bytes().all(|b| b.is_ascii_digit())
            && (lesson == "0" || !lesson.starts_with('0'));
        let lesson = lesson
            .parse::<u32>()
            .ok()
            .filter(|_| canonical)
            .ok_or_else(|| KeyError::InvalidLesson(s.to_string()))?;

        Ok(Self {
            module: ModuleId::new(module)?,
            lesson,
        })
    }
}

impl TryFrom<String> for LessonKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LessonKey> for String {
    fn from(key: LessonKey) -> Self {
        key.to_string()
    }
}

/// Difficulty level of a lesson or module.
///
/// Content written with French difficulty labels deserializes
/// to the same variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    #[serde(alias = "débutant")]
    Beginner,
    #[serde(alias = "intermédiaire")]
    Intermediate,
    #[serde(alias = "avancé")]
    Advanced,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeExample {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// A lesson as written in the content files, before its key is validated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub content: String,
    pub example: Option<CodeExample>,
    pub exercise: Option<Exercise>,
    pub quiz: Option<Quiz>,
    pub project: Option<Project>,
}

/// Immutable lesson record held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRecord {
    pub key: LessonKey,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Minutes.
    pub duration: u32,
    pub tags: Vec<String>,
    /// Ordered; entries that are not valid keys are kept verbatim for display.
    pub prerequisites: Vec<String>,
    /// Sanitized HTML.
    pub content: String,
    pub example: Option<CodeExample>,
    pub exercise: Option<Exercise>,
    pub quiz: Option<Quiz>,
    pub project: Option<Project>,
}

impl LessonRecord {
    pub fn has_example(&self) -> bool {
        self.example.is_some()
    }

    pub fn has_exercise(&self) -> bool {
        self.exercise.is_some()
    }

    pub fn has_quiz(&self) -> bool {
        self.quiz.as_ref().is_some_and(|q| !q.questions.is_empty())
    }

    pub fn has_project(&self) -> bool {
        self.project.is_some()
    }

    /// Prerequisites that parse as lesson keys.
    pub fn prerequisite_keys(&self) -> impl Iterator<Item = LessonKey> + '_ {
        self.prerequisites.iter().filter_map(|p| p.parse().ok())
    }
}

/// Quiz question sent to clients (excludes the correct answer).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuizQuestion {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub title: String,
    pub questions: Vec<PublicQuizQuestion>,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title.clone(),
            questions: quiz
                .questions
                .iter()
                .map(|q| PublicQuizQuestion {
                    question: q.question.clone(),
                    options: q.options.clone(),
                })
                .collect(),
        }
    }
}

/// DTO for sending a lesson to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLesson {
    pub id: LessonKey,
    pub module_id: ModuleId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: u32,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub content: String,
    pub example: Option<CodeExample>,
    pub exercise: Option<Exercise>,
    pub quiz: Option<PublicQuiz>,
    pub project: Option<Project>,
    pub has_example: bool,
    pub has_exercise: bool,
    pub has_quiz: bool,
    pub has_project: bool,
}

impl From<&LessonRecord> for PublicLesson {
    fn from(lesson: &LessonRecord) -> Self {
        Self {
            id: lesson.key.clone(),
            module_id: lesson.key.module.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            difficulty: lesson.difficulty,
            duration: lesson.duration,
            tags: lesson.tags.clone(),
            prerequisites: lesson.prerequisites.clone(),
            content: lesson.content.clone(),
            example: lesson.example.clone(),
            exercise: lesson.exercise.clone(),
            quiz: lesson.quiz.as_ref().map(PublicQuiz::from),
            project: lesson.project.clone(),
            has_example: lesson.has_example(),
            has_exercise: lesson.has_exercise(),
            has_quiz: lesson.has_quiz(),
            has_project: lesson.has_project(),
        }
    }
}

/// Lightweight reference to a lesson, used for navigation and prerequisites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRef {
    pub id: String,
    pub title: String,
    /// False when the reference points at a lesson the registry does not hold.
    pub known: bool,
}

impl From<&LessonRecord> for LessonRef {
    fn from(lesson: &LessonRecord) -> Self {
        Self {
            id: lesson.key.to_string(),
            title: lesson.title.clone(),
            known: true,
        }
    }
}

/// A lesson as shown to a learner: content plus navigation and completion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: PublicLesson,
    pub prerequisite_lessons: Vec<LessonRef>,
    pub previous: Option<LessonRef>,
    pub next: Option<LessonRef>,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str) -> ModuleId {
        ModuleId::new(id).unwrap()
    }

    #[test]
    fn parses_and_displays_lesson_keys() {
        let key: LessonKey = "12-3".parse().unwrap();
        assert_eq!(key.module.as_str(), "12");
        assert_eq!(key.lesson, 3);
        assert_eq!(key.to_string(), "12-3");
    }

    #[test]
    fn rejects_malformed_lesson_keys() {
        assert_eq!(
            "intro".parse::<LessonKey>(),
            Err(KeyError::MissingSeparator("intro".into()))
        );
        assert_eq!(
            "-1".parse::<LessonKey>(),
            Err(KeyError::EmptyModule("-1".into()))
        );
        assert_eq!(
            "1-x".parse::<LessonKey>(),
            Err(KeyError::InvalidLesson("1-x".into()))
        );
        assert!("module14-lesson1".parse::<LessonKey>().is_err());
    }

    #[test]
    fn lesson_numbers_must_be_canonical() {
        for key in ["1-01", "1-+1", "1-", "1- 1", "1-1 "] {
            assert_eq!(
                key.parse::<LessonKey>(),
                Err(KeyError::InvalidLesson(key.into())),
                "{key}"
            );
        }
        assert!(LessonKey::from_parts("1", "01").is_err());
        assert_eq!("1-0".parse::<LessonKey>().unwrap().to_string(), "1-0");
        assert_eq!("1-10".parse::<LessonKey>().unwrap().to_string(), "1-10");
    }

    #[test]
    fn numeric_module_ids_sort_by_value() {
        let mut ids = vec![module("10"), module("2"), module("1")];
        ids.sort();
        let ids: Vec<_> = ids.iter().map(ModuleId::as_str).collect();
        assert_eq!(ids, ["1", "2", "10"]);
    }

    #[test]
    fn non_numeric_module_ids_sort_after_numeric_ones() {
        let mut ids = vec![module("react"), module("10"), module("1a"), module("2")];
        ids.sort();
        let ids: Vec<_> = ids.iter().map(ModuleId::as_str).collect();
        assert_eq!(ids, ["2", "10", "1a", "react"]);
    }

    #[test]
    fn lesson_keys_order_numerically_within_and_across_modules() {
        let mut keys: Vec<LessonKey> = ["10-1", "2-10", "2-2", "9-3"]
            .iter()
            .map(|k| k.parse().unwrap())
            .collect();
        keys.sort();
        let keys: Vec<_> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(keys, ["2-2", "2-10", "9-3", "10-1"]);
    }

    #[test]
    fn french_difficulty_labels_are_accepted() {
        let d: Difficulty = serde_json::from_str("\"intermédiaire\"").unwrap();
        assert_eq!(d, Difficulty::Intermediate);
        assert_eq!(serde_json::to_string(&Difficulty::Advanced).unwrap(), "\"advanced\"");
    }

    #[test]
    fn public_quiz_hides_answers() {
        let quiz = Quiz {
            title: "Q".into(),
            questions: vec![QuizQuestion {
                question: "2+2?".into(),
                options: vec!["3".into(), "4".into()],
                correct_answer: "4".into(),
                explanation: None,
            }],
        };
        let json = serde_json::to_value(PublicQuiz::from(&quiz)).unwrap();
        assert!(json["questions"][0].get("correctAnswer").is_none());
        assert_eq!(json["questions"][0]["options"][1], "4");
    }
}
