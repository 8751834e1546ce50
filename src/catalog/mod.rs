// src/catalog/mod.rs

//! Static lesson content and the learning-path computations over it.
//!
//! * [`registry`] holds every lesson, keyed by [`LessonKey`](crate::models::lesson::LessonKey).
//! * [`resolver`] derives the ordered module list from lesson keys.
//! * [`progress`] computes module and lesson progress for a completed-set.
//! * [`quiz`] grades lesson quizzes.

pub mod progress;
pub mod quiz;
pub mod registry;
pub mod resolver;

use std::path::PathBuf;

use thiserror::Error;

pub use progress::CompletionSet;
pub use registry::{LessonFilter, LessonRegistry};

/// Failures while loading lesson content. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {document} document: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
