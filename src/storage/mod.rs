// src/storage/mod.rs

//! Per-client key/value storage, the server-side stand-in for a browser's
//! `localStorage`. Every learner session owns one scope.

pub mod completion;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

pub use completion::CompletionStore;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Storage key of the learner profile.
pub const PROFILE_KEY: &str = "nextmimo_user";
/// Storage key of the completed-lesson set.
pub const COMPLETED_LESSONS_KEY: &str = "nextmimo_completed_lessons";
/// Storage key of badges and last activity date.
pub const GAMIFICATION_KEY: &str = "nextmimo_gamification";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait ClientStorage: Send + Sync {
    async fn get_item(&self, scope: &str, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, scope: &str, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove_item(&self, scope: &str, key: &str) -> Result<(), StorageError>;

    /// Removes every key of a scope.
    async fn clear(&self, scope: &str) -> Result<(), StorageError>;
}
