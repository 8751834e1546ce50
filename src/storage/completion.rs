// src/storage/completion.rs

use std::sync::Arc;

use super::{COMPLETED_LESSONS_KEY, ClientStorage, StorageError};
use crate::catalog::CompletionSet;

/// Reads and writes a learner's completed-set.
///
/// Best effort in both directions: absent, corrupted or unreachable storage
/// loads as an empty set, and failed writes are logged, never returned.
#[derive(Clone)]
pub struct CompletionStore {
    storage: Arc<dyn ClientStorage>,
    scope: String,
}

impl CompletionStore {
    pub fn new(storage: Arc<dyn ClientStorage>, scope: impl Into<String>) -> Self {
        Self {
            storage,
            scope: scope.into(),
        }
    }

    pub async fn load(&self) -> CompletionSet {
        self.try_load().await.unwrap_or_else(|e| {
            tracing::warn!("Completed lessons unavailable for {}: {}", self.scope, e);
            CompletionSet::new()
        })
    }

    /// Like [`load`](Self::load), but a storage failure is returned instead
    /// of reading as an empty set. Corrupted values still load as empty.
    pub async fn try_load(&self) -> Result<CompletionSet, StorageError> {
        let Some(raw) = self
            .storage
            .get_item(&self.scope, COMPLETED_LESSONS_KEY)
            .await?
        else {
            return Ok(CompletionSet::new());
        };

        let entries: Vec<String> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(
                    "Corrupted completed lessons for {}, resetting: {}",
                    self.scope,
                    e
                );
                if let Err(e) = self.storage.remove_item(&self.scope, COMPLETED_LESSONS_KEY).await {
                    tracing::warn!("Could not reset completed lessons for {}: {}", self.scope, e);
                }
                return Ok(CompletionSet::new());
            }
        };

        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry.parse() {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::warn!("Dropping stored lesson key {:?}: {}", entry, e);
                    None
                }
            })
            .collect())
    }

    /// Writes the set as a JSON array of lesson keys, in key order.
    pub async fn save(&self, completed: &CompletionSet) {
        if let Err(e) = self.try_save(completed).await {
            tracing::error!("Failed to save completed lessons for {}: {}", self.scope, e);
        }
    }

    /// Like [`save`](Self::save), but the failure is returned.
    pub async fn try_save(&self, completed: &CompletionSet) -> Result<(), StorageError> {
        let keys: Vec<String> = completed.iter().map(ToString::to_string).collect();
        let value = serde_json::to_string(&keys)?;

        self.storage
            .set_item(&self.scope, COMPLETED_LESSONS_KEY, &value)
            .await
    }
}
