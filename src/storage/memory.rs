// src/storage/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ClientStorage, StorageError};

/// In-process storage; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<(String, String), String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for MemoryStorage {
    async fn get_item(&self, scope: &str, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().await;
        Ok(items.get(&(scope.to_string(), key.to_string())).cloned())
    }

    async fn set_item(&self, scope: &str, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .await
            .insert((scope.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, scope: &str, key: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .await
            .remove(&(scope.to_string(), key.to_string()));
        Ok(())
    }

    async fn clear(&self, scope: &str) -> Result<(), StorageError> {
        self.items.write().await.retain(|(s, _), _| s != scope);
        Ok(())
    }
}
