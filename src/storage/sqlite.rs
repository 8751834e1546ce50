// src/storage/sqlite.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{ClientStorage, StorageError};

/// Storage backed by the `client_storage` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl ClientStorage for SqliteStorage {
    async fn get_item(&self, scope: &str, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM client_storage WHERE scope = ? AND key = ?",
        )
        .bind(scope)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set_item(&self, scope: &str, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO client_storage (scope, key, value)
            VALUES (?, ?, ?)
            ON CONFLICT(scope, key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(scope)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_item(&self, scope: &str, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM client_storage WHERE scope = ? AND key = ?")
            .bind(scope)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear(&self, scope: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM client_storage WHERE scope = ?")
            .bind(scope)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn storage() -> SqliteStorage {
        // A single connection keeps the in-memory database alive for the whole test.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let storage = SqliteStorage::new(pool);
        storage.migrate().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn set_get_and_overwrite() {
        let storage = storage().await;
        assert!(storage.get_item("s1", "k").await.unwrap().is_none());

        storage.set_item("s1", "k", "[\"1-1\"]").await.unwrap();
        storage.set_item("s1", "k", "[\"1-1\",\"1-2\"]").await.unwrap();

        assert_eq!(
            storage.get_item("s1", "k").await.unwrap().as_deref(),
            Some("[\"1-1\",\"1-2\"]")
        );
    }

    #[tokio::test]
    async fn remove_and_clear_only_touch_their_scope() {
        let storage = storage().await;
        storage.set_item("s1", "a", "1").await.unwrap();
        storage.set_item("s1", "b", "2").await.unwrap();
        storage.set_item("s2", "a", "3").await.unwrap();

        storage.remove_item("s1", "a").await.unwrap();
        assert!(storage.get_item("s1", "a").await.unwrap().is_none());
        assert!(storage.get_item("s1", "b").await.unwrap().is_some());

        storage.clear("s1").await.unwrap();
        assert!(storage.get_item("s1", "b").await.unwrap().is_none());
        assert_eq!(storage.get_item("s2", "a").await.unwrap().as_deref(), Some("3"));
    }
}
