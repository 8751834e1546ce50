// src/session/locks.rs

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per session scope.
///
/// Every read-modify-write of a scope (completing a lesson, editing the
/// profile, ending the session) runs while holding the scope's guard, so
/// concurrent requests for one learner apply one after another.
#[derive(Clone, Default)]
pub struct SessionLocks {
    scopes: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `scope`.
    pub async fn acquire(&self, scope: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut scopes = self.scopes.lock().await;
            // Idle scopes are only referenced by the map.
            scopes.retain(|_, lock| Arc::strong_count(lock) > 1);
            scopes.entry(scope.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.scopes.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_scope_is_exclusive() {
        let locks = SessionLocks::new();
        let guard = locks.acquire("a").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("a").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn other_scopes_are_independent() {
        let locks = SessionLocks::new();
        let _a = locks.acquire("a").await;
        let _b = locks.acquire("b").await;
    }

    #[tokio::test]
    async fn released_scopes_are_forgotten() {
        let locks = SessionLocks::new();
        drop(locks.acquire("a").await);
        drop(locks.acquire("b").await);
        let _c = locks.acquire("c").await;
        assert_eq!(locks.tracked().await, 1);
    }
}
