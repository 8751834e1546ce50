// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    catalog::LessonRegistry, config::Config, session::SessionLocks, storage::ClientStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LessonRegistry>,
    pub storage: Arc<dyn ClientStorage>,
    pub locks: SessionLocks,
    pub config: Config,
}

impl FromRef<AppState> for Arc<LessonRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ClientStorage> {
    fn from_ref(state: &AppState) -> Self {
        state.storage.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionLocks {
    fn from_ref(state: &AppState) -> Self {
        state.locks.clone()
    }
}
