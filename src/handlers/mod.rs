// src/handlers/mod.rs

pub mod lessons;
pub mod modules;
pub mod progress;
pub mod session;

use std::sync::Arc;

use crate::{
    catalog::CompletionSet,
    storage::{ClientStorage, CompletionStore},
    utils::jwt::MaybeSession,
};

/// Completed-set of an optional session; anonymous callers have none.
async fn completed_for(storage: &Arc<dyn ClientStorage>, session: &MaybeSession) -> CompletionSet {
    match &session.0 {
        Some(claims) => CompletionStore::new(storage.clone(), claims.sub.clone()).load().await,
        None => CompletionSet::new(),
    }
}
