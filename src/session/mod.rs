// src/session/mod.rs

//! Learner session: the profile, completed-set and gamification state of one
//! client scope, loaded explicitly with [`LearnerSession::init`] and removed
//! with [`LearnerSession::teardown`].
//!
//! Writes re-read the scope before changing it. Callers that may race on one
//! scope hold its [`SessionLocks`] guard around the whole operation.

pub mod gamification;
pub mod locks;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub use self::locks::SessionLocks;

use self::gamification::{CompletionOutcome, GamificationState, LessonReward};
use crate::{
    catalog::{CompletionSet, LessonRegistry, progress},
    models::{
        lesson::LessonKey,
        profile::{Role, UpdateProfileRequest, UserProfile},
    },
    storage::{ClientStorage, CompletionStore, GAMIFICATION_KEY, PROFILE_KEY, StorageError},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no profile")]
    NoProfile,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct LearnerSession {
    id: String,
    storage: Arc<dyn ClientStorage>,
    completion_store: CompletionStore,
    profile: Option<UserProfile>,
    completed: CompletionSet,
    gamification: GamificationState,
}

impl LearnerSession {
    /// Loads the state stored under `id`. Missing or unreadable values load as empty.
    pub async fn init(storage: Arc<dyn ClientStorage>, id: impl Into<String>) -> Self {
        let id = id.into();
        let completion_store = CompletionStore::new(storage.clone(), id.clone());

        let profile = load_json::<UserProfile>(storage.as_ref(), &id, PROFILE_KEY).await;
        let gamification = load_json::<GamificationState>(storage.as_ref(), &id, GAMIFICATION_KEY)
            .await
            .unwrap_or_default();
        let completed = completion_store.load().await;

        Self {
            id,
            storage,
            completion_store,
            profile,
            completed,
            gamification,
        }
    }

    /// Opens a new session with a fresh level-1 profile.
    pub async fn start(
        storage: Arc<dyn ClientStorage>,
        name: String,
        email: String,
        role: Role,
    ) -> Result<Self, SessionError> {
        let id = uuid::Uuid::new_v4().to_string();
        let profile = UserProfile::new(id.clone(), name, email, role);

        let mut session = Self {
            completion_store: CompletionStore::new(storage.clone(), id.clone()),
            id,
            storage,
            profile: Some(profile),
            completed: CompletionSet::new(),
            gamification: GamificationState::default(),
        };
        session.persist_profile().await?;

        tracing::info!("Learner session {} started", session.id);
        Ok(session)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn require_profile(&self) -> Result<&UserProfile, SessionError> {
        self.profile.as_ref().ok_or(SessionError::NoProfile)
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn gamification(&self) -> &GamificationState {
        &self.gamification
    }

    pub fn is_completed(&self, key: &LessonKey) -> bool {
        self.completed.contains(key)
    }

    pub async fn update_profile(
        &mut self,
        update: UpdateProfileRequest,
    ) -> Result<&UserProfile, SessionError> {
        self.refresh().await?;
        let profile = self.profile.as_mut().ok_or(SessionError::NoProfile)?;
        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(email) = update.email {
            profile.email = email;
        }

        self.persist_profile().await?;
        self.require_profile()
    }

    /// Marks a lesson as completed and applies its reward.
    ///
    /// Completion is one-way: an already completed lesson returns `Ok(None)`
    /// and changes nothing. The completed-set is written before any reward
    /// is applied; if that write fails nothing is awarded.
    pub async fn complete_lesson(
        &mut self,
        registry: &LessonRegistry,
        key: &LessonKey,
        outcome: CompletionOutcome,
        today: NaiveDate,
    ) -> Result<Option<LessonReward>, SessionError> {
        self.refresh().await?;
        if self.completed.contains(key) {
            return Ok(None);
        }
        if self.profile.is_none() {
            return Err(SessionError::NoProfile);
        }

        let mut completed = self.completed.clone();
        completed.insert(key.clone());
        self.completion_store.try_save(&completed).await?;
        self.completed = completed;

        let profile = self.profile.as_mut().ok_or(SessionError::NoProfile)?;

        let module_completed = progress::compute_module_summary(registry, &key.module, &self.completed)
            .is_some_and(|summary| summary.is_completed);

        let reward = gamification::reward_completion(
            profile,
            &mut self.gamification,
            key,
            &outcome,
            module_completed,
            today,
        );

        self.persist_profile().await?;
        store_json(self.storage.as_ref(), &self.id, GAMIFICATION_KEY, &self.gamification).await?;

        tracing::info!(
            "Session {} completed lesson {} (+{} xp)",
            self.id,
            key,
            reward.xp_earned
        );
        Ok(Some(reward))
    }

    /// Ends the session and removes everything stored under it.
    pub async fn teardown(self) -> Result<(), SessionError> {
        self.storage.clear(&self.id).await?;
        tracing::info!("Learner session {} ended", self.id);
        Ok(())
    }

    /// Reloads the stored state, failing on unreachable storage.
    async fn refresh(&mut self) -> Result<(), SessionError> {
        self.profile = read_json(self.storage.as_ref(), &self.id, PROFILE_KEY).await?;
        self.gamification = read_json(self.storage.as_ref(), &self.id, GAMIFICATION_KEY)
            .await?
            .unwrap_or_default();
        self.completed = self.completion_store.try_load().await?;
        Ok(())
    }

    async fn persist_profile(&self) -> Result<(), SessionError> {
        if let Some(profile) = &self.profile {
            store_json(self.storage.as_ref(), &self.id, PROFILE_KEY, profile).await?;
        }
        Ok(())
    }
}

async fn load_json<T: DeserializeOwned>(
    storage: &dyn ClientStorage,
    scope: &str,
    key: &str,
) -> Option<T> {
    read_json(storage, scope, key).await.unwrap_or_else(|e| {
        tracing::warn!("Could not read {} for {}: {}", key, scope, e);
        None
    })
}

/// Reads a JSON value. Corrupted values read as absent; storage errors are returned.
async fn read_json<T: DeserializeOwned>(
    storage: &dyn ClientStorage,
    scope: &str,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.get_item(scope, key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::error!("Corrupted {} for {}, ignoring: {}", key, scope, e);
            Ok(None)
        }
    }
}

async fn store_json<T: Serialize>(
    storage: &dyn ClientStorage,
    scope: &str,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(scope, key, &raw).await
}
