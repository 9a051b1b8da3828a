//! services/tracker/src/adapters/memory.rs
//!
//! Process-local `ProgressStore`, used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use study_tracker_core::domain::UserProgress;
use study_tracker_core::ports::{PortResult, ProgressStore};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryProgressStore {
    documents: RwLock<HashMap<String, UserProgress>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, user_id: &str) -> PortResult<Option<UserProgress>> {
        Ok(self.documents.read().await.get(user_id).cloned())
    }

    async fn save(&self, progress: UserProgress) -> PortResult<UserProgress> {
        self.documents
            .write()
            .await
            .insert(progress.user_id().to_string(), progress.clone());
        Ok(progress)
    }
}
