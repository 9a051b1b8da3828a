//! Shared fixtures: an in-memory store and a hand-driven clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use study_tracker_core::{
    Clock, PortError, PortResult, ProgressStore, ProgressionCoordinator, ProgressionSettings,
    UserProgress,
};

#[derive(Default)]
pub struct TestStore {
    docs: tokio::sync::Mutex<HashMap<String, UserProgress>>,
    pub fail_saves: std::sync::atomic::AtomicBool,
}

impl TestStore {
    pub async fn get(&self, user_id: &str) -> Option<UserProgress> {
        self.docs.lock().await.get(user_id).cloned()
    }

    pub async fn put(&self, progress: UserProgress) {
        self.docs
            .lock()
            .await
            .insert(progress.user_id().to_string(), progress);
    }
}

#[async_trait]
impl ProgressStore for TestStore {
    async fn load(&self, user_id: &str) -> PortResult<Option<UserProgress>> {
        Ok(self.docs.lock().await.get(user_id).cloned())
    }

    async fn save(&self, progress: UserProgress) -> PortResult<UserProgress> {
        if self.fail_saves.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(PortError::Unexpected("disk full".to_string()));
        }
        self.put(progress.clone()).await;
        Ok(progress)
    }
}

pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(rfc3339: &str) -> Self {
        let start = DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc);
        Self(Mutex::new(start))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub struct Harness {
    pub store: Arc<TestStore>,
    pub clock: Arc<ManualClock>,
    pub coordinator: ProgressionCoordinator,
}

pub fn harness() -> Harness {
    let store = Arc::new(TestStore::default());
    let clock = Arc::new(ManualClock::at("2024-09-02T08:00:00Z"));
    let coordinator = ProgressionCoordinator::new(
        store.clone(),
        clock.clone(),
        ProgressionSettings::default(),
    );
    Harness {
        store,
        clock,
        coordinator,
    }
}

pub const USER: &str = "314159";
