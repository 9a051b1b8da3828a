//! crates/study_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) the progression engine depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete store and of wall-clock time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::UserProgress;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence gateway for the per-user aggregate.
///
/// The aggregate is always read and rewritten whole; the store decides how.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Returns `Ok(None)` when the user has never registered.
    async fn load(&self, user_id: &str) -> PortResult<Option<UserProgress>>;

    /// Persists the aggregate and returns what was stored.
    async fn save(&self, progress: UserProgress) -> PortResult<UserProgress>;
}

/// Source of the current time, injectable for deterministic tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
