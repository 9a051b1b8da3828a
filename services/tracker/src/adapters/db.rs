//! services/tracker/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ProgressStore` port from the `core` crate. Each user's aggregate is
//! kept as one JSONB document in PostgreSQL and rewritten whole on every save.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use study_tracker_core::domain::UserProgress;
use study_tracker_core::ports::{PortError, PortResult, ProgressStore};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProgressStore` port.
#[derive(Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    /// Creates a new `PgProgressStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and wraps it.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProgressRecord {
    user_id: String,
    document: Json<UserProgress>,
    updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    fn to_domain(self) -> PortResult<UserProgress> {
        let Json(progress) = self.document;
        if progress.user_id() != self.user_id {
            return Err(PortError::Unexpected(format!(
                "Document stored under {} belongs to {}",
                self.user_id,
                progress.user_id()
            )));
        }
        Ok(progress)
    }
}

//=========================================================================================
// `ProgressStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn load(&self, user_id: &str) -> PortResult<Option<UserProgress>> {
        let record = sqlx::query_as::<_, ProgressRecord>(
            "SELECT user_id, document, updated_at FROM user_progress WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        record.map(ProgressRecord::to_domain).transpose()
    }

    async fn save(&self, progress: UserProgress) -> PortResult<UserProgress> {
        let record = sqlx::query_as::<_, ProgressRecord>(
            "INSERT INTO user_progress (user_id, document, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (user_id) DO UPDATE SET document = EXCLUDED.document, updated_at = NOW() \
             RETURNING user_id, document, updated_at",
        )
        .bind(progress.user_id())
        .bind(Json(&progress))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(user_id = %record.user_id, updated_at = %record.updated_at, "Progress saved.");
        record.to_domain()
    }
}
