//! services/tracker/src/bin/tracker.rs
//!
//! Wires the configured store into the progression engine and prints a
//! progress snapshot for one user: `tracker <user-id>`.
//!
//! Reports need `DATABASE_URL`. Without it the in-memory store is used; it
//! starts empty, so every lookup ends in `NoAccount`. That mode only checks
//! configuration and wiring.

use std::sync::Arc;

use study_tracker_core::{ProgressStore, ProgressionCoordinator, SystemClock};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_lib::{
    adapters::{MemoryProgressStore, PgProgressStore},
    config::Config,
    error::TrackerError,
};

#[tokio::main]
async fn main() -> Result<(), TrackerError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded.");

    let user_id = std::env::args()
        .nth(1)
        .ok_or_else(|| TrackerError::Internal("usage: tracker <user-id>".to_string()))?;

    // --- 2. Connect to the Store & Run Migrations ---
    let store: Arc<dyn ProgressStore> = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let db = PgProgressStore::connect(url, config.db_max_connections).await?;
            info!("Running database migrations...");
            db.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db)
        }
        None => {
            warn!("DATABASE_URL is not set, using an empty in-memory store; no user will be found.");
            Arc::new(MemoryProgressStore::new())
        }
    };

    // --- 3. Build the Engine ---
    let coordinator = ProgressionCoordinator::new(
        store,
        Arc::new(SystemClock),
        config.progression_settings()?,
    );

    // --- 4. Report ---
    let outcome = coordinator.stats(&user_id).await?;
    println!("{}", outcome.recap);
    if let Some(course) = outcome.recap.top_courses(1).first() {
        println!("• Most Studied: {} ({} times)", course.code, course.times_studied);
    }

    Ok(())
}
