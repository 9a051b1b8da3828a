//! services/tracker/src/error.rs
//!
//! Defines the primary error type for the tracker service.

use crate::config::ConfigError;
use study_tracker_core::{PortError, ProgressError};

/// The primary error type for the `tracker` service.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A progression operation was refused or its store failed.
    #[error("Progression error: {0}")]
    Progress(#[from] ProgressError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
