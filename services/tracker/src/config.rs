//! services/tracker/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::collections::HashMap;

use chrono::FixedOffset;
use study_tracker_core::level_curve::{CurveError, Ladders, PointsRate, DEFAULT_LEVEL_CEILING};
use study_tracker_core::streak::StreakTracker;
use study_tracker_core::ProgressionSettings;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub db_max_connections: u32,
    pub points_per_block: u64,
    pub block_minutes: u64,
    pub level_ceiling: u32,
    pub streak_offset: FixedOffset,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        // --- Storage ---
        let database_url = lookup(&vars, "DATABASE_URL").map(str::to_string);
        let db_max_connections = parse_or(&vars, "DB_MAX_CONNECTIONS", 5u32)?;
        if db_max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "must be at least 1"));
        }

        // --- Logging ---
        let log_level_str = lookup(&vars, "RUST_LOG").unwrap_or("INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Progression ---
        let points_per_block = parse_or(&vars, "POINTS_PER_BLOCK", 180u64)?;
        let block_minutes = parse_or(&vars, "BLOCK_MINUTES", 5u64)?;
        if block_minutes == 0 {
            return Err(invalid("BLOCK_MINUTES", "must be at least 1"));
        }
        let level_ceiling = parse_or(&vars, "LEVEL_CEILING", DEFAULT_LEVEL_CEILING)?;

        let offset_minutes = parse_or(&vars, "STREAK_UTC_OFFSET_MINUTES", 0i32)?;
        let streak_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| invalid("STREAK_UTC_OFFSET_MINUTES", "must be within ±1439 minutes"))?;

        Ok(Self {
            database_url,
            log_level,
            db_max_connections,
            points_per_block,
            block_minutes,
            level_ceiling,
            streak_offset,
        })
    }

    /// The engine settings this configuration describes.
    pub fn progression_settings(&self) -> Result<ProgressionSettings, ConfigError> {
        let ladders = Ladders::new(self.level_ceiling)
            .map_err(|e: CurveError| invalid("LEVEL_CEILING", &e.to_string()))?;
        Ok(ProgressionSettings {
            ladders,
            rate: PointsRate {
                points_per_block: self.points_per_block,
                block_minutes: self.block_minutes,
            },
            streak: StreakTracker::new(self.streak_offset),
        })
    }
}

/// A set, non-blank variable, trimmed.
fn lookup<'a>(vars: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_or<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(vars, name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("'{raw}': {e}"))),
    }
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue(name.to_string(), reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_vars(HashMap::new()).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.points_per_block, 180);
        assert_eq!(config.block_minutes, 5);
        assert_eq!(config.level_ceiling, 5000);
        assert_eq!(config.streak_offset.local_minus_utc(), 0);
    }

    #[test]
    fn values_are_parsed_and_passed_to_the_engine() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/tracker"),
            ("RUST_LOG", "debug"),
            ("POINTS_PER_BLOCK", "60"),
            ("BLOCK_MINUTES", "1"),
            ("LEVEL_CEILING", "50"),
            ("STREAK_UTC_OFFSET_MINUTES", "-300"),
        ]))
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/tracker")
        );
        assert_eq!(config.log_level, Level::DEBUG);

        let settings = config.progression_settings().unwrap();
        assert_eq!(settings.rate.points_for_seconds(120), 120);
        assert_eq!(settings.ladders.term.ceiling(), 50);
        assert_eq!(settings.streak.offset().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn bad_values_name_the_variable() {
        for (name, value) in [
            ("RUST_LOG", "chatty"),
            ("POINTS_PER_BLOCK", "-1"),
            ("BLOCK_MINUTES", "0"),
            ("DB_MAX_CONNECTIONS", "many"),
            ("STREAK_UTC_OFFSET_MINUTES", "1440"),
        ] {
            match Config::from_vars(vars(&[(name, value)])) {
                Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, name),
                other => panic!("expected {name} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_ceiling_is_rejected_when_building_settings() {
        let config = Config::from_vars(vars(&[("LEVEL_CEILING", "0")])).unwrap();
        assert!(matches!(
            config.progression_settings(),
            Err(ConfigError::InvalidValue(name, _)) if name == "LEVEL_CEILING"
        ));
    }
}
