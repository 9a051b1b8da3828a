use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use study_tracker_core::{Clock, Grade, ProgressStore, ProgressionCoordinator};
use tracker_lib::{adapters::MemoryProgressStore, config::Config, error::TrackerError};

struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn start_of_day() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-10-07T07:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test]
async fn configured_rate_drives_the_ladders() -> Result<(), TrackerError> {
    let vars: HashMap<String, String> = [("POINTS_PER_BLOCK", "100"), ("BLOCK_MINUTES", "1")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::from_vars(vars)?;

    let store = Arc::new(MemoryProgressStore::new());
    let clock = Arc::new(SteppingClock(Mutex::new(start_of_day())));
    let coordinator =
        ProgressionCoordinator::new(store.clone(), clock.clone(), config.progression_settings()?);

    coordinator.register("u1", Some("Autumn")).await?;
    coordinator.start("u1", Some("Reading")).await?;
    clock.advance(Duration::minutes(8));
    let stopped = coordinator.stop("u1").await?;

    // 8 one-minute blocks at 100: level 2 costs 700, 100 left over.
    assert_eq!(stopped.recap.points_earned, 800);
    assert_eq!(stopped.recap.term_level, 2);
    assert_eq!(stopped.recap.term_xp, 100);

    let stored = store.load("u1").await?.unwrap();
    assert_eq!(stored, stopped.progress);
    Ok(())
}

#[tokio::test]
async fn engine_errors_convert_into_the_service_error() {
    let store = Arc::new(MemoryProgressStore::new());
    let clock = Arc::new(SteppingClock(Mutex::new(start_of_day())));
    let config = Config::from_vars(HashMap::new()).unwrap();
    let coordinator =
        ProgressionCoordinator::new(store, clock, config.progression_settings().unwrap());

    let err: TrackerError = coordinator.stop("ghost").await.unwrap_err().into();
    assert!(matches!(err, TrackerError::Progress(_)));
    assert!(err.to_string().contains("study tracker account"));
}

#[tokio::test]
async fn stats_report_renders_for_a_full_profile() -> Result<(), TrackerError> {
    let store = Arc::new(MemoryProgressStore::new());
    let clock = Arc::new(SteppingClock(Mutex::new(start_of_day())));
    let config = Config::from_vars(HashMap::new())?;
    let coordinator =
        ProgressionCoordinator::new(store.clone(), clock.clone(), config.progression_settings()?);

    coordinator.register("u2", Some("Spring")).await?;
    coordinator
        .add_term_course("u2", "Signals", "EE210", 3)
        .await?;
    coordinator
        .add_account_course("u2", "Calculus", "MA101", 4, Grade::AMinus)
        .await?;
    coordinator.start("u2", Some("EE210 - Fourier")).await?;
    clock.advance(Duration::minutes(50));
    coordinator.stop("u2").await?;

    let stats = coordinator.stats("u2").await?.recap;
    assert_eq!(stats.total_times_studied, 1);
    assert_eq!(stats.top_courses(3).len(), 1);
    assert_eq!(stats.gpa.gpa.to_string(), "3.700");

    let text = stats.to_string();
    assert!(text.contains("Term: Spring"));
    assert!(text.contains("GPA: 3.700"));
    assert!(store.load("u2").await?.is_some());
    Ok(())
}
