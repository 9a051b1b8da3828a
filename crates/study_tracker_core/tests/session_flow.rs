mod common;

use chrono::Duration;
use common::{harness, Harness, USER};
use study_tracker_core::coordinator::StopRecap;
use study_tracker_core::{ProgressError, ProgressEvent, RecordKind, SessionState};

#[tokio::test]
async fn break_time_is_excluded_from_credited_time() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();

    h.coordinator.start(USER, None).await.unwrap();
    h.clock.advance(Duration::minutes(4));
    h.coordinator.pause(USER).await.unwrap();
    h.clock.advance(Duration::minutes(2));
    let resumed = h.coordinator.resume(USER).await.unwrap();
    assert_eq!(resumed.recap.break_seconds, 120);
    h.clock.advance(Duration::minutes(6));

    let stopped = h.coordinator.stop(USER).await.unwrap();
    let summary = &stopped.recap.summary;
    assert_eq!(summary.net_seconds, 600);
    assert_eq!(summary.break_seconds, 120);
    assert_eq!(summary.break_count, 1);

    // Two full 5-minute blocks.
    assert_eq!(stopped.recap.points_earned, 360);

    let term = stopped.progress.term.as_ref().unwrap();
    assert_eq!(term.level, 1);
    assert_eq!(term.xp, 360);
    assert_eq!(term.active_seconds, 600);
    assert_eq!(term.break_seconds, 120);
    assert_eq!(term.break_count, 1);
    assert_eq!(term.streak, 1);
    assert_eq!(stopped.progress.account.lifetime_seconds, 600);
    assert_eq!(stopped.progress.account.rank, 1);
    assert_eq!(stopped.progress.account.rp, 60);

    assert_eq!(
        stopped.events,
        vec![
            ProgressEvent::RankUp {
                levels_gained: 1,
                new_rank: 1,
                leftover_points: 60,
            },
            ProgressEvent::RecordBroken {
                kind: RecordKind::Session,
                value_seconds: 600,
            },
        ]
    );

    let stored = h.store.get(USER).await.unwrap();
    assert_eq!(stored, stopped.progress);
    assert_eq!(stored.session.state(), SessionState::Idle);
}

#[tokio::test]
async fn long_session_levels_up_the_term() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();

    h.coordinator.start(USER, None).await.unwrap();
    h.clock.advance(Duration::minutes(29));
    let stopped = h.coordinator.stop(USER).await.unwrap();

    // 5 blocks = 900 xp: 700 for level 2, 200 carried.
    let term = stopped.progress.term.as_ref().unwrap();
    assert_eq!((term.level, term.xp), (2, 200));
    assert!(stopped.events.contains(&ProgressEvent::LevelUp {
        levels_gained: 1,
        new_level: 2,
        leftover_points: 200,
    }));
}

#[tokio::test]
async fn short_session_earns_nothing_and_raises_no_ladder_event() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();

    h.coordinator.start(USER, None).await.unwrap();
    h.clock.advance(Duration::minutes(4) + Duration::seconds(59));
    let stopped = h.coordinator.stop(USER).await.unwrap();

    assert_eq!(stopped.recap.points_earned, 0);
    assert!(stopped
        .events
        .iter()
        .all(|e| matches!(e, ProgressEvent::RecordBroken { .. })));
}

#[tokio::test]
async fn stop_during_a_break_is_rejected_and_nothing_is_saved() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();
    h.coordinator.start(USER, None).await.unwrap();
    h.clock.advance(Duration::minutes(10));
    h.coordinator.pause(USER).await.unwrap();
    let before = h.store.get(USER).await.unwrap();

    h.clock.advance(Duration::minutes(10));
    let err = h.coordinator.stop(USER).await.unwrap_err();

    assert!(matches!(err, ProgressError::CannotStopWhilePaused));
    assert_eq!(h.store.get(USER).await.unwrap(), before);
}

#[tokio::test]
async fn lifecycle_preconditions_are_enforced() {
    let h = harness();

    assert!(matches!(
        h.coordinator.start(USER, None).await,
        Err(ProgressError::NoAccount)
    ));

    h.coordinator.register(USER, None).await.unwrap();
    assert!(matches!(
        h.coordinator.start(USER, None).await,
        Err(ProgressError::NoActiveTerm)
    ));
    assert!(matches!(
        h.coordinator.stop(USER).await,
        Err(ProgressError::NotStarted)
    ));

    h.coordinator.register(USER, Some("Spring")).await.unwrap();
    assert!(matches!(
        h.coordinator.pause(USER).await,
        Err(ProgressError::NotStarted)
    ));
    h.coordinator.start(USER, None).await.unwrap();
    assert!(matches!(
        h.coordinator.start(USER, None).await,
        Err(ProgressError::AlreadyRunning)
    ));
    assert!(matches!(
        h.coordinator.resume(USER).await,
        Err(ProgressError::NotPaused)
    ));
    h.coordinator.pause(USER).await.unwrap();
    assert!(matches!(
        h.coordinator.pause(USER).await,
        Err(ProgressError::AlreadyPaused)
    ));
}

/// Waits `gap`, then studies for half an hour.
async fn study_after(h: &Harness, gap: Duration) -> StopRecap {
    h.clock.advance(gap);
    h.coordinator.start(USER, None).await.unwrap();
    h.clock.advance(Duration::minutes(30));
    h.coordinator.stop(USER).await.unwrap().recap
}

#[tokio::test]
async fn streak_follows_calendar_days_across_sessions() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();

    assert_eq!(study_after(&h, Duration::zero()).await.streak, 1);
    // Same day.
    assert_eq!(study_after(&h, Duration::hours(2)).await.streak, 1);
    // Next day.
    assert_eq!(study_after(&h, Duration::days(1)).await.streak, 2);
    assert_eq!(study_after(&h, Duration::days(1)).await.streak, 3);
    // Skipped two days.
    let recap = study_after(&h, Duration::days(3)).await;
    assert_eq!((recap.streak, recap.longest_streak), (1, 3));
}

#[tokio::test]
async fn topic_matches_term_courses() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();
    h.coordinator
        .add_term_course(USER, "Compilers", "CS440", 4)
        .await
        .unwrap();

    let started = h
        .coordinator
        .start(USER, Some("cs440 - parsing"))
        .await
        .unwrap();
    assert_eq!(started.recap.course.as_deref(), Some("CS440"));

    h.coordinator.set_topic(USER, "CS440").await.unwrap();
    let info = h.coordinator.session_info(USER).await.unwrap();
    assert_eq!(info.recap.topic.as_deref(), Some("CS440"));

    h.clock.advance(Duration::minutes(15));
    let stopped = h.coordinator.stop(USER).await.unwrap();
    assert_eq!(stopped.recap.summary.courses_studied, vec!["CS440".to_string()]);
    let term = stopped.progress.term.unwrap();
    assert_eq!(term.course("CS440").unwrap().times_studied, 1);
    assert_eq!(stopped.progress.session.last_topic.as_deref(), Some("CS440"));
}

#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
    let h = harness();
    h.coordinator.register(USER, Some("Fall 2024")).await.unwrap();
    h.store
        .fail_saves
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let err = h.coordinator.start(USER, None).await.unwrap_err();
    assert_eq!(err.code(), "storage");
    assert_eq!(
        h.store.get(USER).await.unwrap().session.state(),
        SessionState::Idle
    );
}
