//! crates/study_tracker_core/src/session_clock.rs
//!
//! The session/break state machine:
//!
//! ```text
//! Idle --start--> Active --pause--> OnBreak --resume--> Active --stop--> Idle
//! ```
//!
//! Every transition checks its source state before touching anything, so a
//! rejected call leaves the session, term and account exactly as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, Session, Term};
use crate::error::{ProgressError, ProgressResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Active,
    OnBreak,
}

/// What a completed session contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub wall_seconds: u64,
    /// Break time, clamped to `wall_seconds`.
    pub break_seconds: u64,
    pub net_seconds: u64,
    pub break_count: u32,
    pub topic: Option<String>,
    pub courses_studied: Vec<String>,
    /// The term's longest session before this one was folded in.
    pub previous_longest_seconds: u64,
}

impl SessionSummary {
    pub fn is_longest_session(&self) -> bool {
        self.net_seconds > self.previous_longest_seconds
    }
}

/// Read-only view of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    pub net_seconds: u64,
    pub break_seconds: u64,
    /// Length of the break in progress, zero when active.
    pub active_break_seconds: u64,
    pub break_count: u32,
    pub topic: Option<String>,
}

/// Whole seconds between two instants; negative spans (clock skew) are zero.
pub fn whole_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0) / 1000
}

impl Session {
    pub fn state(&self) -> SessionState {
        match (self.started_at, self.current_break.started_at) {
            (None, _) => SessionState::Idle,
            (Some(_), None) => SessionState::Active,
            (Some(_), Some(_)) => SessionState::OnBreak,
        }
    }

    /// Idle -> Active. Clears break and topic tracking and logs the start on the term.
    pub fn start(&mut self, term: &mut Term, now: DateTime<Utc>) -> ProgressResult<()> {
        if self.state() != SessionState::Idle {
            return Err(ProgressError::AlreadyRunning);
        }

        self.started_at = Some(now);
        self.current_break = Default::default();
        self.break_count = 0;
        self.topic = None;
        self.courses_studied.clear();
        term.session_starts.push(now);
        Ok(())
    }

    /// Active -> OnBreak.
    pub fn pause(&mut self, now: DateTime<Utc>) -> ProgressResult<()> {
        match self.state() {
            SessionState::Idle => Err(ProgressError::NotStarted),
            SessionState::OnBreak => Err(ProgressError::AlreadyPaused),
            SessionState::Active => {
                self.current_break.started_at = Some(now);
                Ok(())
            }
        }
    }

    /// OnBreak -> Active. Returns the length of the break just closed.
    pub fn resume(&mut self, term: &mut Term, now: DateTime<Utc>) -> ProgressResult<u64> {
        let break_start = match (self.state(), self.current_break.started_at) {
            (SessionState::Idle, _) => return Err(ProgressError::NotStarted),
            (SessionState::OnBreak, Some(start)) => start,
            _ => return Err(ProgressError::NotPaused),
        };

        let seconds = whole_seconds(break_start, now);
        self.current_break.accumulated_seconds =
            self.current_break.accumulated_seconds.saturating_add(seconds);
        self.current_break.started_at = None;
        self.break_count = self.break_count.saturating_add(1);
        term.break_count = term.break_count.saturating_add(1);
        Ok(seconds)
    }

    /// Active -> Idle. Folds the net time into the term and the account and
    /// resets the session; this session's topic (or none) becomes `last_topic`.
    pub fn stop(
        &mut self,
        term: &mut Term,
        account: &mut Account,
        now: DateTime<Utc>,
    ) -> ProgressResult<SessionSummary> {
        let started_at = match (self.state(), self.started_at) {
            (SessionState::OnBreak, _) => return Err(ProgressError::CannotStopWhilePaused),
            (SessionState::Active, Some(start)) => start,
            _ => return Err(ProgressError::NotStarted),
        };

        let wall_seconds = whole_seconds(started_at, now);
        let break_seconds = self.current_break.accumulated_seconds.min(wall_seconds);
        let net_seconds = wall_seconds - break_seconds;

        let summary = SessionSummary {
            started_at,
            stopped_at: now,
            wall_seconds,
            break_seconds,
            net_seconds,
            break_count: self.break_count,
            topic: self.topic.clone(),
            courses_studied: self.courses_studied.clone(),
            previous_longest_seconds: term.longest_session_seconds,
        };

        term.active_seconds = term.active_seconds.saturating_add(net_seconds);
        term.break_seconds = term.break_seconds.saturating_add(break_seconds);
        term.longest_session_seconds = term.longest_session_seconds.max(net_seconds);
        account.lifetime_seconds = account.lifetime_seconds.saturating_add(net_seconds);

        *self = Session {
            last_elapsed_seconds: net_seconds,
            last_topic: self.topic.take(),
            ..Session::default()
        };

        Ok(summary)
    }

    /// Records what the user is studying. A topic of the form `"CODE"` or
    /// `"CODE - anything"` that names a term course counts one study of that
    /// course per session. Returns the matched course code.
    pub fn set_topic(&mut self, term: &mut Term, topic: &str) -> ProgressResult<Option<String>> {
        if self.state() == SessionState::Idle {
            return Err(ProgressError::NotStarted);
        }
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ProgressError::InvalidInput("topic cannot be blank".to_string()));
        }

        self.topic = Some(topic.to_string());

        let code = course_code_of(topic);
        let Some(course) = term.course_mut(code) else {
            return Ok(None);
        };
        let already_counted = self
            .courses_studied
            .iter()
            .any(|seen| seen.eq_ignore_ascii_case(&course.code));
        if !already_counted {
            course.times_studied = course.times_studied.saturating_add(1);
            self.courses_studied.push(course.code.clone());
        }
        Ok(Some(course.code.clone()))
    }

    /// Live view of the session at `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> ProgressResult<SessionSnapshot> {
        let started_at = self.started_at.ok_or(ProgressError::NotStarted)?;
        let wall_seconds = whole_seconds(started_at, now);
        let active_break_seconds = self
            .current_break
            .started_at
            .map(|start| whole_seconds(start, now))
            .unwrap_or(0);
        let break_seconds = self.current_break.accumulated_seconds.min(wall_seconds);
        let paused = (break_seconds + active_break_seconds).min(wall_seconds);

        Ok(SessionSnapshot {
            state: self.state(),
            started_at,
            net_seconds: wall_seconds - paused,
            break_seconds,
            active_break_seconds,
            break_count: self.break_count,
            topic: self.topic.clone(),
        })
    }
}

fn course_code_of(topic: &str) -> &str {
    topic.split(" - ").next().unwrap_or(topic).trim()
}
