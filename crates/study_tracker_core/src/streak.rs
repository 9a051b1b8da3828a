//! crates/study_tracker_core/src/streak.rs
//!
//! Day-boundary streak continuity. Days are calendar days in one fixed
//! offset, so a late-night session and a morning session are judged the
//! same way for every user of a deployment.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

use crate::domain::Term;

/// Streak fields of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
    pub last_update: Option<DateTime<Utc>>,
}

impl StreakState {
    pub fn of(term: &Term) -> Self {
        Self {
            current: term.streak,
            longest: term.longest_streak,
            last_update: term.last_streak_update,
        }
    }

    pub fn write_to(self, term: &mut Term) {
        term.streak = self.current;
        term.longest_streak = self.longest;
        term.last_streak_update = self.last_update;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTracker {
    offset: FixedOffset,
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self::utc()
    }
}

impl StreakTracker {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Advances the streak for a session completed at `now`.
    ///
    /// Same day (or an earlier day, after clock skew) leaves everything
    /// untouched, so repeated stops on one day count once.
    pub fn update(&self, state: StreakState, now: DateTime<Utc>) -> StreakState {
        let today = self.day_of(now);

        let current = match state.last_update.map(|at| self.day_of(at)) {
            None => 1,
            Some(last) if today <= last => return state,
            Some(last) if last + Duration::days(1) == today => state.current.saturating_add(1),
            Some(_) => 1,
        };

        StreakState {
            current,
            longest: state.longest.max(current),
            last_update: Some(now),
        }
    }

    /// A streak is alive while its last update was today or yesterday.
    pub fn is_current(&self, last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_update {
            None => false,
            Some(at) => {
                let last = self.day_of(at);
                let today = self.day_of(now);
                today == last || today == last + Duration::days(1)
            }
        }
    }
}
