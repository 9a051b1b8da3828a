//! crates/study_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the progression engine.
//! These structs are independent of any database; they derive serde so that
//! a store can persist the whole aggregate as one document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grade_book::Grade;

/// Platform user identifier (chat-platform snowflake, opaque to the engine).
pub type UserId = String;

//=========================================================================================
// Courses
//=========================================================================================

/// A course tracked inside a term. Counts how many sessions touched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCourse {
    pub name: String,
    pub code: String,
    pub credit_hours: u32,
    pub times_studied: u32,
}

/// A graded course kept on the account; feeds the GPA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCourse {
    pub name: String,
    pub code: String,
    pub credit_hours: u32,
    pub grade: Grade,
}

//=========================================================================================
// Term
//=========================================================================================

/// A bounded study period (an academic semester) with its own ladder and streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub active_seconds: u64,
    /// Start time of every session in this term, in start order.
    pub session_starts: Vec<DateTime<Utc>>,
    pub break_seconds: u64,
    pub break_count: u32,
    pub longest_session_seconds: u64,
    pub streak: u32,
    pub longest_streak: u32,
    pub last_streak_update: Option<DateTime<Utc>>,
    pub courses: Vec<TermCourse>,
}

impl Term {
    /// Creates a fresh, empty term at level 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            xp: 0,
            active_seconds: 0,
            session_starts: Vec::new(),
            break_seconds: 0,
            break_count: 0,
            longest_session_seconds: 0,
            streak: 0,
            longest_streak: 0,
            last_streak_update: None,
            courses: Vec::new(),
        }
    }

    pub fn course(&self, code: &str) -> Option<&TermCourse> {
        self.courses.iter().find(|c| same_code(&c.code, code))
    }

    pub fn course_mut(&mut self, code: &str) -> Option<&mut TermCourse> {
        self.courses.iter_mut().find(|c| same_code(&c.code, code))
    }

    pub fn has_course_named(&self, name: &str) -> bool {
        self.courses.iter().any(|c| same_name(&c.name, name))
    }
}

//=========================================================================================
// Account
//=========================================================================================

/// Lifetime data for one user: the account ladder, lifetime time and graded courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,
    pub lifetime_seconds: u64,
    pub rank: u32,
    pub rp: u64,
    /// Deep copy of the completed term with the highest total time.
    pub record_term: Option<Term>,
    pub courses: Vec<AccountCourse>,
}

impl Account {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            lifetime_seconds: 0,
            rank: 0,
            rp: 0,
            record_term: None,
            courses: Vec::new(),
        }
    }

    pub fn course(&self, code: &str) -> Option<&AccountCourse> {
        self.courses.iter().find(|c| same_code(&c.code, code))
    }

    pub fn has_course_named(&self, name: &str) -> bool {
        self.courses.iter().any(|c| same_name(&c.name, name))
    }
}

//=========================================================================================
// Session & Break
//=========================================================================================

/// Break bookkeeping for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    /// Set while the session is on break.
    pub started_at: Option<DateTime<Utc>>,
    pub accumulated_seconds: u64,
}

/// The single study session of a user. `started_at == None` means idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub started_at: Option<DateTime<Utc>>,
    /// Net elapsed seconds of the last completed session.
    pub last_elapsed_seconds: u64,
    pub current_break: Break,
    pub break_count: u32,
    pub topic: Option<String>,
    pub last_topic: Option<String>,
    /// Course codes studied this session, in first-seen order, without duplicates.
    pub courses_studied: Vec<String>,
}

//=========================================================================================
// Aggregate
//=========================================================================================

/// Everything the engine knows about one user; read and written as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub account: Account,
    /// `None` until a term is registered, and again after a term ends.
    pub term: Option<Term>,
    pub session: Session,
}

impl UserProgress {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            account: Account::new(user_id),
            term: None,
            session: Session::default(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.account.user_id
    }
}

/// Course codes compare case-insensitively, ignoring surrounding whitespace.
pub(crate) fn same_code(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_term_starts_at_level_one() {
        let term = Term::new("Fall");
        assert_eq!(term.level, 1);
        assert_eq!(term.xp, 0);
        assert!(term.session_starts.is_empty());
        assert!(term.last_streak_update.is_none());
    }

    #[test]
    fn course_lookup_ignores_case_and_padding() {
        let mut term = Term::new("Fall");
        term.courses.push(TermCourse {
            name: "Linear Algebra".to_string(),
            code: "MATH201".to_string(),
            credit_hours: 3,
            times_studied: 0,
        });
        assert!(term.course(" math201 ").is_some());
        assert!(term.has_course_named("linear algebra"));
        assert!(term.course("MATH202").is_none());
    }

    #[test]
    fn aggregate_survives_json_round_trip() {
        let mut progress = UserProgress::new("42");
        progress.term = Some(Term::new("Spring"));
        let json = serde_json::to_string(&progress).unwrap();
        let back: UserProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progress);
    }
}
