//! crates/study_tracker_core/src/coordinator.rs
//!
//! The progression coordinator: loads a user's aggregate through the store
//! port, runs one engine operation against it and writes it back whole.
//!
//! Operations validate everything before mutating, and nothing is saved when
//! an operation fails, so a failed call leaves the stored aggregate as it was.
//! The caller must keep at most one operation in flight per user.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{Account, AccountCourse, Session, Term, TermCourse, UserProgress};
use crate::error::{ProgressError, ProgressResult};
use crate::events::{ProgressEvent, RecordKind};
use crate::grade_book::{compute_course_gpa, Grade, GpaSummary};
use crate::level_curve::{Ladders, PointsRate};
use crate::ports::{Clock, ProgressStore};
use crate::session_clock::{SessionSnapshot, SessionState, SessionSummary};
use crate::stats::StatsSnapshot;
use crate::streak::{StreakState, StreakTracker};

/// Longest accepted course name, in characters.
pub const MAX_COURSE_NAME_LEN: usize = 100;
/// Accepted credit-hour range for a course.
pub const CREDIT_HOURS_RANGE: std::ops::RangeInclusive<u32> = 1..=12;

//=========================================================================================
// Settings & outcome
//=========================================================================================

/// The tunable parts of the engine.
#[derive(Debug, Clone, Default)]
pub struct ProgressionSettings {
    pub ladders: Ladders,
    pub rate: PointsRate,
    pub streak: StreakTracker,
}

/// Successful result of an operation: the aggregate as stored, a typed
/// recap for rendering, and the events raised along the way.
#[derive(Debug, Clone)]
pub struct Outcome<R> {
    pub progress: UserProgress,
    pub recap: R,
    pub events: Vec<ProgressEvent>,
}

impl<R> Outcome<R> {
    fn quiet(progress: UserProgress, recap: R) -> Self {
        Self {
            progress,
            recap,
            events: Vec::new(),
        }
    }
}

//=========================================================================================
// Recaps
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRecap {
    pub account_created: bool,
    pub term_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRecap {
    pub started_at: DateTime<Utc>,
    pub topic: Option<String>,
    /// Term course matched by the topic, if any.
    pub course: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRecap {
    pub break_seconds: u64,
    pub break_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecap {
    pub topic: String,
    pub course: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecap {
    pub summary: SessionSummary,
    /// Points credited to each ladder.
    pub points_earned: u64,
    pub term_level: u32,
    pub term_xp: u64,
    pub account_rank: u32,
    pub account_rp: u64,
    pub streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTermRecap {
    pub term_name: String,
    pub total_seconds: u64,
    pub session_count: usize,
    pub break_seconds: u64,
    pub longest_session_seconds: u64,
    pub level: u32,
    /// Total term xp converted into account rp.
    pub points_converted: u64,
    pub account_rank: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecap {
    pub change: CourseChange,
    pub name: String,
    pub code: String,
    pub credit_hours: u32,
    /// Set for account courses.
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpaReport {
    pub summary: GpaSummary,
    pub courses: Vec<AccountCourse>,
}

impl fmt::Display for RegisterRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.account_created, &self.term_name) {
            (true, Some(term)) => write!(f, "Account created, term '{term}' started."),
            (true, None) => write!(f, "Account created."),
            (false, Some(term)) => write!(f, "Term '{term}' started."),
            (false, None) => write!(f, "Nothing to register."),
        }
    }
}

impl fmt::Display for StartRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session started at {}", self.started_at.format("%H:%M:%S UTC"))?;
        if let Some(topic) = &self.topic {
            write!(f, "\n• Topic: {topic}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ResumeRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session resumed after a {} break (break #{}).",
            format_duration(self.break_seconds),
            self.break_count
        )
    }
}

impl fmt::Display for TopicRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.course {
            Some(code) => write!(f, "Topic set to '{}' ({code}).", self.topic),
            None => write!(f, "Topic set to '{}'.", self.topic),
        }
    }
}

impl fmt::Display for StopRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "• Time Elapsed: {}", format_duration(s.wall_seconds))?;
        writeln!(f, "• Time Studied: {}", format_duration(s.net_seconds))?;
        writeln!(f, "• Break Time: {}", format_duration(s.break_seconds))?;
        writeln!(f, "• Number Of Breaks: {}", s.break_count)?;
        if let Some(topic) = &s.topic {
            writeln!(f, "• Topic: {topic}")?;
        }
        writeln!(f, "• XP & RP Earned: {}", self.points_earned)?;
        writeln!(f, "• Level {} / Rank {}", self.term_level, self.account_rank)?;
        write!(f, "• Streak: {} (best {})", self.streak, self.longest_streak)
    }
}

impl fmt::Display for EndTermRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Term '{}' ended.", self.term_name)?;
        writeln!(f, "• Total Time: {}", format_duration(self.total_seconds))?;
        writeln!(f, "• Number of Sessions: {}", self.session_count)?;
        writeln!(f, "• Total Break Time: {}", format_duration(self.break_seconds))?;
        writeln!(
            f,
            "• Longest Session: {}",
            format_duration(self.longest_session_seconds)
        )?;
        writeln!(f, "• Term Level: {}", self.level)?;
        write!(f, "• Account RP Converted: {}", self.points_converted)
    }
}

impl fmt::Display for CourseRecap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.change {
            CourseChange::Added => "Added",
            CourseChange::Removed => "Removed",
        };
        write!(
            f,
            "{verb} {} ({}), {} credit hours",
            self.name, self.code, self.credit_hours
        )?;
        if let Some(grade) = self.grade {
            write!(f, ", grade {grade}")?;
        }
        Ok(())
    }
}

impl fmt::Display for GpaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.summary.has_gpa() {
            return write!(f, "No graded courses yet.");
        }
        writeln!(f, "• GPA: {}", self.summary.gpa)?;
        writeln!(f, "• Credit Hours: {}", self.summary.total_credit_hours)?;
        write!(f, "• Quality Points: {}", self.summary.quality_points)
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            SessionState::Idle => "Idle",
            SessionState::Active => "Active",
            SessionState::OnBreak => "On break",
        };
        writeln!(f, "• State: {state}")?;
        writeln!(f, "• Time Studied: {}", format_duration(self.net_seconds))?;
        write!(f, "• Breaks: {}", self.break_count)?;
        if self.active_break_seconds > 0 {
            write!(
                f,
                "\n• Current Break: {}",
                format_duration(self.active_break_seconds)
            )?;
        }
        if let Some(topic) = &self.topic {
            write!(f, "\n• Topic: {topic}")?;
        }
        Ok(())
    }
}

/// Short human duration: `"2d 3h 45m"`, `"12m 5s"`, `"0s"`.
pub fn format_duration(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "0s".to_string();
    }
    let units = [
        (total_seconds / 86_400, "d"),
        (total_seconds % 86_400 / 3_600, "h"),
        (total_seconds % 3_600 / 60, "m"),
        (total_seconds % 60, "s"),
    ];
    units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

//=========================================================================================
// ProgressionCoordinator
//=========================================================================================

pub struct ProgressionCoordinator {
    store: Arc<dyn ProgressStore>,
    clock: Arc<dyn Clock>,
    settings: ProgressionSettings,
}

impl ProgressionCoordinator {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        settings: ProgressionSettings,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    async fn load_existing(&self, user_id: &str) -> ProgressResult<UserProgress> {
        self.store
            .load(user_id)
            .await?
            .ok_or(ProgressError::NoAccount)
    }

    async fn persist(&self, progress: UserProgress) -> ProgressResult<UserProgress> {
        Ok(self.store.save(progress).await?)
    }

    //--- Registration ---------------------------------------------------------------------

    /// Creates the account if missing and, when a name is given, a fresh term.
    pub async fn register(
        &self,
        user_id: &str,
        term_name: Option<&str>,
    ) -> ProgressResult<Outcome<RegisterRecap>> {
        let term_name = term_name.map(str::trim);
        if term_name.is_some_and(str::is_empty) {
            return Err(ProgressError::InvalidInput(
                "term name cannot be blank".to_string(),
            ));
        }

        let existing = self.store.load(user_id).await?;
        let account_created = existing.is_none();
        let mut progress = match (existing, term_name) {
            (Some(_), None) => return Err(ProgressError::DuplicateAccount(user_id.to_string())),
            (Some(progress), Some(_)) => {
                if let Some(term) = &progress.term {
                    return Err(ProgressError::TermAlreadyActive(term.name.clone()));
                }
                progress
            }
            (None, _) => UserProgress::new(user_id),
        };

        if let Some(name) = term_name {
            progress.term = Some(Term::new(name));
        }

        let progress = self.persist(progress).await?;
        info!(user_id, account_created, term = ?term_name, "Registered.");
        Ok(Outcome::quiet(
            progress,
            RegisterRecap {
                account_created,
                term_name: term_name.map(str::to_string),
            },
        ))
    }

    //--- Session lifecycle ----------------------------------------------------------------

    pub async fn start(
        &self,
        user_id: &str,
        topic: Option<&str>,
    ) -> ProgressResult<Outcome<StartRecap>> {
        let mut progress = self.load_existing(user_id).await?;
        let now = self.clock.now();

        let UserProgress { term, session, .. } = &mut progress;
        let term = term.as_mut().ok_or(ProgressError::NoActiveTerm)?;
        session.start(term, now)?;
        let course = match topic {
            Some(topic) => session.set_topic(term, topic)?,
            None => None,
        };
        let topic = session.topic.clone();

        let progress = self.persist(progress).await?;
        info!(user_id, started_at = %now, "Session started.");
        Ok(Outcome::quiet(
            progress,
            StartRecap {
                started_at: now,
                topic,
                course,
            },
        ))
    }

    pub async fn pause(&self, user_id: &str) -> ProgressResult<Outcome<SessionSnapshot>> {
        let mut progress = self.load_existing(user_id).await?;
        let now = self.clock.now();

        progress.session.pause(now)?;
        let snapshot = progress.session.snapshot(now)?;

        let progress = self.persist(progress).await?;
        debug!(user_id, net_seconds = snapshot.net_seconds, "Session paused.");
        Ok(Outcome::quiet(progress, snapshot))
    }

    pub async fn resume(&self, user_id: &str) -> ProgressResult<Outcome<ResumeRecap>> {
        let mut progress = self.load_existing(user_id).await?;
        let now = self.clock.now();

        let (session, term, _) = session_parts(&mut progress)?;
        let break_seconds = session.resume(term, now)?;
        let recap = ResumeRecap {
            break_seconds,
            break_count: session.break_count,
        };

        let progress = self.persist(progress).await?;
        debug!(user_id, break_seconds, "Session resumed.");
        Ok(Outcome::quiet(progress, recap))
    }

    /// Ends the session and credits it: ladders, streak and records.
    pub async fn stop(&self, user_id: &str) -> ProgressResult<Outcome<StopRecap>> {
        let mut progress = self.load_existing(user_id).await?;
        let now = self.clock.now();
        let ProgressionSettings {
            ladders,
            rate,
            streak,
        } = &self.settings;

        let (session, term, account) = session_parts(&mut progress)?;
        let summary = session.stop(term, account, now)?;
        let mut events = Vec::new();

        let earned = rate.points_for_seconds(summary.net_seconds);

        let level = ladders
            .term
            .apply(term.level, signed(term.xp), signed(earned));
        term.level = level.level;
        term.xp = level.leftover_points;
        events.extend(ProgressEvent::level_up(&level));

        let rank = ladders
            .account
            .apply(account.rank, signed(account.rp), signed(earned));
        account.rank = rank.level;
        account.rp = rank.leftover_points;
        events.extend(ProgressEvent::rank_up(&rank));

        streak.update(StreakState::of(term), now).write_to(term);

        if summary.is_longest_session() {
            events.push(ProgressEvent::RecordBroken {
                kind: RecordKind::Session,
                value_seconds: summary.net_seconds,
            });
        }

        let recap = StopRecap {
            points_earned: earned,
            term_level: term.level,
            term_xp: term.xp,
            account_rank: account.rank,
            account_rp: account.rp,
            streak: term.streak,
            longest_streak: term.longest_streak,
            summary,
        };

        let progress = self.persist(progress).await?;
        info!(
            user_id,
            net_seconds = recap.summary.net_seconds,
            points_earned = earned,
            events = events.len(),
            "Session stopped."
        );
        Ok(Outcome {
            progress,
            recap,
            events,
        })
    }

    pub async fn set_topic(
        &self,
        user_id: &str,
        topic: &str,
    ) -> ProgressResult<Outcome<TopicRecap>> {
        let mut progress = self.load_existing(user_id).await?;

        let (session, term, _) = session_parts(&mut progress)?;
        let course = session.set_topic(term, topic)?;
        let recap = TopicRecap {
            topic: topic.trim().to_string(),
            course,
        };

        let progress = self.persist(progress).await?;
        debug!(user_id, topic = %recap.topic, "Topic set.");
        Ok(Outcome::quiet(progress, recap))
    }

    /// Live view of the running session. Read-only.
    pub async fn session_info(&self, user_id: &str) -> ProgressResult<Outcome<SessionSnapshot>> {
        let progress = self.load_existing(user_id).await?;
        let snapshot = progress.session.snapshot(self.clock.now())?;
        Ok(Outcome::quiet(progress, snapshot))
    }

    //--- Term lifecycle -------------------------------------------------------------------

    /// Converts the active term into account rp, updates the record term and
    /// lifetime time, and leaves the user without an active term.
    pub async fn end_term(&self, user_id: &str) -> ProgressResult<Outcome<EndTermRecap>> {
        let mut progress = self.load_existing(user_id).await?;
        if progress.session.state() != SessionState::Idle {
            return Err(ProgressError::AlreadyRunning);
        }
        let term = progress.term.take().ok_or(ProgressError::NoActiveTerm)?;
        let ladders = &self.settings.ladders;
        let account = &mut progress.account;
        let mut events = Vec::new();

        let converted = ladders
            .term
            .total_points_through(term.level)
            .saturating_add(term.xp);

        let rank = ladders
            .account
            .apply(account.rank, signed(account.rp), signed(converted));
        account.rank = rank.level;
        account.rp = rank.leftover_points;
        events.extend(ProgressEvent::rank_up(&rank));

        if is_record_term(account, &term) {
            events.push(ProgressEvent::RecordBroken {
                kind: RecordKind::Term,
                value_seconds: term.active_seconds,
            });
            account.record_term = Some(term.clone());
        }

        account.lifetime_seconds = account.lifetime_seconds.saturating_add(term.active_seconds);

        let recap = EndTermRecap {
            term_name: term.name,
            total_seconds: term.active_seconds,
            session_count: term.session_starts.len(),
            break_seconds: term.break_seconds,
            longest_session_seconds: term.longest_session_seconds,
            level: term.level,
            points_converted: converted,
            account_rank: account.rank,
        };

        let progress = self.persist(progress).await?;
        info!(
            user_id,
            term = %recap.term_name,
            points_converted = converted,
            "Term ended."
        );
        Ok(Outcome {
            progress,
            recap,
            events,
        })
    }

    //--- Courses --------------------------------------------------------------------------

    pub async fn add_term_course(
        &self,
        user_id: &str,
        name: &str,
        code: &str,
        credit_hours: u32,
    ) -> ProgressResult<Outcome<CourseRecap>> {
        let (name, code) = validate_course(name, code, credit_hours)?;
        let mut progress = self.load_existing(user_id).await?;

        let UserProgress { account, term, .. } = &mut progress;
        let term = term.as_mut().ok_or(ProgressError::NoActiveTerm)?;
        if term.course(&code).is_some() {
            return Err(ProgressError::DuplicateCourse(code));
        }
        if term.has_course_named(&name) || account.has_course_named(&name) {
            return Err(ProgressError::DuplicateCourse(name));
        }

        term.courses.push(TermCourse {
            name: name.clone(),
            code: code.clone(),
            credit_hours,
            times_studied: 0,
        });

        let progress = self.persist(progress).await?;
        info!(user_id, code = %code, "Term course added.");
        Ok(Outcome::quiet(
            progress,
            CourseRecap {
                change: CourseChange::Added,
                name,
                code,
                credit_hours,
                grade: None,
            },
        ))
    }

    pub async fn remove_term_course(
        &self,
        user_id: &str,
        code: &str,
    ) -> ProgressResult<Outcome<CourseRecap>> {
        let mut progress = self.load_existing(user_id).await?;
        let term = progress.term.as_mut().ok_or(ProgressError::NoActiveTerm)?;

        let index = term
            .courses
            .iter()
            .position(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| ProgressError::CourseNotFound(code.trim().to_string()))?;
        let removed = term.courses.remove(index);

        let progress = self.persist(progress).await?;
        info!(user_id, code = %removed.code, "Term course removed.");
        Ok(Outcome::quiet(
            progress,
            CourseRecap {
                change: CourseChange::Removed,
                name: removed.name,
                code: removed.code,
                credit_hours: removed.credit_hours,
                grade: None,
            },
        ))
    }

    pub async fn add_account_course(
        &self,
        user_id: &str,
        name: &str,
        code: &str,
        credit_hours: u32,
        grade: Grade,
    ) -> ProgressResult<Outcome<CourseRecap>> {
        let (name, code) = validate_course(name, code, credit_hours)?;
        let mut progress = self.load_existing(user_id).await?;

        let UserProgress { account, term, .. } = &mut progress;
        if account.course(&code).is_some() {
            return Err(ProgressError::DuplicateCourse(code));
        }
        let in_term = term.as_ref().is_some_and(|t| t.has_course_named(&name));
        if in_term || account.has_course_named(&name) {
            return Err(ProgressError::DuplicateCourse(name));
        }

        account.courses.push(AccountCourse {
            name: name.clone(),
            code: code.clone(),
            credit_hours,
            grade,
        });

        let progress = self.persist(progress).await?;
        info!(user_id, code = %code, grade = %grade, "Account course added.");
        Ok(Outcome::quiet(
            progress,
            CourseRecap {
                change: CourseChange::Added,
                name,
                code,
                credit_hours,
                grade: Some(grade),
            },
        ))
    }

    pub async fn remove_account_course(
        &self,
        user_id: &str,
        code: &str,
    ) -> ProgressResult<Outcome<CourseRecap>> {
        let mut progress = self.load_existing(user_id).await?;
        let account = &mut progress.account;

        let index = account
            .courses
            .iter()
            .position(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .ok_or_else(|| ProgressError::CourseNotFound(code.trim().to_string()))?;
        let removed = account.courses.remove(index);

        let progress = self.persist(progress).await?;
        info!(user_id, code = %removed.code, "Account course removed.");
        Ok(Outcome::quiet(
            progress,
            CourseRecap {
                change: CourseChange::Removed,
                name: removed.name,
                code: removed.code,
                credit_hours: removed.credit_hours,
                grade: Some(removed.grade),
            },
        ))
    }

    //--- Read-only reports ----------------------------------------------------------------

    pub async fn gpa_report(&self, user_id: &str) -> ProgressResult<Outcome<GpaReport>> {
        let progress = self.load_existing(user_id).await?;
        let report = GpaReport {
            summary: compute_course_gpa(&progress.account.courses),
            courses: progress.account.courses.clone(),
        };
        Ok(Outcome::quiet(progress, report))
    }

    pub async fn stats(&self, user_id: &str) -> ProgressResult<Outcome<StatsSnapshot>> {
        let progress = self.load_existing(user_id).await?;
        let snapshot = StatsSnapshot::from_progress(&progress, &self.settings, self.clock.now());
        Ok(Outcome::quiet(progress, snapshot))
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Session, active term and account of an aggregate with a running session.
fn session_parts(
    progress: &mut UserProgress,
) -> ProgressResult<(&mut Session, &mut Term, &mut Account)> {
    let UserProgress {
        account,
        term,
        session,
    } = progress;
    match term.as_mut() {
        Some(term) => Ok((session, term, account)),
        None if session.state() == SessionState::Idle => Err(ProgressError::NotStarted),
        None => Err(ProgressError::NoActiveTerm),
    }
}

fn is_record_term(account: &Account, term: &Term) -> bool {
    account
        .record_term
        .as_ref()
        .map_or(true, |record| term.active_seconds > record.active_seconds)
}

fn signed(points: u64) -> i64 {
    i64::try_from(points).unwrap_or(i64::MAX)
}

/// Trims and checks a course before any aggregate is touched.
fn validate_course(name: &str, code: &str, credit_hours: u32) -> ProgressResult<(String, String)> {
    let name = name.trim();
    let code = code.trim();
    if name.is_empty() || code.is_empty() {
        return Err(ProgressError::InvalidInput(
            "course name and code are required".to_string(),
        ));
    }
    if name.chars().count() > MAX_COURSE_NAME_LEN {
        return Err(ProgressError::InvalidInput(format!(
            "course name is longer than {MAX_COURSE_NAME_LEN} characters"
        )));
    }
    if !CREDIT_HOURS_RANGE.contains(&credit_hours) {
        return Err(ProgressError::InvalidInput(format!(
            "credit hours must be between {} and {}",
            CREDIT_HOURS_RANGE.start(),
            CREDIT_HOURS_RANGE.end()
        )));
    }
    Ok((name.to_string(), code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_skip_empty_units() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(2 * 86_400 + 3 * 3600 + 45 * 60), "2d 3h 45m");
        assert_eq!(format_duration(12 * 60 + 5), "12m 5s");
    }

    #[test]
    fn course_validation_rejects_bad_input() {
        assert!(validate_course("Algebra", "MATH1", 3).is_ok());
        assert!(matches!(
            validate_course("  ", "MATH1", 3),
            Err(ProgressError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_course("Algebra", "MATH1", 0),
            Err(ProgressError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_course("Algebra", "MATH1", 13),
            Err(ProgressError::InvalidInput(_))
        ));
        let long = "x".repeat(MAX_COURSE_NAME_LEN + 1);
        assert!(matches!(
            validate_course(&long, "MATH1", 3),
            Err(ProgressError::InvalidInput(_))
        ));
        assert_eq!(
            validate_course(" Algebra ", " MATH1 ", 12).unwrap(),
            ("Algebra".to_string(), "MATH1".to_string())
        );
    }

    #[test]
    fn first_completed_term_is_always_a_record() {
        let account = Account::new("1");
        let mut term = Term::new("Fall");
        assert!(is_record_term(&account, &term));

        let mut account = account;
        term.active_seconds = 500;
        account.record_term = Some(term.clone());
        assert!(!is_record_term(&account, &term));
        term.active_seconds = 501;
        assert!(is_record_term(&account, &term));
    }

    #[test]
    fn recaps_render_human_text() {
        let recap = RegisterRecap {
            account_created: true,
            term_name: Some("Fall".to_string()),
        };
        assert_eq!(recap.to_string(), "Account created, term 'Fall' started.");

        let empty = GpaReport {
            summary: GpaSummary::default(),
            courses: Vec::new(),
        };
        assert_eq!(empty.to_string(), "No graded courses yet.");
    }
}
