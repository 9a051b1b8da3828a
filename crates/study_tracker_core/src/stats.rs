//! crates/study_tracker_core/src/stats.rs
//!
//! Read-only display metrics derived from one aggregate. Every ratio with a
//! zero denominator is reported as zero.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::coordinator::{format_duration, ProgressionSettings};
use crate::domain::{Term, TermCourse, UserProgress};
use crate::grade_book::{compute_course_gpa, Grade, GpaSummary, ALL_GRADES};
use crate::level_curve::{LevelCurve, PointsRate};

/// Position on one ladder and the distance to the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderStats {
    pub level: u32,
    pub points: u64,
    pub next_requirement: u64,
    pub percent: u8,
    pub seconds_to_next: u64,
    pub ceiling_reached: bool,
}

impl LadderStats {
    fn compute(curve: &LevelCurve, rate: &PointsRate, level: u32, points: u64) -> Self {
        if level >= curve.ceiling() {
            return Self {
                level,
                points,
                next_requirement: 0,
                percent: 100,
                seconds_to_next: 0,
                ceiling_reached: true,
            };
        }
        let next_requirement = curve.requirement(level + 1);
        Self {
            level,
            points,
            next_requirement,
            percent: curve.progress_percent(level, points),
            seconds_to_next: rate.seconds_to_earn(next_requirement.saturating_sub(points)),
            ceiling_reached: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTermStats {
    pub name: String,
    pub total_seconds: u64,
    pub session_count: usize,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub lifetime_seconds: u64,
    pub term_name: Option<String>,
    pub term_seconds: u64,
    pub session_count: usize,
    pub average_session_seconds: u64,
    pub longest_session_seconds: u64,
    pub break_seconds: u64,
    pub break_count: u32,
    pub average_break_seconds: u64,
    pub average_time_between_breaks_seconds: u64,
    pub course_count: usize,
    pub total_times_studied: u64,
    pub average_seconds_per_study: u64,
    /// Mean session start, as unix seconds.
    pub average_session_start: Option<i64>,
    pub streak: u32,
    pub longest_streak: u32,
    pub streak_alive: bool,
    pub term_ladder: Option<LadderStats>,
    pub account_ladder: LadderStats,
    pub record_term: Option<RecordTermStats>,
    pub gpa: GpaSummary,
    courses: Vec<TermCourse>,
    grades: Vec<Grade>,
}

impl StatsSnapshot {
    pub fn from_progress(
        progress: &UserProgress,
        settings: &ProgressionSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let account = &progress.account;
        let term = progress.term.as_ref();
        let ProgressionSettings {
            ladders,
            rate,
            streak,
        } = settings;

        let term_seconds = term.map_or(0, |t| t.active_seconds);
        let session_count = term.map_or(0, |t| t.session_starts.len());
        let break_seconds = term.map_or(0, |t| t.break_seconds);
        let break_count = term.map_or(0, |t| t.break_count);
        let courses = term.map(|t| t.courses.clone()).unwrap_or_default();
        let total_times_studied: u64 = courses.iter().map(|c| u64::from(c.times_studied)).sum();

        let average_time_between_breaks_seconds = if break_count == 0 {
            term_seconds
        } else {
            term_seconds / (u64::from(break_count) + 1)
        };

        Self {
            lifetime_seconds: account.lifetime_seconds,
            term_name: term.map(|t| t.name.clone()),
            term_seconds,
            session_count,
            average_session_seconds: ratio(term_seconds, session_count as u64),
            longest_session_seconds: term.map_or(0, |t| t.longest_session_seconds),
            break_seconds,
            break_count,
            average_break_seconds: ratio(break_seconds, u64::from(break_count)),
            average_time_between_breaks_seconds,
            course_count: courses.len(),
            total_times_studied,
            average_seconds_per_study: ratio(term_seconds, total_times_studied),
            average_session_start: term.and_then(average_start),
            streak: term.map_or(0, |t| t.streak),
            longest_streak: term.map_or(0, |t| t.longest_streak),
            streak_alive: term.is_some_and(|t| streak.is_current(t.last_streak_update, now)),
            term_ladder: term.map(|t| LadderStats::compute(&ladders.term, rate, t.level, t.xp)),
            account_ladder: LadderStats::compute(&ladders.account, rate, account.rank, account.rp),
            record_term: account.record_term.as_ref().map(|t| RecordTermStats {
                name: t.name.clone(),
                total_seconds: t.active_seconds,
                session_count: t.session_starts.len(),
                level: t.level,
            }),
            gpa: compute_course_gpa(&account.courses),
            courses,
            grades: account.courses.iter().map(|c| c.grade).collect(),
        }
    }

    /// The `n` most studied term courses, most studied first. Ties keep
    /// registration order.
    pub fn top_courses(&self, n: usize) -> Vec<&TermCourse> {
        let mut ranked: Vec<&TermCourse> = self.courses.iter().collect();
        ranked.sort_by(|a, b| b.times_studied.cmp(&a.times_studied));
        ranked.truncate(n);
        ranked
    }

    /// Number of account courses per grade, in grade order, omitting grades
    /// nobody holds.
    pub fn grade_distribution(&self) -> Vec<(Grade, usize)> {
        ALL_GRADES
            .iter()
            .map(|grade| (*grade, self.grades.iter().filter(|g| *g == grade).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// How many of `segments` cells a progress bar at `percent` fills.
pub fn filled_segments(percent: u8, segments: usize) -> usize {
    let percent = usize::from(percent.min(100));
    (percent * segments + 50) / 100
}

fn ratio(total: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        total / count
    }
}

fn average_start(term: &Term) -> Option<i64> {
    if term.session_starts.is_empty() {
        return None;
    }
    let sum: i128 = term
        .session_starts
        .iter()
        .map(|at| i128::from(at.timestamp()))
        .sum();
    i64::try_from(sum / term.session_starts.len() as i128).ok()
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "• Lifetime Study Time: {}",
            format_duration(self.lifetime_seconds)
        )?;
        writeln!(
            f,
            "• Rank {} ({}/{} RP, {}%)",
            self.account_ladder.level,
            self.account_ladder.points,
            self.account_ladder.next_requirement,
            self.account_ladder.percent
        )?;

        match (&self.term_name, &self.term_ladder) {
            (Some(name), Some(ladder)) => {
                writeln!(f, "• Term: {name}")?;
                writeln!(
                    f,
                    "• Level {} ({}/{} XP, {}%)",
                    ladder.level, ladder.points, ladder.next_requirement, ladder.percent
                )?;
                writeln!(f, "• Term Study Time: {}", format_duration(self.term_seconds))?;
                writeln!(f, "• Sessions: {}", self.session_count)?;
                writeln!(
                    f,
                    "• Average Session: {}",
                    format_duration(self.average_session_seconds)
                )?;
                writeln!(
                    f,
                    "• Longest Session: {}",
                    format_duration(self.longest_session_seconds)
                )?;
                writeln!(
                    f,
                    "• Breaks: {} ({})",
                    self.break_count,
                    format_duration(self.break_seconds)
                )?;
                let alive = if self.streak_alive { "" } else { " (broken)" };
                writeln!(
                    f,
                    "• Streak: {}{alive}, best {}",
                    self.streak, self.longest_streak
                )?;
            }
            _ => writeln!(f, "• No active term")?,
        }

        if let Some(record) = &self.record_term {
            writeln!(
                f,
                "• Record Term: {} ({})",
                record.name,
                format_duration(record.total_seconds)
            )?;
        }

        if self.gpa.has_gpa() {
            write!(
                f,
                "• GPA: {} over {} credit hours",
                self.gpa.gpa, self.gpa.total_credit_hours
            )
        } else {
            write!(f, "• GPA: n/a")
        }
    }
}
