//! crates/study_tracker_core/src/grade_book.rs
//!
//! Letter grades and weighted GPA. All arithmetic is fixed-point: grade
//! points and quality points are held in tenths, the GPA in thousandths, so
//! repeated recomputation never drifts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::AccountCourse;

//=========================================================================================
// Grade
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    F,
    /// Withdrawal; never counts toward the GPA.
    W,
    /// Pass; never counts toward the GPA.
    P,
}

/// Highest grade first; `W` and `P` sort last.
pub const ALL_GRADES: [Grade; 14] = [
    Grade::APlus,
    Grade::A,
    Grade::AMinus,
    Grade::BPlus,
    Grade::B,
    Grade::BMinus,
    Grade::CPlus,
    Grade::C,
    Grade::CMinus,
    Grade::DPlus,
    Grade::D,
    Grade::F,
    Grade::W,
    Grade::P,
];

impl Grade {
    /// Grade points in tenths (`A- => 37`).
    pub fn points_tenths(self) -> u64 {
        match self {
            Grade::APlus | Grade::A => 40,
            Grade::AMinus => 37,
            Grade::BPlus => 33,
            Grade::B => 30,
            Grade::BMinus => 27,
            Grade::CPlus => 23,
            Grade::C => 20,
            Grade::CMinus => 17,
            Grade::DPlus => 13,
            Grade::D => 10,
            Grade::F | Grade::W | Grade::P => 0,
        }
    }

    pub fn counts_toward_gpa(self) -> bool {
        !matches!(self, Grade::W | Grade::P)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::F => "F",
            Grade::W => "W",
            Grade::P => "P",
        }
    }

    pub fn classification(self) -> &'static str {
        match self {
            Grade::APlus | Grade::A | Grade::AMinus => "Excellent",
            Grade::BPlus | Grade::B | Grade::BMinus => "Good",
            Grade::CPlus | Grade::C | Grade::CMinus => "Satisfactory",
            Grade::DPlus | Grade::D => "Below Average",
            Grade::F => "Failing",
            Grade::W => "Withdrawn",
            Grade::P => "Pass",
        }
    }

    /// Position in [`ALL_GRADES`]; lower is better.
    pub fn order(self) -> usize {
        ALL_GRADES.iter().position(|g| *g == self).unwrap_or(ALL_GRADES.len())
    }

    /// Lenient parse for batch conversions: unknown input is `None`.
    pub fn parse(input: &str) -> Option<Grade> {
        input.parse().ok()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a recognized grade")]
pub struct GradeParseError(pub String);

impl FromStr for Grade {
    type Err = GradeParseError;

    /// Accepts symbols (`a+`, `B-`) and spelled-out forms (`A_PLUS`,
    /// `b minus`, `Withdrawn`, `pass`), case-insensitively.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_uppercase();

        let grade = match normalized.as_str() {
            "A+" | "APLUS" => Grade::APlus,
            "A" => Grade::A,
            "A-" | "AMINUS" => Grade::AMinus,
            "B+" | "BPLUS" => Grade::BPlus,
            "B" => Grade::B,
            "B-" | "BMINUS" => Grade::BMinus,
            "C+" | "CPLUS" => Grade::CPlus,
            "C" => Grade::C,
            "C-" | "CMINUS" => Grade::CMinus,
            "D+" | "DPLUS" => Grade::DPlus,
            "D" => Grade::D,
            "F" | "FAIL" => Grade::F,
            "W" | "WITHDRAW" | "WITHDRAWN" | "WITHDRAWAL" => Grade::W,
            "P" | "PASS" | "PASSED" => Grade::P,
            _ => return Err(GradeParseError(input.to_string())),
        };
        Ok(grade)
    }
}

//=========================================================================================
// Fixed-point results
//=========================================================================================

/// A GPA in thousandths (`3500` is `3.500`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gpa(pub u32);

impl Gpa {
    pub fn thousandths(self) -> u32 {
        self.0
    }

    /// For charts only; never feed this back into GPA arithmetic.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

/// Quality points in tenths (`105` is `10.5`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualityPoints(pub u64);

impl fmt::Display for QualityPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpaSummary {
    pub gpa: Gpa,
    pub total_credit_hours: u32,
    pub quality_points: QualityPoints,
}

impl GpaSummary {
    pub fn has_gpa(&self) -> bool {
        self.total_credit_hours > 0
    }
}

//=========================================================================================
// GPA computation
//=========================================================================================

/// Weighted GPA over `(grade, credit_hours)` pairs. Non-GPA grades and
/// zero-credit entries are skipped. The quotient is rounded half-up to three
/// decimals; no countable credit hours gives a GPA of zero.
pub fn compute_gpa<I>(entries: I) -> GpaSummary
where
    I: IntoIterator<Item = (Grade, u32)>,
{
    // Hours are unbounded here; accumulate wide and saturate.
    let mut quality_tenths: u128 = 0;
    let mut total_hours: u128 = 0;

    for (grade, hours) in entries {
        if !grade.counts_toward_gpa() || hours == 0 {
            continue;
        }
        let hours = u128::from(hours);
        quality_tenths = quality_tenths.saturating_add(u128::from(grade.points_tenths()) * hours);
        total_hours = total_hours.saturating_add(hours);
    }

    let gpa = if total_hours == 0 {
        Gpa::default()
    } else {
        // tenths / hours, scaled to thousandths: * 100. Half-up via 2x.
        let thousandths = quality_tenths.saturating_mul(200).saturating_add(total_hours) / (total_hours * 2);
        Gpa(u32::try_from(thousandths).unwrap_or(u32::MAX))
    };

    let total_hours = u32::try_from(total_hours).unwrap_or(u32::MAX);
    let quality_tenths = u64::try_from(quality_tenths).unwrap_or(u64::MAX);

    GpaSummary {
        gpa,
        total_credit_hours: total_hours,
        quality_points: QualityPoints(quality_tenths),
    }
}

pub fn compute_course_gpa(courses: &[AccountCourse]) -> GpaSummary {
    compute_gpa(courses.iter().map(|c| (c.grade, c.credit_hours)))
}

/// Batch conversion from raw grade strings; unparseable entries are dropped
/// instead of failing the whole batch.
pub fn compute_gpa_from_raw<S: AsRef<str>>(entries: &[(S, u32)]) -> GpaSummary {
    compute_gpa(
        entries
            .iter()
            .filter_map(|(raw, hours)| Grade::parse(raw.as_ref()).map(|g| (g, *hours))),
    )
}
