pub mod coordinator;
pub mod domain;
pub mod error;
pub mod events;
pub mod grade_book;
pub mod level_curve;
pub mod ports;
pub mod session_clock;
pub mod stats;
pub mod streak;

pub use coordinator::{Outcome, ProgressionCoordinator, ProgressionSettings};
pub use domain::{Account, AccountCourse, Break, Session, Term, TermCourse, UserId, UserProgress};
pub use error::{ProgressError, ProgressResult};
pub use events::{ProgressEvent, RecordKind};
pub use grade_book::{compute_gpa, Gpa, GpaSummary, Grade};
pub use level_curve::{CurveParams, Ladders, LevelCurve, LevelProgress, PointsRate};
pub use ports::{Clock, PortError, PortResult, ProgressStore, SystemClock};
pub use session_clock::{SessionSnapshot, SessionState, SessionSummary};
pub use stats::StatsSnapshot;
pub use streak::StreakTracker;
