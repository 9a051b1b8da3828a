//! crates/study_tracker_core/src/events.rs
//!
//! Domain events emitted by coordinator operations for the presentation
//! layer to render.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::level_curve::LevelProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Longest single session of the active term.
    Session,
    /// Highest total time of any completed term.
    Term,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    LevelUp {
        levels_gained: u32,
        new_level: u32,
        leftover_points: u64,
    },
    RankUp {
        levels_gained: u32,
        new_rank: u32,
        leftover_points: u64,
    },
    RecordBroken {
        kind: RecordKind,
        value_seconds: u64,
    },
}

impl ProgressEvent {
    /// `None` when the ladder did not move.
    pub fn level_up(progress: &LevelProgress) -> Option<Self> {
        (progress.levels_gained > 0).then(|| ProgressEvent::LevelUp {
            levels_gained: progress.levels_gained,
            new_level: progress.level,
            leftover_points: progress.leftover_points,
        })
    }

    /// `None` when the ladder did not move.
    pub fn rank_up(progress: &LevelProgress) -> Option<Self> {
        (progress.levels_gained > 0).then(|| ProgressEvent::RankUp {
            levels_gained: progress.levels_gained,
            new_rank: progress.level,
            leftover_points: progress.leftover_points,
        })
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::LevelUp {
                levels_gained,
                new_level,
                ..
            } => write!(f, "Level up! +{levels_gained} (now level {new_level})"),
            ProgressEvent::RankUp {
                levels_gained,
                new_rank,
                ..
            } => write!(f, "Rank up! +{levels_gained} (now rank {new_rank})"),
            ProgressEvent::RecordBroken {
                kind: RecordKind::Session,
                value_seconds,
            } => write!(
                f,
                "New longest session: {}",
                crate::coordinator::format_duration(*value_seconds)
            ),
            ProgressEvent::RecordBroken {
                kind: RecordKind::Term,
                value_seconds,
            } => write!(
                f,
                "New record term: {}",
                crate::coordinator::format_duration(*value_seconds)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_event_when_no_levels_were_gained() {
        let still = LevelProgress {
            level: 4,
            leftover_points: 80,
            levels_gained: 0,
            ceiling_reached: false,
        };
        assert_eq!(ProgressEvent::level_up(&still), None);
        assert_eq!(ProgressEvent::rank_up(&still), None);
    }

    #[test]
    fn level_up_carries_the_gain() {
        let moved = LevelProgress {
            level: 3,
            leftover_points: 20,
            levels_gained: 2,
            ceiling_reached: false,
        };
        assert_eq!(
            ProgressEvent::level_up(&moved),
            Some(ProgressEvent::LevelUp {
                levels_gained: 2,
                new_level: 3,
                leftover_points: 20,
            })
        );
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = ProgressEvent::RecordBroken {
            kind: RecordKind::Session,
            value_seconds: 3600,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "record_broken");
        assert_eq!(json["kind"], "Session");
        assert_eq!(event.to_string(), "New longest session: 1h");
    }
}
