//! crates/study_tracker_core/src/level_curve.rs
//!
//! Requirement curves for the two ladders (term xp and account rp), the
//! overflow-aware level application shared by both, and the conversion from
//! study time to points.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Highest position either ladder can reach.
pub const DEFAULT_LEVEL_CEILING: u32 = 5000;

/// Requirement lookups keyed by ladder position. Clone the `Arc` to share it
/// between curves built from the same parameters.
pub type RequirementCache = Arc<RwLock<HashMap<u32, u64>>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("curve base ({base}) must be greater than its offset ({offset})")]
    NonPositiveRequirement { base: u64, offset: u64 },
    #[error("level ceiling must be at least 1")]
    ZeroCeiling,
}

//=========================================================================================
// Curve parameters
//=========================================================================================

/// `requirement(n) = n * base + (n - 1) * step - offset` for `n >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    pub base: u64,
    pub step: u64,
    pub offset: u64,
}

impl CurveParams {
    /// 100, 700, 1300, ... xp per term level.
    pub const TERM_XP: CurveParams = CurveParams {
        base: 400,
        step: 200,
        offset: 300,
    };

    /// 300, 1500, 2700, ... rp per account rank.
    pub const ACCOUNT_RP: CurveParams = CurveParams {
        base: 800,
        step: 400,
        offset: 500,
    };

    /// `base > offset` keeps every requirement positive; with that, each
    /// position costs `base + step` more than the previous one.
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.base <= self.offset {
            return Err(CurveError::NonPositiveRequirement {
                base: self.base,
                offset: self.offset,
            });
        }
        Ok(())
    }

    fn evaluate(&self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        let n = u64::from(n);
        n.saturating_mul(self.base)
            .saturating_add((n - 1).saturating_mul(self.step))
            .saturating_sub(self.offset)
    }
}

//=========================================================================================
// LevelCurve
//=========================================================================================

/// Result of applying points to a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub leftover_points: u64,
    pub levels_gained: u32,
    /// The ladder stopped at its ceiling; leftover may exceed the next requirement.
    pub ceiling_reached: bool,
}

/// One ladder: a requirement curve, a ceiling and a memo of requirements.
#[derive(Debug, Clone)]
pub struct LevelCurve {
    params: CurveParams,
    ceiling: u32,
    cache: RequirementCache,
}

impl LevelCurve {
    pub fn new(params: CurveParams, ceiling: u32) -> Result<Self, CurveError> {
        Self::with_cache(params, ceiling, RequirementCache::default())
    }

    /// Builds a curve over an existing cache. The cache must only ever be
    /// shared between curves with identical parameters.
    pub fn with_cache(
        params: CurveParams,
        ceiling: u32,
        cache: RequirementCache,
    ) -> Result<Self, CurveError> {
        params.validate()?;
        if ceiling == 0 {
            return Err(CurveError::ZeroCeiling);
        }
        Ok(Self {
            params,
            ceiling,
            cache,
        })
    }

    pub fn params(&self) -> CurveParams {
        self.params
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn cache(&self) -> RequirementCache {
        Arc::clone(&self.cache)
    }

    /// Points needed to move from position `n - 1` to position `n`.
    pub fn requirement(&self, n: u32) -> u64 {
        if let Ok(cache) = self.cache.read() {
            if let Some(points) = cache.get(&n) {
                return *points;
            }
        }
        let points = self.params.evaluate(n);
        // A poisoned lock only costs us the memo, never the answer.
        if let Ok(mut cache) = self.cache.write() {
            cache.entry(n).or_insert(points);
        }
        points
    }

    /// Adds `earned` to `points` and consumes as many requirements as the
    /// total covers. Negative inputs count as zero. Works even when `points`
    /// already exceeds the next requirement on entry.
    pub fn apply(&self, level: u32, points: i64, earned: i64) -> LevelProgress {
        let start = level.min(self.ceiling);
        let mut level = start;
        let mut total = clamp_points(points).saturating_add(clamp_points(earned));

        while level < self.ceiling {
            let required = self.requirement(level + 1);
            if total < required {
                break;
            }
            total -= required;
            level += 1;
        }

        LevelProgress {
            level,
            leftover_points: total,
            levels_gained: level - start,
            ceiling_reached: level >= self.ceiling,
        }
    }

    /// Sum of `requirement(i)` for `i` in `1..=level`.
    pub fn total_points_through(&self, level: u32) -> u64 {
        (1..=level.min(self.ceiling))
            .map(|n| self.requirement(n))
            .fold(0u64, u64::saturating_add)
    }

    /// Percentage of the way from `level` to `level + 1`, rounded half-up and
    /// clamped to `0..=100`.
    pub fn progress_percent(&self, level: u32, points: u64) -> u8 {
        percentage(points, self.requirement(level.saturating_add(1)))
    }
}

fn clamp_points(points: i64) -> u64 {
    u64::try_from(points).unwrap_or(0)
}

/// Rounded half-up integer percentage, `0` when `required` is `0`.
pub fn percentage(value: u64, required: u64) -> u8 {
    if required == 0 {
        return 0;
    }
    let value = u128::from(value);
    let required = u128::from(required);
    let pct = (value * 200 + required) / (required * 2);
    pct.min(100) as u8
}

//=========================================================================================
// Ladders & points rate
//=========================================================================================

/// The two independent ladders of a user.
#[derive(Debug, Clone)]
pub struct Ladders {
    pub term: LevelCurve,
    pub account: LevelCurve,
}

impl Ladders {
    pub fn new(ceiling: u32) -> Result<Self, CurveError> {
        Ok(Self {
            term: LevelCurve::new(CurveParams::TERM_XP, ceiling)?,
            account: LevelCurve::new(CurveParams::ACCOUNT_RP, ceiling)?,
        })
    }
}

impl Default for Ladders {
    fn default() -> Self {
        let curve = |params| LevelCurve {
            params,
            ceiling: DEFAULT_LEVEL_CEILING,
            cache: RequirementCache::default(),
        };
        Self {
            term: curve(CurveParams::TERM_XP),
            account: curve(CurveParams::ACCOUNT_RP),
        }
    }
}

/// Converts study time into points: `points_per_block` for every full
/// `block_minutes` of net study time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRate {
    pub points_per_block: u64,
    pub block_minutes: u64,
}

impl Default for PointsRate {
    fn default() -> Self {
        Self {
            points_per_block: 180,
            block_minutes: 5,
        }
    }
}

impl PointsRate {
    /// Partial minutes and partial blocks earn nothing.
    pub fn points_for_seconds(&self, seconds: u64) -> u64 {
        if self.block_minutes == 0 {
            return 0;
        }
        let minutes = seconds / 60;
        (minutes / self.block_minutes).saturating_mul(self.points_per_block)
    }

    /// Study seconds needed to earn at least `points`.
    pub fn seconds_to_earn(&self, points: u64) -> u64 {
        if self.points_per_block == 0 {
            return 0;
        }
        let blocks = points.div_ceil(self.points_per_block);
        blocks.saturating_mul(self.block_minutes.saturating_mul(60))
    }
}
