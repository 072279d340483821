//! Distance-driven difficulty scaling
//!
//! The further the runner gets, the faster things spawn. The multiplier grows
//! linearly with distance and is capped; each spawn interval is the base
//! interval divided by the multiplier, clamped at a per-kind floor.

use serde::{Deserialize, Serialize};

/// Distance over which the multiplier gains +1.0
pub const DISTANCE_PER_STEP: f64 = 500.0;
/// Multiplier cap
pub const MAX_MULTIPLIER: f64 = 3.0;

/// Base spawn intervals in seconds (at multiplier 1.0)
pub const OBSTACLE_BASE_INTERVAL: f64 = 1.5;
pub const COIN_BASE_INTERVAL: f64 = 1.2;
pub const ENEMY_BASE_INTERVAL: f64 = 3.0;

/// Interval floors in seconds
pub const OBSTACLE_MIN_INTERVAL: f64 = 0.4;
pub const COIN_MIN_INTERVAL: f64 = 0.4;
pub const ENEMY_MIN_INTERVAL: f64 = 1.3;

/// Spawn intervals (seconds) for each spawnable kind at a given distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnIntervals {
    pub obstacle: f64,
    pub coin: f64,
    pub enemy: f64,
}

/// Difficulty multiplier: `min(1 + d/500, 3.0)`
#[inline]
pub fn multiplier(distance: f64) -> f64 {
    (1.0 + distance / DISTANCE_PER_STEP).min(MAX_MULTIPLIER)
}

/// Spawn intervals for the given cumulative distance (`distance >= 0`)
pub fn spawn_intervals(distance: f64) -> SpawnIntervals {
    let m = multiplier(distance);
    SpawnIntervals {
        obstacle: (OBSTACLE_BASE_INTERVAL / m).max(OBSTACLE_MIN_INTERVAL),
        coin: (COIN_BASE_INTERVAL / m).max(COIN_MIN_INTERVAL),
        enemy: (ENEMY_BASE_INTERVAL / m).max(ENEMY_MIN_INTERVAL),
    }
}

/// HUD difficulty label, stepped on distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyLabel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLabel {
    /// Below 400m is easy, below 900m medium, hard from there on
    pub fn for_distance(distance: f64) -> Self {
        if distance < 400.0 {
            DifficultyLabel::Easy
        } else if distance < 900.0 {
            DifficultyLabel::Medium
        } else {
            DifficultyLabel::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLabel::Easy => "Easy",
            DifficultyLabel::Medium => "Medium",
            DifficultyLabel::Hard => "Hard",
        }
    }
}
