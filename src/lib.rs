//! Runcook - rule engines for an endless runner and a cook-along companion
//!
//! Core modules:
//! - `sim`: Deterministic runner simulation (difficulty, collision scoring, run state)
//! - `runs`: Run history and the recorder that attaches skill predictions
//! - `predictor`: Skill model seam
//! - `cook`: Recipe catalog, guided sessions, XP/rank/achievement progression
//! - `settings`: Persisted user preferences
//! - `speech`: Narration seam
//! - `persistence`: Key/value storage backends
//! - `platform`: Browser/native platform abstraction

pub mod cook;
pub mod persistence;
pub mod platform;
pub mod predictor;
pub mod runs;
pub mod settings;
pub mod sim;
pub mod speech;

pub use cook::{Catalog, Progression, ProgressionState};
pub use runs::{RunRecorder, StoredRuns};
pub use settings::{Preferences, Settings, Theme};

/// Runner configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Scene dimensions (y up, ground at the bottom)
    pub const SCENE_WIDTH: f32 = 1280.0;
    pub const SCENE_HEIGHT: f32 = 720.0;
    pub const GROUND_HEIGHT: f32 = 90.0;

    /// Distance gained per second (meters)
    pub const RUN_SPEED: f64 = 200.0;

    /// Player body
    pub const PLAYER_X: f32 = SCENE_WIDTH * 0.3;
    pub const PLAYER_RADIUS: f32 = 60.0;
    pub const PLAYER_REST_Y: f32 = GROUND_HEIGHT + PLAYER_RADIUS;
    pub const JUMP_VELOCITY: f32 = 700.0;
    pub const GRAVITY: f32 = 1470.0;
    pub const STARTING_HEALTH: i32 = 3;

    /// Boss appears once, after this distance
    pub const BOSS_SPAWN_DISTANCE: f64 = 900.0;
    pub const BOSS_HEALTH: u32 = 10;
    pub const BOSS_RADIUS: f32 = 100.0;

    pub const OBSTACLE_RADIUS: f32 = 40.0;
    /// Seconds to cross the scene
    pub const OBSTACLE_TRAVEL_SECS: f32 = 2.8;

    pub const ENEMY_RADIUS: f32 = 45.0;
    pub const ENEMY_TRAVEL_SECS: f32 = 3.0;
    /// Enemy flight height above the ground
    pub const ENEMY_MIN_HEIGHT: f32 = 100.0;
    pub const ENEMY_MAX_HEIGHT: f32 = 240.0;

    pub const PROJECTILE_RADIUS: f32 = 10.0;
    pub const PROJECTILE_TRAVEL_SECS: f32 = 1.0;

    /// Autopilot jumps when a threat is this close
    pub const AUTOPILOT_JUMP_RANGE: f32 = 160.0;
}
