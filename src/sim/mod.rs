//! Deterministic runner simulation
//!
//! All run logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use collision::{Category, CategoryMask, CollisionEffect, Contact, score_collision};
pub use difficulty::{DifficultyLabel, SpawnIntervals, multiplier, spawn_intervals};
pub use state::{Entity, Player, RunEvent, RunPhase, RunState, RunStats};
pub use tick::{PLAYER_ID, TickInput, autopilot, tick};
