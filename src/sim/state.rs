//! Run state and core simulation types
//!
//! Everything the runner needs between frames lives here: player body,
//! scrolling entities, counters and the queued events for the UI layer.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Category, CollisionEffect, Contact, score_collision};
use super::difficulty::{DifficultyLabel, spawn_intervals};
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Active gameplay
    Running,
    /// Simulation frozen, waiting for resume
    Paused,
    /// Health ran out
    GameOver,
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u32,
    pub distance: f64,
    pub obstacles_hit: u32,
    /// Seconds of simulated play
    pub duration: f64,
    /// Filled in by the recorder once the run has been scored by the predictor
    #[serde(default)]
    pub predicted_skill: Option<String>,
    #[serde(default)]
    pub predicted_next_distance: Option<f64>,
}

/// Something the UI layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    ScoreChanged(u32),
    HealthChanged(i32),
    BossSpawned,
    BossHit { remaining: u32 },
    BossDefeated,
    GameOver(RunStats),
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, PLAYER_REST_Y),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
        }
    }
}

impl Player {
    pub fn is_grounded(&self) -> bool {
        self.pos.y <= PLAYER_REST_Y && self.vel.y <= 0.0
    }

    /// Jump if standing on the ground; returns whether the jump happened
    pub fn jump(&mut self) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.vel.y = JUMP_VELOCITY;
        true
    }

    /// Integrate gravity and land on the ground
    pub fn integrate(&mut self, dt: f32) {
        self.vel.y -= GRAVITY * dt;
        self.pos += self.vel * dt;
        if self.pos.y <= PLAYER_REST_Y {
            self.pos.y = PLAYER_REST_Y;
            self.vel.y = 0.0;
        }
    }
}

/// A scrolling body (obstacle, enemy, boss, projectile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub category: Category,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds until the entity leaves the scene, `None` for stationary bodies
    pub ttl: Option<f32>,
}

impl Entity {
    pub fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        self.pos.distance_squared(pos) < (self.radius + radius).powi(2)
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: RunPhase,
    pub score: u32,
    pub health: i32,
    /// Cumulative distance; never decreases
    pub distance: f64,
    /// Seconds of unpaused play
    pub elapsed: f64,
    pub obstacles_hit: u32,
    pub player: Player,
    /// Active entities (sorted by id)
    pub entities: Vec<Entity>,
    pub boss_health: u32,
    pub boss_spawned: bool,
    pub obstacle_timer: f64,
    pub enemy_timer: f64,
    /// Contacts that were already reported (pairs of entity ids, player is 0)
    pub touching: BTreeSet<(u32, u32)>,
    events: Vec<RunEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl RunState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        let intervals = spawn_intervals(0.0);
        Self {
            seed,
            phase: RunPhase::Running,
            score: 0,
            health: STARTING_HEALTH,
            distance: 0.0,
            elapsed: 0.0,
            obstacles_hit: 0,
            player: Player::default(),
            entities: Vec::new(),
            boss_health: BOSS_HEALTH,
            boss_spawned: false,
            obstacle_timer: intervals.obstacle,
            enemy_timer: intervals.enemy,
            touching: BTreeSet::new(),
            events: vec![RunEvent::HealthChanged(STARTING_HEALTH)],
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (0 is reserved for the player)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    pub fn push_event(&mut self, event: RunEvent) {
        self.events.push(event);
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// HUD label for the distance covered so far
    pub fn difficulty_label(&self) -> DifficultyLabel {
        DifficultyLabel::for_distance(self.distance)
    }

    pub fn count(&self, category: Category) -> usize {
        self.entities
            .iter()
            .filter(|e| e.category == category)
            .count()
    }

    /// Snapshot of the run so far
    pub fn stats(&self) -> RunStats {
        RunStats {
            score: self.score,
            distance: self.distance,
            obstacles_hit: self.obstacles_hit,
            duration: self.elapsed,
            predicted_skill: None,
            predicted_next_distance: None,
        }
    }

    /// Apply the scoring rules for a contact between two categories
    ///
    /// Updates score, health and boss health, queues events and ends the run
    /// when health drops to zero. Entity removal is left to the caller, who
    /// knows which bodies were involved.
    pub fn apply_contact(&mut self, a: Category, b: Category) -> CollisionEffect {
        if self.is_over() {
            return CollisionEffect::NONE;
        }

        let effect = score_collision(a, b, self.boss_health);
        if effect.is_none() {
            return effect;
        }

        if Contact::classify(a, b) == Some(Contact::PlayerObstacle) {
            self.obstacles_hit += 1;
        }

        if effect.boss_health_delta != 0 {
            self.boss_health = self
                .boss_health
                .saturating_sub(effect.boss_health_delta.unsigned_abs());
            if self.boss_health == 0 {
                log::info!("Boss defeated at {:.0}m", self.distance);
                self.push_event(RunEvent::BossDefeated);
            } else {
                self.push_event(RunEvent::BossHit {
                    remaining: self.boss_health,
                });
            }
        }

        if effect.score_delta > 0 {
            self.score += effect.score_delta;
            self.push_event(RunEvent::ScoreChanged(self.score));
        }

        if effect.health_delta != 0 {
            self.health += effect.health_delta;
            self.push_event(RunEvent::HealthChanged(self.health));
            if self.health <= 0 {
                self.end_run();
            }
        }

        effect
    }

    fn end_run(&mut self) {
        self.phase = RunPhase::GameOver;
        let stats = self.stats();
        log::info!(
            "Run over: score={} distance={:.0}m hits={} time={:.1}s",
            stats.score,
            stats.distance,
            stats.obstacles_hit,
            stats.duration
        );
        self.push_event(RunEvent::GameOver(stats));
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_defaults() {
        let mut state = RunState::new(7);
        assert_eq!(state.phase, RunPhase::Running);
        assert_eq!(state.health, STARTING_HEALTH);
        assert_eq!(state.boss_health, BOSS_HEALTH);
        assert!((state.obstacle_timer - 1.5).abs() < 1e-12);
        assert!((state.enemy_timer - 3.0).abs() < 1e-12);
        assert_eq!(
            state.drain_events(),
            vec![RunEvent::HealthChanged(STARTING_HEALTH)]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_label_follows_distance() {
        let mut state = RunState::new(7);
        assert_eq!(state.difficulty_label(), DifficultyLabel::Easy);
        state.distance = 400.0;
        assert_eq!(state.difficulty_label(), DifficultyLabel::Medium);
        state.distance = 900.0;
        assert_eq!(state.difficulty_label(), DifficultyLabel::Hard);
    }

    #[test]
    fn test_player_hits_end_run() {
        let mut state = RunState::new(1);
        state.drain_events();

        state.apply_contact(Category::Player, Category::Obstacle);
        assert_eq!(state.health, 2);
        assert_eq!(state.obstacles_hit, 1);

        state.apply_contact(Category::Enemy, Category::Player);
        assert_eq!(state.health, 1);
        assert_eq!(state.obstacles_hit, 1);
        assert!(!state.is_over());

        state.apply_contact(Category::Player, Category::Boss);
        assert_eq!(state.health, -1);
        assert!(state.is_over());

        let events = state.drain_events();
        assert!(matches!(
            events.last(),
            Some(RunEvent::GameOver(RunStats {
                obstacles_hit: 1,
                ..
            }))
        ));

        // Frozen after game over
        let effect = state.apply_contact(Category::Player, Category::Obstacle);
        assert!(effect.is_none());
        assert_eq!(state.health, -1);
    }

    #[test]
    fn test_boss_fight_scoring() {
        let mut state = RunState::new(1);
        state.drain_events();

        for _ in 0..9 {
            let effect = state.apply_contact(Category::Projectile, Category::Boss);
            assert!(effect.removed.contains(Category::Projectile));
            assert!(!effect.removed.contains(Category::Boss));
        }
        assert_eq!(state.boss_health, 1);
        assert_eq!(state.score, 0);

        let effect = state.apply_contact(Category::Projectile, Category::Boss);
        assert!(effect.removed.contains(Category::Boss));
        assert_eq!(state.boss_health, 0);
        assert_eq!(state.score, 10);

        let events = state.drain_events();
        assert_eq!(events.len(), 9 + 2);
        assert_eq!(events[8], RunEvent::BossHit { remaining: 1 });
        assert_eq!(events[9], RunEvent::BossDefeated);
        assert_eq!(events[10], RunEvent::ScoreChanged(10));
    }

    #[test]
    fn test_projectile_scores() {
        let mut state = RunState::new(1);
        state.apply_contact(Category::Projectile, Category::Obstacle);
        state.apply_contact(Category::Projectile, Category::Enemy);
        assert_eq!(state.score, 3);
        assert_eq!(state.health, STARTING_HEALTH);
        assert_eq!(state.obstacles_hit, 0);
    }

    #[test]
    fn test_player_jump_and_land() {
        let mut player = Player::default();
        assert!(player.is_grounded());
        assert!(player.jump());
        assert!(!player.jump(), "no double jump");

        player.integrate(0.1);
        assert!(player.pos.y > PLAYER_REST_Y);

        for _ in 0..200 {
            player.integrate(0.01);
        }
        assert_eq!(player.pos.y, PLAYER_REST_Y);
        assert!(player.is_grounded());
    }
}
