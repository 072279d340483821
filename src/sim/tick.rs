//! Fixed timestep simulation tick
//!
//! Core run loop: advance distance, spawn on the difficulty schedule, move
//! bodies, then score any new contacts.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;

use super::collision::Category;
use super::difficulty::spawn_intervals;
use super::state::{Entity, RunEvent, RunPhase, RunState};
use crate::consts::*;

/// Entity id used for the player in contact pairs
pub const PLAYER_ID: u32 = 0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (ignored while airborne)
    pub jump: bool,
    /// Fire a projectile
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            RunPhase::Running => {
                state.phase = RunPhase::Paused;
                return;
            }
            RunPhase::Paused => state.phase = RunPhase::Running,
            RunPhase::GameOver => {}
        }
    }

    if state.phase != RunPhase::Running {
        return;
    }

    let step = f64::from(dt);
    state.elapsed += step;
    state.distance += RUN_SPEED * step;

    if input.jump {
        state.player.jump();
    }
    if input.fire {
        spawn_projectile(state);
    }
    state.player.integrate(dt);

    // Spawn on the difficulty schedule
    state.obstacle_timer -= step;
    state.enemy_timer -= step;
    if state.obstacle_timer <= 0.0 {
        spawn_obstacle(state);
        state.obstacle_timer = spawn_intervals(state.distance).obstacle;
    }
    if state.enemy_timer <= 0.0 {
        spawn_enemy(state);
        state.enemy_timer = spawn_intervals(state.distance).enemy;
    }
    if !state.boss_spawned && state.distance > BOSS_SPAWN_DISTANCE {
        state.boss_spawned = true;
        spawn_boss(state);
    }

    // Move and expire
    for entity in &mut state.entities {
        entity.pos += entity.vel * dt;
        if let Some(ttl) = entity.ttl.as_mut() {
            *ttl -= dt;
        }
    }
    state.entities.retain(|e| e.ttl.is_none_or(|t| t > 0.0));

    resolve_contacts(state);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Score contacts that started this tick
///
/// A pair is reported once when it starts touching; it must separate before
/// it can be reported again.
fn resolve_contacts(state: &mut RunState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    let mut contacts: Vec<(u32, u32, Category, Category)> = Vec::new();
    for entity in &state.entities {
        if entity.category != Category::Projectile && entity.overlaps(player_pos, player_radius) {
            contacts.push((PLAYER_ID, entity.id, Category::Player, entity.category));
        }
    }
    for shot in state
        .entities
        .iter()
        .filter(|e| e.category == Category::Projectile)
    {
        for other in state
            .entities
            .iter()
            .filter(|e| e.category != Category::Projectile)
        {
            if shot.overlaps(other.pos, other.radius) {
                contacts.push((shot.id, other.id, Category::Projectile, other.category));
            }
        }
    }

    let touching_now: BTreeSet<(u32, u32)> = contacts.iter().map(|c| (c.0, c.1)).collect();
    let mut removed: BTreeSet<u32> = BTreeSet::new();

    for (a_id, b_id, a_cat, b_cat) in contacts {
        if state.is_over() {
            break;
        }
        if removed.contains(&a_id) || removed.contains(&b_id) {
            continue;
        }
        if state.touching.contains(&(a_id, b_id)) {
            continue;
        }

        let effect = state.apply_contact(a_cat, b_cat);
        if effect.removed.contains(a_cat) && a_id != PLAYER_ID {
            removed.insert(a_id);
        }
        if effect.removed.contains(b_cat) {
            removed.insert(b_id);
        }
    }

    state.touching = touching_now;
    if !removed.is_empty() {
        log::debug!("Removing {} entities", removed.len());
        state.entities.retain(|e| !removed.contains(&e.id));
    }
}

fn spawn_obstacle(state: &mut RunState) {
    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        category: Category::Obstacle,
        pos: Vec2::new(SCENE_WIDTH + 100.0, GROUND_HEIGHT + 80.0),
        vel: Vec2::new(-(SCENE_WIDTH + 300.0) / OBSTACLE_TRAVEL_SECS, 0.0),
        radius: OBSTACLE_RADIUS,
        ttl: Some(OBSTACLE_TRAVEL_SECS),
    });
}

fn spawn_enemy(state: &mut RunState) {
    let id = state.next_entity_id();
    let height = state
        .rng()
        .random_range(ENEMY_MIN_HEIGHT..=ENEMY_MAX_HEIGHT);
    state.entities.push(Entity {
        id,
        category: Category::Enemy,
        pos: Vec2::new(SCENE_WIDTH + 120.0, GROUND_HEIGHT + height),
        vel: Vec2::new(-(SCENE_WIDTH + 320.0) / ENEMY_TRAVEL_SECS, 0.0),
        radius: ENEMY_RADIUS,
        ttl: Some(ENEMY_TRAVEL_SECS),
    });
}

fn spawn_boss(state: &mut RunState) {
    let id = state.next_entity_id();
    state.entities.push(Entity {
        id,
        category: Category::Boss,
        pos: Vec2::new(SCENE_WIDTH + 250.0, GROUND_HEIGHT + 150.0),
        vel: Vec2::ZERO,
        radius: BOSS_RADIUS,
        ttl: None,
    });
    log::info!("Boss spawned at {:.0}m", state.distance);
    state.push_event(RunEvent::BossSpawned);
}

fn spawn_projectile(state: &mut RunState) {
    let id = state.next_entity_id();
    let origin = state.player.pos + Vec2::new(60.0, 0.0);
    state.entities.push(Entity {
        id,
        category: Category::Projectile,
        pos: origin,
        vel: Vec2::new((SCENE_WIDTH + 300.0) / PROJECTILE_TRAVEL_SECS, 0.0),
        radius: PROJECTILE_RADIUS,
        ttl: Some(PROJECTILE_TRAVEL_SECS),
    });
}

/// Simple demo pilot: jump over low threats, keep one shot in the air
pub fn autopilot(state: &RunState) -> TickInput {
    let player = &state.player;

    let threat_ahead = state.entities.iter().any(|e| {
        matches!(e.category, Category::Obstacle | Category::Enemy)
            && e.pos.x > player.pos.x
            && e.pos.x - player.pos.x < AUTOPILOT_JUMP_RANGE
            && e.pos.y < player.pos.y + player.radius + e.radius
    });
    let target_ahead = state.entities.iter().any(|e| {
        matches!(
            e.category,
            Category::Obstacle | Category::Enemy | Category::Boss
        ) && e.pos.x > player.pos.x
    });
    let shot_in_flight = state.count(Category::Projectile) > 0;

    TickInput {
        jump: threat_ahead && player.is_grounded(),
        fire: target_ahead && !shot_in_flight,
        pause: false,
    }
}
