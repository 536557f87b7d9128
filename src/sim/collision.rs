//! Collision detection and response
//!
//! Everything is an axis-aligned box. Touching edges do not count as a hit.
//! `resolve` runs once per frame after all entities have moved and applies
//! the pair categories in a fixed order.

use glam::Vec2;

use super::entities::explode;
use super::state::{BOSS_HIT_POINTS, GameEvent, GameState, METEOR_POINTS, POWER_UP_PICKUP_POINTS};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Anything with a hitbox
pub trait Bounds {
    fn bounds(&self) -> Aabb;
}

pub fn overlaps(a: &impl Bounds, b: &impl Bounds) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Run every collision category for this frame
pub(crate) fn resolve(state: &mut GameState) {
    bullets_vs_invaders(state);
    invader_bullets_vs_player(state);
    if state.is_over() {
        return;
    }
    player_vs_power_ups(state);
    bullets_vs_meteors(state);
    player_vs_meteors(state);
    if state.is_over() {
        return;
    }
    bullets_vs_boss(state);
    if state.boss.as_ref().is_some_and(|b| b.is_defeated()) {
        state.defeat_boss();
    }
    boss_bullets_vs_player(state);
}

/// Each bullet takes out at most one invader
fn bullets_vs_invaders(state: &mut GameState) {
    let damage = state.upgrades.damage as u64;
    for i in (0..state.bullets.len()).rev() {
        let bullet = &state.bullets[i];
        let Some(j) = state.invaders.iter().rposition(|inv| overlaps(bullet, inv)) else {
            continue;
        };
        state.bullets.remove(i);
        let invader = state.invaders.remove(j);

        state.explode_at(invader.bounds().center());
        state.score += state.combo.scale(invader.kind.base_points() * damage);
        state.combo.add();
        state.events.push(GameEvent::EnemyHit);
    }
}

fn invader_bullets_vs_player(state: &mut GameState) {
    let player = state.player.bounds();
    let before = state.enemy_bullets.len();
    state
        .enemy_bullets
        .retain(|b| !b.bounds().overlaps(&player));
    for _ in state.enemy_bullets.len()..before {
        state.damage_player(false);
    }
}

fn player_vs_power_ups(state: &mut GameState) {
    for i in (0..state.power_ups.len()).rev() {
        if !overlaps(&state.player, &state.power_ups[i]) {
            continue;
        }
        let power_up = state.power_ups.remove(i);
        state.player.apply_power_up(power_up.kind);
        state.score += POWER_UP_PICKUP_POINTS;
        state.events.push(GameEvent::PowerUpCollected(power_up.kind));
        log::debug!("Collected {:?}", power_up.kind);
    }
}

/// Each bullet chips one meteor; destroyed meteors pay out and count
fn bullets_vs_meteors(state: &mut GameState) {
    for i in (0..state.bullets.len()).rev() {
        let bullet = &state.bullets[i];
        let Some(j) = state.meteors.iter().rposition(|m| overlaps(bullet, m)) else {
            continue;
        };
        state.bullets.remove(i);
        state.meteors[j].hit();
        state.events.push(GameEvent::EnemyHit);

        if state.meteors[j].is_destroyed() {
            let meteor = state.meteors.remove(j);
            state.explode_at(meteor.bounds().center());
            state.score += state.combo.scale(METEOR_POINTS);
            state.combo.add();
            state.meteors_destroyed += 1;
            state.events.push(GameEvent::MeteorDestroyed);
        }
    }
}

fn player_vs_meteors(state: &mut GameState) {
    for i in (0..state.meteors.len()).rev() {
        if !overlaps(&state.player, &state.meteors[i]) {
            continue;
        }
        state.meteors.remove(i);
        state.damage_player(true);
    }
}

/// Every overlapping bullet registers, no per-frame cap
fn bullets_vs_boss(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let damage = state.upgrades.damage;
    let target = boss.bounds();
    for i in (0..state.bullets.len()).rev() {
        if !state.bullets[i].bounds().overlaps(&target) {
            continue;
        }
        let bullet = state.bullets.remove(i);
        boss.hit(damage);
        explode(&mut state.particles, &mut state.rng, bullet.pos);
        state.score += state.combo.scale(BOSS_HIT_POINTS);
        state.combo.add();
        state.events.push(GameEvent::EnemyHit);
    }
}

fn boss_bullets_vs_player(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let player = state.player.bounds();
    let before = boss.bullets.len();
    boss.bullets.retain(|b| !b.bounds().overlaps(&player));
    let hits = before - boss.bullets.len();
    for _ in 0..hits {
        state.damage_player(true);
    }
}
