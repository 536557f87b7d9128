//! Boss enemy
//!
//! Appears after the wave is cleared on every third level. Cycles through
//! three movement patterns and fires bursts that get denser and faster
//! with level. The boss owns its bullets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounds};
use super::entities::{Bullet, BulletOwner};
use super::sprite::{Sprite, SpriteKind};

pub const BOSS_SIZE: Vec2 = Vec2::new(120.0, 80.0);
pub const BOSS_SPAWN_Y: f32 = 50.0;
pub const BOSS_SPEED: f32 = 1.0;
/// Frames before switching to the next movement pattern
pub const PATTERN_FRAMES: u32 = 180;
/// Shoot interval at level 0, shrinks by `SHOOT_INTERVAL_STEP` per level
pub const BASE_SHOOT_INTERVAL: u32 = 60;
pub const SHOOT_INTERVAL_STEP: u32 = 5;
/// Shoot interval never drops below this
pub const MIN_SHOOT_INTERVAL: u32 = 10;
/// Level from which bursts include the two spread shots
pub const SPREAD_SHOT_LEVEL: u32 = 6;

const MAIN_SHOT_SPEED: f32 = 4.0;
const SPREAD_SHOT_SPEED: f32 = 3.0;
const MAIN_SHOT_OFFSETS: [f32; 3] = [30.0, 60.0, 90.0];
const SPREAD_SHOT_OFFSETS: [f32; 2] = [45.0, 75.0];

/// Movement patterns, cycled in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPattern {
    SideToSide,
    FollowPlayer,
    Sway,
}

impl BossPattern {
    pub fn next(self) -> Self {
        match self {
            BossPattern::SideToSide => BossPattern::FollowPlayer,
            BossPattern::FollowPlayer => BossPattern::Sway,
            BossPattern::Sway => BossPattern::SideToSide,
        }
    }
}

/// Health for a boss spawned on `level`
pub fn boss_health(level: u32) -> u32 {
    50 + level * 20
}

/// Frames between bursts on `level`
pub fn shoot_interval(level: u32) -> u32 {
    BASE_SHOOT_INTERVAL
        .saturating_sub(level.saturating_mul(SHOOT_INTERVAL_STEP))
        .max(MIN_SHOOT_INTERVAL)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub speed: f32,
    /// +1 right, -1 left (side-to-side pattern)
    pub direction: f32,
    pub pattern: BossPattern,
    pub pattern_timer: u32,
    pub shoot_timer: u32,
    pub level: u32,
    pub bullets: Vec<Bullet>,
}

impl Boss {
    pub fn new(x: f32, y: f32, level: u32) -> Self {
        let health = boss_health(level);
        Self {
            pos: Vec2::new(x, y),
            size: BOSS_SIZE,
            health,
            max_health: health,
            speed: BOSS_SPEED,
            direction: 1.0,
            pattern: BossPattern::SideToSide,
            pattern_timer: 0,
            shoot_timer: 0,
            level,
            bullets: Vec::new(),
        }
    }

    /// Spawn centred horizontally near the top of the canvas
    pub fn spawn(canvas_width: f32, level: u32) -> Self {
        Self::new(canvas_width / 2.0 - BOSS_SIZE.x / 2.0, BOSS_SPAWN_Y, level)
    }

    /// Move, fire and update owned bullets for one frame
    pub fn advance(&mut self, player_x: f32, canvas_width: f32, canvas_height: f32) {
        self.pattern_timer += 1;
        if self.pattern_timer > PATTERN_FRAMES {
            self.pattern = self.pattern.next();
            self.pattern_timer = 0;
        }

        let max_x = (canvas_width - self.size.x).max(0.0);
        match self.pattern {
            BossPattern::SideToSide => {
                self.pos.x += self.direction * self.speed;
                if self.pos.x <= 0.0 || self.pos.x >= max_x {
                    self.direction = -self.direction;
                }
            }
            BossPattern::FollowPlayer => {
                if self.pos.x + self.size.x / 2.0 < player_x {
                    self.pos.x += self.speed * 0.5;
                } else {
                    self.pos.x -= self.speed * 0.5;
                }
            }
            BossPattern::Sway => {
                self.pos.x += (self.pattern_timer as f32 * 0.1).sin() * 2.0;
            }
        }
        self.pos.x = self.pos.x.clamp(0.0, max_x);

        self.shoot_timer += 1;
        if self.shoot_timer > shoot_interval(self.level) {
            self.fire();
            self.shoot_timer = 0;
        }

        for bullet in &mut self.bullets {
            bullet.advance();
        }
        self.bullets.retain(|b| b.is_on_screen(canvas_height));
    }

    /// Emit one burst
    pub fn fire(&mut self) {
        let y = self.pos.y + self.size.y;
        for offset in MAIN_SHOT_OFFSETS {
            self.bullets
                .push(Bullet::new(self.pos.x + offset, y, MAIN_SHOT_SPEED, BulletOwner::Boss));
        }
        if self.level >= SPREAD_SHOT_LEVEL {
            for offset in SPREAD_SHOT_OFFSETS {
                self.bullets.push(Bullet::new(
                    self.pos.x + offset,
                    y,
                    SPREAD_SHOT_SPEED,
                    BulletOwner::Boss,
                ));
            }
        }
    }

    pub fn hit(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    pub fn describe(&self) -> Sprite {
        Sprite {
            health: Some(self.health_ratio()),
            ..Sprite::new(SpriteKind::Boss, self.pos, self.size)
        }
    }
}

impl Bounds for Boss {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_health_scales_with_level() {
        assert_eq!(Boss::new(0.0, 0.0, 3).health, 110);
        assert_eq!(Boss::new(0.0, 0.0, 6).max_health, 170);
    }

    #[test]
    fn test_shoot_interval_floor() {
        assert_eq!(shoot_interval(3), 45);
        assert_eq!(shoot_interval(9), 15);
        assert_eq!(shoot_interval(12), MIN_SHOOT_INTERVAL);
        assert_eq!(shoot_interval(40), MIN_SHOOT_INTERVAL);
    }

    #[test]
    fn test_burst_size() {
        let mut boss = Boss::new(100.0, 50.0, 3);
        boss.fire();
        assert_eq!(boss.bullets.len(), 3);
        assert!(boss.bullets.iter().all(|b| b.pos.y == 130.0 && b.speed == 4.0));

        let mut boss = Boss::new(100.0, 50.0, 6);
        boss.fire();
        assert_eq!(boss.bullets.len(), 5);
        assert_eq!(boss.bullets.iter().filter(|b| b.speed == 3.0).count(), 2);
    }

    #[test]
    fn test_fires_after_interval() {
        let mut boss = Boss::spawn(800.0, 3);
        for _ in 0..shoot_interval(3) {
            boss.advance(400.0, 800.0, 600.0);
        }
        assert!(boss.bullets.is_empty());
        boss.advance(400.0, 800.0, 600.0);
        assert_eq!(boss.bullets.len(), 3);
        assert_eq!(boss.shoot_timer, 0);
    }

    #[test]
    fn test_pattern_cycles() {
        let mut boss = Boss::spawn(800.0, 3);
        for _ in 0..=PATTERN_FRAMES {
            boss.advance(400.0, 800.0, 600.0);
        }
        assert_eq!(boss.pattern, BossPattern::FollowPlayer);
        assert_eq!(boss.pattern_timer, 0);
        assert_eq!(BossPattern::Sway.next(), BossPattern::SideToSide);
    }

    #[test]
    fn test_side_to_side_bounces() {
        let mut boss = Boss::new(679.5, 50.0, 3);
        boss.advance(0.0, 800.0, 600.0);
        assert_eq!(boss.pos.x, 680.0);
        assert_eq!(boss.direction, -1.0);
        boss.advance(0.0, 800.0, 600.0);
        assert_eq!(boss.pos.x, 679.0);
    }

    #[test]
    fn test_follow_player() {
        let mut boss = Boss::new(100.0, 50.0, 3);
        boss.pattern = BossPattern::FollowPlayer;
        boss.advance(500.0, 800.0, 600.0);
        assert_eq!(boss.pos.x, 100.5);
        boss.advance(0.0, 800.0, 600.0);
        assert_eq!(boss.pos.x, 100.0);
    }

    #[test]
    fn test_sway() {
        let mut boss = Boss::new(300.0, 50.0, 3);
        boss.pattern = BossPattern::Sway;
        boss.advance(0.0, 800.0, 600.0);
        assert!((boss.pos.x - (300.0 + 2.0 * 0.1f32.sin())).abs() < 1e-4);
        boss.advance(0.0, 800.0, 600.0);
        let expected = 300.0 + 2.0 * 0.1f32.sin() + 2.0 * 0.2f32.sin();
        assert!((boss.pos.x - expected).abs() < 1e-4);
        assert_eq!(boss.pattern, BossPattern::Sway);
    }

    #[test]
    fn test_sway_clamped_to_arena() {
        // sin(4.0) < 0 pushes left past the edge
        let mut boss = Boss::new(0.5, 50.0, 3);
        boss.pattern = BossPattern::Sway;
        boss.pattern_timer = 39;
        boss.advance(0.0, 800.0, 600.0);
        assert_eq!(boss.pos.x, 0.0);

        // sin(1.0) > 0 pushes right past the edge
        let mut boss = Boss::new(679.5, 50.0, 3);
        boss.pattern = BossPattern::Sway;
        boss.pattern_timer = 9;
        boss.advance(0.0, 800.0, 600.0);
        assert_eq!(boss.pos.x, 680.0);
    }

    #[test]
    fn test_hit_saturates() {
        let mut boss = Boss::new(0.0, 0.0, 3);
        boss.hit(200);
        assert_eq!(boss.health, 0);
        assert!(boss.is_defeated());
        assert_eq!(boss.health_ratio(), 0.0);
    }

    #[test]
    fn test_bullets_pruned_off_screen() {
        let mut boss = Boss::new(100.0, 50.0, 3);
        boss.bullets.push(Bullet::new(10.0, 598.0, 4.0, BulletOwner::Boss));
        boss.advance(0.0, 800.0, 600.0);
        assert!(boss.bullets.is_empty());
    }
}
