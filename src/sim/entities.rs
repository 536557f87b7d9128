//! Entity models
//!
//! Each entity owns its per-frame update and nothing else. Anything that
//! involves two entities (hits, pickups, scoring) happens in `collision`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Bounds};
use super::sprite::{Sprite, SpriteKind};
use crate::consts::secs_to_frames;

/// Player ship size
pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 30.0);
/// Base horizontal speed (pixels/frame)
pub const PLAYER_SPEED: f32 = 5.0;
/// Speed multiplier while a speed boost is active
pub const SPEED_BOOST_FACTOR: f32 = 1.5;
/// Frames between shots at fire-rate level 1
pub const SHOOT_COOLDOWN_FRAMES: u32 = 15;
/// Horizontal gap between multi-shot bullets
pub const MULTI_SHOT_SPREAD: f32 = 5.0;

pub const BULLET_SIZE: Vec2 = Vec2::new(4.0, 10.0);
pub const PLAYER_BULLET_SPEED: f32 = -5.0;
pub const INVADER_BULLET_SPEED: f32 = 3.0;

pub const INVADER_SIZE: Vec2 = Vec2::new(40.0, 30.0);

pub const PARTICLE_LIFE: u32 = 60;
pub const PARTICLE_GRAVITY: f32 = 0.2;
/// Particles per explosion burst
pub const EXPLOSION_PARTICLES: usize = 10;

pub const POWER_UP_SIZE: Vec2 = Vec2::new(30.0, 30.0);
pub const POWER_UP_FALL_SPEED: f32 = 2.0;
pub const POWER_UP_SPIN: f32 = 0.1;

pub const METEOR_SIZE: Vec2 = Vec2::new(40.0, 40.0);
pub const METEOR_HEALTH: u32 = 3;

/// Outcome of a hit on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shield took the hit and is now gone
    Absorbed,
    /// The hit costs a life
    Damaging,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    MultiShot,
    Shield,
    SpeedBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::MultiShot,
        PowerUpKind::Shield,
        PowerUpKind::SpeedBoost,
    ];

    /// How long the effect lasts once picked up
    pub fn duration_frames(self) -> u32 {
        match self {
            PowerUpKind::MultiShot => secs_to_frames(10),
            PowerUpKind::Shield => secs_to_frames(5),
            PowerUpKind::SpeedBoost => secs_to_frames(10),
        }
    }
}

/// Remaining frames for each active power-up (0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpTimers {
    pub multi_shot: u32,
    pub shield: u32,
    pub speed_boost: u32,
}

impl PowerUpTimers {
    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::MultiShot => self.multi_shot,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::SpeedBoost => self.speed_boost,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining(kind) > 0
    }

    fn set(&mut self, kind: PowerUpKind, frames: u32) {
        match kind {
            PowerUpKind::MultiShot => self.multi_shot = frames,
            PowerUpKind::Shield => self.shield = frames,
            PowerUpKind::SpeedBoost => self.speed_boost = frames,
        }
    }

    fn tick(&mut self) {
        self.multi_shot = self.multi_shot.saturating_sub(1);
        self.shield = self.shield.saturating_sub(1);
        self.speed_boost = self.speed_boost.saturating_sub(1);
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Frames until the next shot is allowed
    pub shoot_cooldown: u32,
    pub power_ups: PowerUpTimers,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
            power_ups: PowerUpTimers::default(),
        }
    }

    /// Move according to held keys and count down timers.
    ///
    /// `speed_scale` comes from the speed upgrade (1.0 at level 1).
    pub fn advance(&mut self, left: bool, right: bool, canvas_width: f32, speed_scale: f32) {
        let mut speed = self.speed * speed_scale;
        if self.power_ups.is_active(PowerUpKind::SpeedBoost) {
            speed *= SPEED_BOOST_FACTOR;
        }

        let mut dx = 0.0;
        if left {
            dx -= speed;
        }
        if right {
            dx += speed;
        }
        let max_x = (canvas_width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + dx).clamp(0.0, max_x);

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.power_ups.tick();
    }

    /// Fire if the cooldown allows it. Returns true when bullets were added.
    pub fn shoot(&mut self, bullets: &mut Vec<Bullet>, fire_rate_level: u32) -> bool {
        if self.shoot_cooldown > 0 {
            return false;
        }

        let muzzle_x = self.pos.x + self.size.x / 2.0;
        if self.power_ups.is_active(PowerUpKind::MultiShot) {
            for offset in [-MULTI_SHOT_SPREAD, 0.0, MULTI_SHOT_SPREAD] {
                bullets.push(Bullet::new(
                    muzzle_x + offset,
                    self.pos.y,
                    PLAYER_BULLET_SPEED,
                    BulletOwner::Player,
                ));
            }
        } else {
            bullets.push(Bullet::new(
                muzzle_x,
                self.pos.y,
                PLAYER_BULLET_SPEED,
                BulletOwner::Player,
            ));
        }

        self.shoot_cooldown = shoot_cooldown_frames(fire_rate_level);
        true
    }

    /// Take a hit. An active shield absorbs it and is consumed.
    pub fn hit(&mut self) -> HitOutcome {
        if self.power_ups.shield > 0 {
            self.power_ups.shield = 0;
            HitOutcome::Absorbed
        } else {
            HitOutcome::Damaging
        }
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        self.power_ups.set(kind, kind.duration_frames());
    }

    pub fn describe(&self) -> Sprite {
        Sprite::new(
            SpriteKind::Player {
                shielded: self.power_ups.is_active(PowerUpKind::Shield),
            },
            self.pos,
            self.size,
        )
    }
}

/// Shoot cooldown for a fire-rate upgrade level
pub fn shoot_cooldown_frames(fire_rate_level: u32) -> u32 {
    SHOOT_COOLDOWN_FRAMES.div_ceil(fire_rate_level.max(1))
}

/// Who fired a bullet (also decides its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Invader,
    Boss,
}

/// A projectile travelling straight up or down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame; negative travels up
    pub speed: f32,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn new(x: f32, y: f32, speed: f32, owner: BulletOwner) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: BULLET_SIZE,
            speed,
            owner,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn is_on_screen(&self, canvas_height: f32) -> bool {
        self.pos.y > 0.0 && self.pos.y < canvas_height
    }

    pub fn describe(&self) -> Sprite {
        Sprite::new(SpriteKind::Bullet(self.owner), self.pos, self.size)
    }
}

/// Invader types, by row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvaderKind {
    Fast,
    Normal,
    Heavy,
}

impl InvaderKind {
    pub fn base_points(self) -> u64 {
        match self {
            InvaderKind::Fast => 30,
            InvaderKind::Normal => 20,
            InvaderKind::Heavy => 10,
        }
    }

    /// Frames per animation step
    pub fn anim_rate(self) -> u32 {
        match self {
            InvaderKind::Fast => 8,
            InvaderKind::Normal => 6,
            InvaderKind::Heavy => 4,
        }
    }

    pub fn for_row(row: usize) -> Self {
        match row {
            0 | 1 => InvaderKind::Fast,
            2 | 3 => InvaderKind::Normal,
            _ => InvaderKind::Heavy,
        }
    }
}

/// A single invader. Movement comes from the wave formation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: InvaderKind,
    pub anim_frame: u32,
}

impl Invader {
    pub fn new(x: f32, y: f32, kind: InvaderKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: INVADER_SIZE,
            kind,
            anim_frame: 0,
        }
    }

    pub fn advance(&mut self) {
        self.anim_frame = self.anim_frame.wrapping_add(1);
    }

    /// Which of the two sprite poses to draw
    pub fn sprite_frame(&self) -> u32 {
        (self.anim_frame / self.kind.anim_rate()) % 2
    }

    pub fn describe(&self) -> Sprite {
        Sprite {
            frame: self.sprite_frame(),
            ..Sprite::new(SpriteKind::Invader(self.kind), self.pos, self.size)
        }
    }
}

/// Explosion debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left, counts down from `PARTICLE_LIFE`
    pub life: u32,
    /// Hue in degrees (orange-yellow range)
    pub hue: f32,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(pos: Vec2, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)),
            life: PARTICLE_LIFE,
            hue: rng.random_range(10.0..70.0),
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }

    pub fn describe(&self) -> Sprite {
        Sprite {
            alpha: self.alpha(),
            ..Sprite::new(SpriteKind::Particle { hue: self.hue }, self.pos, Vec2::splat(3.0))
        }
    }
}

/// Push a burst of particles centred on `at`
pub fn explode<R: Rng + ?Sized>(particles: &mut Vec<Particle>, rng: &mut R, at: Vec2) {
    particles.extend((0..EXPLOSION_PARTICLES).map(|_| Particle::random(at, rng)));
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
    pub rotation: f32,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: POWER_UP_SIZE,
            kind,
            speed: POWER_UP_FALL_SPEED,
            rotation: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.rotation += POWER_UP_SPIN;
    }

    pub fn is_on_screen(&self, canvas_height: f32) -> bool {
        self.pos.y < canvas_height
    }

    pub fn describe(&self) -> Sprite {
        Sprite {
            rotation: self.rotation,
            ..Sprite::new(SpriteKind::PowerUp(self.kind), self.pos, self.size)
        }
    }
}

/// A tumbling meteor that takes several hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Meteor {
    pub fn new<R: Rng + ?Sized>(x: f32, y: f32, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: METEOR_SIZE,
            health: METEOR_HEALTH,
            speed: rng.random_range(2.0..5.0),
            rotation: 0.0,
            rotation_speed: rng.random_range(0.05..0.15),
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.rotation += self.rotation_speed;
    }

    pub fn hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    pub fn is_on_screen(&self, canvas_height: f32) -> bool {
        self.pos.y < canvas_height
    }

    pub fn describe(&self) -> Sprite {
        Sprite {
            rotation: self.rotation,
            health: Some(self.health as f32 / METEOR_HEALTH as f32),
            ..Sprite::new(SpriteKind::Meteor, self.pos, self.size)
        }
    }
}

macro_rules! impl_bounds {
    ($($ty:ty),*) => {
        $(impl Bounds for $ty {
            fn bounds(&self) -> Aabb {
                Aabb::new(self.pos, self.size)
            }
        })*
    };
}

impl_bounds!(Player, Bullet, Invader, PowerUp, Meteor);
