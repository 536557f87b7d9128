//! Render descriptors
//!
//! What an entity looks like this frame, as plain data. The render sink
//! decides colors and shapes from `SpriteKind`.

use glam::Vec2;
use serde::Serialize;

use super::entities::{BulletOwner, InvaderKind, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpriteKind {
    Player { shielded: bool },
    Invader(InvaderKind),
    Bullet(BulletOwner),
    Particle { hue: f32 },
    PowerUp(PowerUpKind),
    Meteor,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Radians
    pub rotation: f32,
    /// 0-1
    pub alpha: f32,
    /// Remaining health ratio for damageable entities
    pub health: Option<f32>,
    /// Animation pose
    pub frame: u32,
}

impl Sprite {
    pub fn new(kind: SpriteKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            pos,
            size,
            rotation: 0.0,
            alpha: 1.0,
            health: None,
            frame: 0,
        }
    }
}
