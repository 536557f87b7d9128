//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collections are plain `Vec`s, scanned in reverse)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod collision;
pub mod combo;
pub mod entities;
pub mod spawner;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod time_attack;
pub mod wave;

pub use boss::{Boss, BossPattern};
pub use collision::{Aabb, Bounds, overlaps};
pub use combo::Combo;
pub use entities::{
    Bullet, BulletOwner, HitOutcome, Invader, InvaderKind, Meteor, Particle, Player, PowerUp,
    PowerUpKind,
};
pub use spawner::Spawner;
pub use sprite::{Sprite, SpriteKind};
pub use state::{
    GameEvent, GamePhase, GameState, Rules, UpgradeError, UpgradeKind, Upgrades,
    MAX_UPGRADE_LEVEL,
};
pub use tick::{TickInput, tick};
pub use time_attack::{GameMode, Objectives, Progress, TimeAttack};
pub use wave::{Formation, generate_wave};
