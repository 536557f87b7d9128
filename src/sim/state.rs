//! Game state and session rules
//!
//! Everything the simulation loop owns lives here. Entities only mutate
//! themselves; cross-entity effects go through `GameState` methods.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::collision::Bounds;
use super::combo::Combo;
use super::entities::{
    Bullet, HitOutcome, Invader, Meteor, Particle, Player, PowerUp, PowerUpKind, explode,
};
use super::spawner::{Spawner, is_boss_level};
use super::time_attack::{GameMode, Objectives, Progress, TimeAttack};
use super::wave::{Formation, generate_wave};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, secs_to_frames};

pub const STARTING_LIVES: u32 = 3;
/// Player spawn height above the bottom edge
pub const PLAYER_BOTTOM_MARGIN: f32 = 50.0;
/// Bonus per level reached (times the new level)
pub const LEVEL_BONUS: u64 = 100;
pub const POWER_UP_PICKUP_POINTS: u64 = 50;
pub const METEOR_POINTS: u64 = 100;
pub const BOSS_HIT_POINTS: u64 = 50;
pub const BOSS_KILL_POINTS: u64 = 1000;
/// Upgrade points granted for beating a boss
pub const BOSS_UPGRADE_POINTS: u32 = 3;
pub const MAX_UPGRADE_LEVEL: u32 = 5;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Start,
    /// Active gameplay
    Playing,
    /// Frozen; rendering continues
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Things that happened during a tick, for sound, UI and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Shot,
    /// Invader, meteor or boss took a player bullet
    EnemyHit,
    PlayerDamaged { lives: u32 },
    ShieldAbsorbed,
    PowerUpCollected(PowerUpKind),
    MeteorDestroyed,
    LevelAdvanced { level: u32 },
    BossSpawned { level: u32 },
    BossDefeated,
    ObjectivesCompleted,
    TimeUp { objectives: u32 },
    GameOver { score: u64 },
}

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    FireRate,
    Speed,
    Luck,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Damage,
        UpgradeKind::FireRate,
        UpgradeKind::Speed,
        UpgradeKind::Luck,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UpgradeError {
    #[error("no upgrade points left")]
    NoPoints,
    #[error("{0:?} is already at level {1}")]
    MaxLevel(UpgradeKind, u32),
}

/// Upgrade levels (all start at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub damage: u32,
    pub fire_rate: u32,
    pub speed: u32,
    pub luck: u32,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            damage: 1,
            fire_rate: 1,
            speed: 1,
            luck: 1,
        }
    }
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Damage => self.damage,
            UpgradeKind::FireRate => self.fire_rate,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::Luck => self.luck,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Damage => &mut self.damage,
            UpgradeKind::FireRate => &mut self.fire_rate,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::Luck => &mut self.luck,
        }
    }

    /// Player speed multiplier (1.0 at level 1, +20% per level)
    pub fn speed_scale(&self) -> f32 {
        1.0 + 0.2 * self.speed.saturating_sub(1) as f32
    }
}

/// Fixed parameters of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub width: f32,
    pub height: f32,
    pub starting_lives: u32,
    pub time_attack_frames: u32,
    pub objectives: Objectives,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            starting_lives: STARTING_LIVES,
            time_attack_frames: secs_to_frames(120),
            objectives: Objectives::default(),
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rules: Rules,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub score: u64,
    pub lives: u32,
    /// 1-based
    pub level: u32,
    pub combo: Combo,
    pub upgrades: Upgrades,
    pub upgrade_points: u32,
    pub meteors_destroyed: u32,
    pub time_attack: TimeAttack,
    /// Boss for the current level has been beaten
    pub boss_defeated: bool,
    pub player: Player,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    /// Invader bullets (boss bullets live on the boss)
    pub enemy_bullets: Vec<Bullet>,
    pub invaders: Vec<Invader>,
    pub formation: Formation,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub meteors: Vec<Meteor>,
    pub boss: Option<Boss>,
    pub spawner: Spawner,
    /// Simulated frames this session
    pub frame: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New normal-mode session with default rules
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, Rules::default(), GameMode::Normal)
    }

    pub fn with_rules(seed: u64, rules: Rules, mode: GameMode) -> Self {
        Self::fresh(rules, mode, Pcg32::seed_from_u64(seed))
    }

    fn fresh(rules: Rules, mode: GameMode, mut rng: Pcg32) -> Self {
        let player = Player::new(rules.width / 2.0, rules.height - PLAYER_BOTTOM_MARGIN);
        let spawner = Spawner::new(&mut rng);
        Self {
            phase: GamePhase::Start,
            mode,
            score: 0,
            lives: rules.starting_lives,
            level: 1,
            combo: Combo::new(),
            upgrades: Upgrades::default(),
            upgrade_points: 0,
            meteors_destroyed: 0,
            time_attack: TimeAttack::new(rules.time_attack_frames, rules.objectives),
            boss_defeated: false,
            player,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            invaders: generate_wave(rules.width),
            formation: Formation::default(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            meteors: Vec::new(),
            boss: None,
            spawner,
            frame: 0,
            events: Vec::new(),
            rng,
            rules,
        }
    }

    /// Reset every session and entity field and resume play. Mode and the
    /// RNG stream carry over.
    pub fn restart(&mut self) {
        let events = std::mem::take(&mut self.events);
        let mut fresh = Self::fresh(self.rules.clone(), self.mode, self.rng.clone());
        fresh.events = events;
        fresh.phase = GamePhase::Playing;
        *self = fresh;
        log::info!("Game restarted ({})", self.mode.label());
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Switch mode; only allowed outside of active play
    pub fn toggle_mode(&mut self) -> bool {
        if self.phase == GamePhase::Playing {
            return false;
        }
        self.mode = self.mode.toggled();
        log::info!("Mode: {}", self.mode.label());
        true
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        log::info!(
            "Game over: score {} level {} max combo {}",
            self.score,
            self.level,
            self.combo.max
        );
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            score: self.score,
            max_combo: self.combo.max,
            meteors_destroyed: self.meteors_destroyed,
        }
    }

    /// Spend one upgrade point
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, UpgradeError> {
        let level = self.upgrades.level(kind);
        if level >= MAX_UPGRADE_LEVEL {
            return Err(UpgradeError::MaxLevel(kind, level));
        }
        if self.upgrade_points == 0 {
            return Err(UpgradeError::NoPoints);
        }
        self.upgrade_points -= 1;
        let level = self.upgrades.level_mut(kind);
        *level += 1;
        log::info!("Upgraded {:?} to level {}", kind, level);
        Ok(*level)
    }

    pub(crate) fn explode_at(&mut self, at: Vec2) {
        explode(&mut self.particles, &mut self.rng, at);
    }

    /// Resolve a hit on the player. `breaks_combo` is set for meteor and
    /// boss damage.
    pub(crate) fn damage_player(&mut self, breaks_combo: bool) {
        match self.player.hit() {
            HitOutcome::Absorbed => self.events.push(GameEvent::ShieldAbsorbed),
            HitOutcome::Damaging => {
                self.lives = self.lives.saturating_sub(1);
                self.explode_at(self.player.bounds().center());
                self.events.push(GameEvent::PlayerDamaged { lives: self.lives });
                if breaks_combo {
                    self.combo.reset();
                }
                if self.lives == 0 {
                    self.game_over();
                }
            }
        }
    }

    /// Award the boss kill and clear it
    pub(crate) fn defeat_boss(&mut self) {
        let Some(boss) = self.boss.take() else {
            return;
        };
        self.explode_at(boss.bounds().center());
        self.score += self.combo.scale(BOSS_KILL_POINTS);
        self.combo.add();
        self.upgrade_points += BOSS_UPGRADE_POINTS;
        self.boss_defeated = true;
        self.events.push(GameEvent::BossDefeated);
        log::info!("Boss defeated on level {}", self.level);
    }

    /// A boss is still owed on this level
    pub fn boss_pending(&self) -> bool {
        is_boss_level(self.level) && (self.boss.is_some() || !self.boss_defeated)
    }

    /// Boss countdown may run
    pub fn boss_eligible(&self) -> bool {
        is_boss_level(self.level)
            && self.invaders.is_empty()
            && self.boss.is_none()
            && !self.boss_defeated
    }

    pub(crate) fn advance_level(&mut self) {
        self.level += 1;
        self.formation.speed_up();
        self.invaders = generate_wave(self.rules.width);
        self.score += LEVEL_BONUS * self.level as u64;
        self.boss_defeated = false;
        self.events.push(GameEvent::LevelAdvanced { level: self.level });
        log::info!(
            "Level {} (invader speed {:.1})",
            self.level,
            self.formation.speed
        );
    }

    /// Any invader has reached the player's line
    pub fn invaders_landed(&self) -> bool {
        self.invaders
            .iter()
            .any(|inv| inv.pos.y + inv.size.y >= self.player.pos.y)
    }
}
