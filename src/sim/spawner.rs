//! Timer-driven spawn policies
//!
//! Each category accumulates frame time and fires once it passes a base
//! threshold plus a random jitter. The jitter is rolled when the timer
//! re-arms, the base is read on every check.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::entities::{
    Bullet, BulletOwner, INVADER_BULLET_SPEED, Invader, METEOR_SIZE, Meteor, POWER_UP_SIZE,
    PowerUp, PowerUpKind,
};

pub const POWER_UP_BASE_MS: f32 = 15000.0;
/// Base threshold reduction per luck level
pub const POWER_UP_LUCK_STEP_MS: f32 = 2000.0;
pub const POWER_UP_JITTER_MS: f32 = 10000.0;

pub const METEOR_BASE_MS: f32 = 8000.0;
pub const METEOR_JITTER_MS: f32 = 7000.0;
pub const METEOR_SPAWN_Y: f32 = -40.0;

pub const INVADER_SHOT_BASE_MS: f32 = 1000.0;
pub const INVADER_SHOT_JITTER_MS: f32 = 2000.0;
/// Muzzle offset from the invader's top-left corner
pub const INVADER_MUZZLE: Vec2 = Vec2::new(20.0, 30.0);

/// Delay between the boss becoming due and it appearing
pub const BOSS_DELAY_MS: f32 = 2000.0;
/// Bosses appear on levels divisible by this
pub const BOSS_LEVEL_INTERVAL: u32 = 3;

/// Power-up base threshold for a luck level
pub fn power_up_base_ms(luck: u32) -> f32 {
    (POWER_UP_BASE_MS - luck as f32 * POWER_UP_LUCK_STEP_MS).max(0.0)
}

pub fn is_boss_level(level: u32) -> bool {
    level > 0 && level % BOSS_LEVEL_INTERVAL == 0
}

/// Accumulating timer with a jittered threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub elapsed_ms: f32,
    pub jitter_ms: f32,
}

impl SpawnTimer {
    pub fn armed<R: Rng + ?Sized>(jitter_max_ms: f32, rng: &mut R) -> Self {
        Self {
            elapsed_ms: 0.0,
            jitter_ms: rng.random_range(0.0..jitter_max_ms),
        }
    }

    /// Add `dt_ms`; returns true (and re-arms) once past `base_ms + jitter`
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        base_ms: f32,
        jitter_max_ms: f32,
        rng: &mut R,
    ) -> bool {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms > base_ms + self.jitter_ms {
            self.elapsed_ms = 0.0;
            self.jitter_ms = rng.random_range(0.0..jitter_max_ms);
            true
        } else {
            false
        }
    }
}

/// All spawn timers for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub power_up: SpawnTimer,
    pub meteor: SpawnTimer,
    pub invader_shot: SpawnTimer,
    /// Time spent eligible for a boss (ms)
    pub boss_delay_ms: f32,
}

impl Spawner {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            power_up: SpawnTimer::armed(POWER_UP_JITTER_MS, rng),
            meteor: SpawnTimer::armed(METEOR_JITTER_MS, rng),
            invader_shot: SpawnTimer::armed(INVADER_SHOT_JITTER_MS, rng),
            boss_delay_ms: 0.0,
        }
    }

    pub fn power_up<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        luck: u32,
        canvas_width: f32,
        rng: &mut R,
    ) -> Option<PowerUp> {
        if !self
            .power_up
            .advance(dt_ms, power_up_base_ms(luck), POWER_UP_JITTER_MS, rng)
        {
            return None;
        }
        let x = rng.random_range(0.0..(canvas_width - POWER_UP_SIZE.x).max(1.0));
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        log::debug!("Power-up {:?} spawned at x={:.0}", kind, x);
        Some(PowerUp::new(x, 0.0, kind))
    }

    pub fn meteor<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        canvas_width: f32,
        rng: &mut R,
    ) -> Option<Meteor> {
        if !self
            .meteor
            .advance(dt_ms, METEOR_BASE_MS, METEOR_JITTER_MS, rng)
        {
            return None;
        }
        let x = rng.random_range(0.0..(canvas_width - METEOR_SIZE.x).max(1.0));
        log::debug!("Meteor spawned at x={:.0}", x);
        Some(Meteor::new(x, METEOR_SPAWN_Y, rng))
    }

    /// A random live invader fires. The timer re-arms even when the wave is empty.
    pub fn invader_shot<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        invaders: &[Invader],
        rng: &mut R,
    ) -> Option<Bullet> {
        if !self
            .invader_shot
            .advance(dt_ms, INVADER_SHOT_BASE_MS, INVADER_SHOT_JITTER_MS, rng)
        {
            return None;
        }
        if invaders.is_empty() {
            return None;
        }
        let shooter = &invaders[rng.random_range(0..invaders.len())];
        let muzzle = shooter.pos + INVADER_MUZZLE;
        Some(Bullet::new(
            muzzle.x,
            muzzle.y,
            INVADER_BULLET_SPEED,
            BulletOwner::Invader,
        ))
    }

    /// Count down to the boss while `eligible`; the delay restarts whenever
    /// eligibility lapses.
    pub fn boss(
        &mut self,
        dt_ms: f32,
        eligible: bool,
        level: u32,
        canvas_width: f32,
    ) -> Option<Boss> {
        if !eligible {
            self.boss_delay_ms = 0.0;
            return None;
        }
        self.boss_delay_ms += dt_ms;
        if self.boss_delay_ms > BOSS_DELAY_MS {
            self.boss_delay_ms = 0.0;
            Some(Boss::spawn(canvas_width, level))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::wave::generate_wave;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_timer_fires_past_threshold() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut timer = SpawnTimer {
            elapsed_ms: 0.0,
            jitter_ms: 500.0,
        };
        assert!(!timer.advance(1000.0, 1000.0, 2000.0, &mut rng));
        assert!(!timer.advance(500.0, 1000.0, 2000.0, &mut rng));
        assert!(timer.advance(1.0, 1000.0, 2000.0, &mut rng));
        assert_eq!(timer.elapsed_ms, 0.0);
        assert!((0.0..2000.0).contains(&timer.jitter_ms));
    }

    #[test]
    fn test_luck_lowers_power_up_base() {
        assert_eq!(power_up_base_ms(1), 13000.0);
        assert_eq!(power_up_base_ms(5), 5000.0);
        assert_eq!(power_up_base_ms(10), 0.0);
    }

    #[test]
    fn test_power_up_spawns_within_window() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spawner = Spawner::new(&mut rng);
        let mut frames = 0u32;
        let spawned = loop {
            frames += 1;
            if let Some(p) = spawner.power_up(FRAME_MS, 1, 800.0, &mut rng) {
                break p;
            }
            assert!(frames < 60 * 24, "power-up never spawned");
        };
        let elapsed = frames as f32 * FRAME_MS;
        assert!(elapsed > 13000.0 - FRAME_MS);
        assert_eq!(spawned.pos.y, 0.0);
        assert!(spawned.pos.x >= 0.0 && spawned.pos.x < 770.0);
    }

    #[test]
    fn test_meteor_spawns_above_canvas() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = Spawner::new(&mut rng);
        spawner.meteor.jitter_ms = 0.0;
        assert!(spawner.meteor(8000.0, 800.0, &mut rng).is_none());
        let meteor = spawner.meteor(1.0, 800.0, &mut rng).expect("meteor due");
        assert_eq!(meteor.pos.y, METEOR_SPAWN_Y);
        assert_eq!(meteor.health, 3);
    }

    #[test]
    fn test_invader_shot_from_live_invader() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut spawner = Spawner::new(&mut rng);
        let wave = generate_wave(800.0);
        let bullet = spawner
            .invader_shot(3001.0, &wave, &mut rng)
            .expect("shot due");
        assert_eq!(bullet.owner, BulletOwner::Invader);
        assert_eq!(bullet.speed, INVADER_BULLET_SPEED);
        assert!(
            wave.iter()
                .any(|i| i.pos + INVADER_MUZZLE == bullet.pos)
        );
    }

    #[test]
    fn test_invader_shot_rearms_without_invaders() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut spawner = Spawner::new(&mut rng);
        assert!(spawner.invader_shot(3001.0, &[], &mut rng).is_none());
        assert_eq!(spawner.invader_shot.elapsed_ms, 0.0);
    }

    #[test]
    fn test_boss_delay() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut spawner = Spawner::new(&mut rng);
        assert!(spawner.boss(1500.0, true, 3, 800.0).is_none());
        // Losing eligibility restarts the countdown
        assert!(spawner.boss(FRAME_MS, false, 3, 800.0).is_none());
        assert!(spawner.boss(1500.0, true, 3, 800.0).is_none());
        let boss = spawner.boss(600.0, true, 3, 800.0).expect("boss due");
        assert_eq!(boss.pos, Vec2::new(340.0, 50.0));
        assert_eq!(boss.level, 3);
    }

    #[test]
    fn test_boss_levels() {
        assert!(!is_boss_level(0));
        assert!(!is_boss_level(2));
        assert!(is_boss_level(3));
        assert!(is_boss_level(9));
    }
}
