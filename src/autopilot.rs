//! Demo mode AI
//!
//! Produces the same `TickInput` a player would. Dodging beats everything
//! else; otherwise it lines up under a power-up, the boss or the lowest
//! invader and keeps the trigger held.

use glam::Vec2;

use crate::sim::{Bounds, GamePhase, GameState, MAX_UPGRADE_LEVEL, TickInput, UpgradeKind};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Extra horizontal clearance around the ship when judging threats
    pub dodge_margin: f32,
    /// How far above the ship a falling threat is worth reacting to
    pub lookahead: f32,
    /// Close enough to the target to stop moving
    pub deadband: f32,
    /// Order in which upgrade points are spent
    pub upgrade_order: [UpgradeKind; 4],
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            dodge_margin: 12.0,
            lookahead: 160.0,
            deadband: 4.0,
            upgrade_order: [
                UpgradeKind::FireRate,
                UpgradeKind::Damage,
                UpgradeKind::Speed,
                UpgradeKind::Luck,
            ],
        }
    }
}

impl Autopilot {
    pub fn decide(&self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.phase {
            GamePhase::Start => {
                input.start = true;
                return input;
            }
            GamePhase::Paused => {
                input.pause = true;
                return input;
            }
            GamePhase::GameOver => return input,
            GamePhase::Playing => {}
        }

        input.fire = true;
        let ship = state.player.bounds();
        let ship_x = ship.center().x;

        let target_x = match self.nearest_threat(state) {
            Some(threat_x) => {
                // Step away from the threat, or through it when pinned to a wall
                let away = if threat_x >= ship_x { -1.0 } else { 1.0 };
                let pinned_left = away < 0.0 && ship.min.x <= 0.0;
                let pinned_right = away > 0.0 && ship.max().x >= state.rules.width;
                if pinned_left || pinned_right {
                    ship_x - away * state.rules.width
                } else {
                    ship_x + away * state.rules.width
                }
            }
            None => match self.target(state) {
                Some(x) => x,
                None => return input,
            },
        };

        if target_x < ship_x - self.deadband {
            input.left = true;
        } else if target_x > ship_x + self.deadband {
            input.right = true;
        }
        input
    }

    /// Center x of the closest falling hazard in the ship's column
    fn nearest_threat(&self, state: &GameState) -> Option<f32> {
        let ship = state.player.bounds();
        let lo = ship.min.x - self.dodge_margin;
        let hi = ship.max().x + self.dodge_margin;

        let bullets = state
            .enemy_bullets
            .iter()
            .chain(state.boss.iter().flat_map(|b| b.bullets.iter()))
            .map(|b| b.bounds());
        let meteors = state.meteors.iter().map(|m| m.bounds());

        bullets
            .chain(meteors)
            .filter(|b| b.max().x > lo && b.min.x < hi)
            .filter(|b| {
                let gap = ship.min.y - b.max().y;
                gap > -ship.size.y && gap < self.lookahead
            })
            .min_by(|a, b| b.max().y.total_cmp(&a.max().y))
            .map(|b| b.center().x)
    }

    /// Where to line up when nothing is falling on us
    fn target(&self, state: &GameState) -> Option<f32> {
        let ship = state.player.bounds().center();

        let power_up = state
            .power_ups
            .iter()
            .map(|p| p.bounds().center())
            .min_by(|a, b| a.distance_squared(ship).total_cmp(&b.distance_squared(ship)));
        if let Some(p) = power_up {
            return Some(p.x);
        }

        if let Some(boss) = &state.boss {
            return Some(boss.bounds().center().x);
        }

        state
            .invaders
            .iter()
            .map(|inv| inv.bounds().center())
            .max_by(|a, b| {
                a.y.total_cmp(&b.y)
                    .then_with(|| dist_x(*b, ship).total_cmp(&dist_x(*a, ship)))
            })
            .map(|c| c.x)
    }

    /// Spend every available upgrade point, cycling through `upgrade_order`
    pub fn spend_points(&self, state: &mut GameState) -> u32 {
        let mut bought = 0;
        while state.upgrade_points > 0 {
            let Some(kind) = self
                .upgrade_order
                .iter()
                .copied()
                .filter(|k| state.upgrades.level(*k) < MAX_UPGRADE_LEVEL)
                .min_by_key(|k| state.upgrades.level(*k))
            else {
                break;
            };
            match state.purchase_upgrade(kind) {
                Ok(_) => bought += 1,
                Err(err) => {
                    log::warn!("Autopilot upgrade failed: {}", err);
                    break;
                }
            }
        }
        bought
    }
}

fn dist_x(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs()
}
