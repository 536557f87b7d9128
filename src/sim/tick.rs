//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one frame.

use super::collision;
use super::spawner::is_boss_level;
use super::state::{GameEvent, GamePhase, GameState};
use super::time_attack::GameMode;
use crate::consts::FRAME_MS;

/// Input commands for a single tick
///
/// Movement and fire are held keys. The rest are edges and act once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Fire while held, gated by the shoot cooldown
    pub fire: bool,
    /// Leave the title screen
    pub start: bool,
    /// New session from the game-over screen
    pub restart: bool,
    /// Pause toggle
    pub pause: bool,
    /// Switch between normal and time attack (outside of play)
    pub toggle_mode: bool,
}

impl TickInput {
    /// Merge a newer sample: held keys follow the latest, edges accumulate
    /// until consumed.
    pub fn latch(&mut self, newer: &TickInput) {
        self.left = newer.left;
        self.right = newer.right;
        self.fire = newer.fire;
        self.start |= newer.start;
        self.restart |= newer.restart;
        self.pause |= newer.pause;
        self.toggle_mode |= newer.toggle_mode;
    }

    /// Drop edge-triggered commands once a tick has seen them
    pub fn clear_edges(&mut self) {
        self.start = false;
        self.restart = false;
        self.pause = false;
        self.toggle_mode = false;
    }

    pub fn has_edges(&self) -> bool {
        self.start || self.restart || self.pause || self.toggle_mode
    }
}

/// Advance the game state by one fixed frame
///
/// Events accumulate in `state.events` until the caller drains them with
/// `GameState::drain_events`. `runner::Game` drains after every tick.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.toggle_mode {
        state.toggle_mode();
    }

    match state.phase {
        GamePhase::Start => {
            if input.start {
                state.set_phase(GamePhase::Playing);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            return;
        }
        GamePhase::Paused => {
            if input.pause {
                state.set_phase(GamePhase::Playing);
            }
            return;
        }
        GamePhase::Playing => {
            if input.pause {
                state.set_phase(GamePhase::Paused);
                return;
            }
        }
    }

    state.frame += 1;

    if input.fire
        && state
            .player
            .shoot(&mut state.bullets, state.upgrades.fire_rate)
    {
        state.events.push(GameEvent::Shot);
    }

    let (width, height) = (state.rules.width, state.rules.height);
    let speed_scale = state.upgrades.speed_scale();
    state
        .player
        .advance(input.left, input.right, width, speed_scale);

    for bullet in &mut state.bullets {
        bullet.advance();
    }
    state.bullets.retain(|b| b.is_on_screen(height));
    for bullet in &mut state.enemy_bullets {
        bullet.advance();
    }
    state.enemy_bullets.retain(|b| b.is_on_screen(height));

    state.formation.advance(&mut state.invaders, width);
    if let Some(shot) = state
        .spawner
        .invader_shot(FRAME_MS, &state.invaders, &mut state.rng)
    {
        state.enemy_bullets.push(shot);
    }

    for particle in &mut state.particles {
        particle.advance();
    }
    state.particles.retain(|p| p.is_alive());
    for power_up in &mut state.power_ups {
        power_up.advance();
    }
    state.power_ups.retain(|p| p.is_on_screen(height));
    for meteor in &mut state.meteors {
        meteor.advance();
    }
    state
        .meteors
        .retain(|m| m.is_on_screen(height) && !m.is_destroyed());

    let player_x = state.player.pos.x;
    if let Some(boss) = state.boss.as_mut() {
        boss.advance(player_x, width, height);
    }

    state.combo.decay(FRAME_MS);

    if state.mode == GameMode::TimeAttack {
        let progress = state.progress();
        let award = state.time_attack.advance(progress);
        state.score += award.total();
        if award.completion_bonus > 0 {
            state.events.push(GameEvent::ObjectivesCompleted);
            log::info!("All time attack objectives completed");
        }
        if award.expired {
            let objectives = state.time_attack.objectives.completed_count(&progress);
            state.events.push(GameEvent::TimeUp { objectives });
            log::info!("Time up with {} objectives met", objectives);
            state.game_over();
            return;
        }
    }

    collision::resolve(state);
    if state.is_over() {
        return;
    }

    spawn(state);

    if state.invaders.is_empty() && !state.boss_pending() {
        state.advance_level();
    }

    if state.invaders_landed() {
        log::info!("Invaders reached the player line");
        state.lives = 0;
        state.game_over();
    }
}

fn spawn(state: &mut GameState) {
    let width = state.rules.width;

    if let Some(power_up) =
        state
            .spawner
            .power_up(FRAME_MS, state.upgrades.luck, width, &mut state.rng)
    {
        state.power_ups.push(power_up);
    }

    if let Some(meteor) = state.spawner.meteor(FRAME_MS, width, &mut state.rng) {
        state.meteors.push(meteor);
    }

    let eligible = state.boss_eligible();
    if let Some(boss) = state.spawner.boss(FRAME_MS, eligible, state.level, width) {
        debug_assert!(is_boss_level(state.level));
        log::info!("Boss spawned on level {} ({} hp)", state.level, boss.health);
        state.events.push(GameEvent::BossSpawned { level: state.level });
        state.boss = Some(boss);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{
        Bullet, BulletOwner, INVADER_BULLET_SPEED, Invader, InvaderKind, PLAYER_BULLET_SPEED,
        PowerUpKind,
    };
    use crate::sim::boss::Boss;
    use crate::sim::state::Rules;
    use crate::sim::time_attack::Objectives;
    use proptest::prelude::*;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        state
    }

    fn press_pause(state: &mut GameState) {
        tick(
            state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.frame, 0);

        let state = started(12345);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = started(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 1);

        press_pause(&mut state);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame, 1);

        press_pause(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_mode_toggle_blocked_while_playing() {
        let mut state = GameState::new(1);
        let toggle = TickInput {
            toggle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &toggle);
        assert_eq!(state.mode, GameMode::TimeAttack);

        let mut state = started(1);
        tick(&mut state, &toggle);
        assert_eq!(state.mode, GameMode::Normal);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_held_fire_respects_cooldown() {
        let mut state = started(7);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &fire);
        }
        let shots = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::Shot)
            .count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_shield_absorbs_enemy_bullet() {
        let mut state = started(3);
        state.player.apply_power_up(PowerUpKind::Shield);
        let p = state.player.pos;
        state.enemy_bullets.push(Bullet::new(
            p.x + 10.0,
            p.y,
            INVADER_BULLET_SPEED,
            BulletOwner::Invader,
        ));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 3);
        assert_eq!(state.player.power_ups.shield, 0);
        assert!(state.events.contains(&GameEvent::ShieldAbsorbed));
    }

    #[test]
    fn test_wave_clear_advances_level() {
        let mut state = started(5);
        state.invaders.clear();
        tick(&mut state, &TickInput::default());

        assert_eq!(state.level, 2);
        assert_eq!(state.formation.speed, 1.5);
        assert_eq!(state.invaders.len(), 50);
        assert_eq!(state.score, 200);
        assert!(state.events.contains(&GameEvent::LevelAdvanced { level: 2 }));
    }

    #[test]
    fn test_boss_level_waits_for_boss() {
        let mut state = started(5);
        state.level = 3;
        state.invaders.clear();

        let mut frames = 0;
        while state.boss.is_none() {
            tick(&mut state, &TickInput::default());
            frames += 1;
            assert_eq!(state.level, 3);
            assert!(frames < 200, "boss never spawned");
        }
        // 2000 ms at 60 fps
        assert!((120..=122).contains(&frames));
        assert!(state.events.contains(&GameEvent::BossSpawned { level: 3 }));

        if let Some(boss) = state.boss.as_mut() {
            boss.health = 0;
        }
        let score = state.score;
        tick(&mut state, &TickInput::default());
        assert!(state.boss.is_none());
        assert_eq!(state.upgrade_points, 3);
        assert_eq!(state.level, 4);
        // Boss kill plus level bonus
        assert_eq!(state.score, score + 1000 + 400);
    }

    #[test]
    fn test_boss_killed_by_bullet_is_gone_same_frame() {
        let mut state = started(5);
        state.level = 3;
        state.invaders.clear();
        let mut boss = Boss::spawn(state.rules.width, 3);
        boss.health = 1;
        let (x, y) = (boss.pos.x, boss.pos.y);
        state.boss = Some(boss);
        state
            .bullets
            .push(Bullet::new(x + 50.0, y + 40.0, PLAYER_BULLET_SPEED, BulletOwner::Player));

        tick(&mut state, &TickInput::default());
        assert!(state.boss.is_none());
        assert_eq!(state.upgrade_points, 3);
        assert_eq!(state.level, 4);
        assert!(state.events.contains(&GameEvent::BossDefeated));
    }

    #[test]
    fn test_invaders_landing_ends_game() {
        let mut state = started(9);
        state.invaders = vec![Invader::new(
            100.0,
            state.player.pos.y - 30.0,
            InvaderKind::Heavy,
        )];
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::GameOver { .. })
        ));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = started(9);
        state.score = 900;
        state.game_over();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_time_attack_expiry_with_all_objectives() {
        let rules = Rules {
            time_attack_frames: 2,
            objectives: Objectives::default(),
            ..Default::default()
        };
        let mut state = GameState::with_rules(4, rules, GameMode::TimeAttack);
        state.set_phase(GamePhase::Playing);
        tick(&mut state, &TickInput::default());

        state.score = 5000;
        state.combo.max = 10;
        state.meteors_destroyed = 5;
        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 10000);
        assert!(state.is_over());
        assert!(state.events.contains(&GameEvent::ObjectivesCompleted));
        assert!(state.events.contains(&GameEvent::TimeUp { objectives: 3 }));
    }

    #[test]
    fn test_normal_mode_has_no_clock() {
        let mut state = started(4);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.time_attack.elapsed_frames, 0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = started(99999);
        let mut state2 = started(99999);

        let inputs = [
            TickInput {
                left: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.lives, state2.lives);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.invaders.len(), state2.invaders.len());
        assert_eq!(state1.meteors.len(), state2.meteors.len());
        assert_eq!(state1.events, state2.events);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_pause_round_trip_is_idle(seed in 0u64..1000, before in 0usize..200, idle in 0usize..50) {
            let mut paused = started(seed);
            let mut straight = started(seed);
            let fire = TickInput { fire: true, ..Default::default() };
            for _ in 0..before {
                tick(&mut paused, &fire);
                tick(&mut straight, &fire);
            }

            press_pause(&mut paused);
            for _ in 0..idle {
                tick(&mut paused, &fire);
            }
            press_pause(&mut paused);

            prop_assert_eq!(paused.phase, straight.phase);
            prop_assert_eq!(paused.frame, straight.frame);
            prop_assert_eq!(paused.score, straight.score);
            prop_assert_eq!(paused.player.pos, straight.player.pos);
            prop_assert_eq!(paused.player.shoot_cooldown, straight.player.shoot_cooldown);
            prop_assert_eq!(paused.bullets.len(), straight.bullets.len());
            prop_assert_eq!(paused.spawner.clone(), straight.spawner.clone());
            prop_assert_eq!(&paused.combo, &straight.combo);
        }
    }
}
