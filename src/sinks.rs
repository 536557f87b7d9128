//! Presentation interfaces
//!
//! The simulation never draws, plays or prints anything itself. After each
//! frame the runner hands these sinks the data they need:
//! - `RenderSink` gets every live sprite plus HUD overlays
//! - `SoundSink` gets discrete sound cues
//! - `UiSink` gets the scoreboard values and the final score

use serde::Serialize;

use crate::sim::{GameEvent, GameMode, GamePhase, GameState, Objectives, Progress, Sprite};

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEvent {
    Shoot,
    Explosion,
    EnemyHit,
    PowerUp,
}

/// Which cue, if any, a game event plays
pub fn sound_for(event: &GameEvent) -> Option<SoundEvent> {
    match event {
        GameEvent::Shot => Some(SoundEvent::Shoot),
        GameEvent::EnemyHit => Some(SoundEvent::EnemyHit),
        GameEvent::PowerUpCollected(_) => Some(SoundEvent::PowerUp),
        GameEvent::PlayerDamaged { .. } => Some(SoundEvent::Explosion),
        _ => None,
    }
}

/// Combo banner and decay bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComboHud {
    pub count: u32,
    pub multiplier: f64,
    /// Remaining decay window, 0-1
    pub timer_ratio: f32,
}

/// Countdown and objective checklist
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeAttackHud {
    pub seconds_left: u32,
    pub objectives: Objectives,
    pub progress: Progress,
    /// Met flags for score, combo and meteors
    pub met: [bool; 3],
    pub all_completed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Hud {
    /// Shown while the streak is above one
    pub combo: Option<ComboHud>,
    /// Shown in time attack mode
    pub time_attack: Option<TimeAttackHud>,
}

/// Everything drawn for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderFrame {
    pub phase: Option<GamePhase>,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

impl RenderFrame {
    /// Describe the current state. Entities are only drawn while playing or
    /// paused.
    pub fn capture(state: &GameState) -> Self {
        let mut frame = RenderFrame {
            phase: Some(state.phase),
            ..Default::default()
        };
        if !matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
            return frame;
        }

        let sprites = &mut frame.sprites;
        sprites.push(state.player.describe());
        sprites.extend(state.bullets.iter().map(|b| b.describe()));
        sprites.extend(state.enemy_bullets.iter().map(|b| b.describe()));
        sprites.extend(state.invaders.iter().map(|i| i.describe()));
        sprites.extend(state.meteors.iter().map(|m| m.describe()));
        if let Some(boss) = &state.boss {
            sprites.push(boss.describe());
            sprites.extend(boss.bullets.iter().map(|b| b.describe()));
        }
        sprites.extend(state.particles.iter().map(|p| p.describe()));
        sprites.extend(state.power_ups.iter().map(|p| p.describe()));

        if state.combo.count > 1 {
            frame.hud.combo = Some(ComboHud {
                count: state.combo.count,
                multiplier: state.combo.multiplier(),
                timer_ratio: state.combo.timer_ratio(),
            });
        }

        if state.mode == GameMode::TimeAttack {
            let progress = state.progress();
            let objectives = state.time_attack.objectives;
            frame.hud.time_attack = Some(TimeAttackHud {
                seconds_left: state.time_attack.seconds_left(),
                objectives,
                progress,
                met: objectives.status(&progress),
                all_completed: state.time_attack.completion_awarded,
            });
        }

        frame
    }
}

/// Scoreboard values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UiSnapshot {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub mode: GameMode,
}

impl UiSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
            level: state.level,
            mode: state.mode,
        }
    }
}

pub trait RenderSink {
    fn render(&mut self, frame: &RenderFrame);
}

pub trait SoundSink {
    fn play(&mut self, sound: SoundEvent);
}

pub trait UiSink {
    fn update(&mut self, ui: &UiSnapshot);
    fn game_over(&mut self, final_score: u64);
}

/// Discards everything (headless runs and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _frame: &RenderFrame) {}
}

impl SoundSink for NullSink {
    fn play(&mut self, _sound: SoundEvent) {}
}

impl UiSink for NullSink {
    fn update(&mut self, _ui: &UiSnapshot) {}
    fn game_over(&mut self, _final_score: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PowerUpKind, SpriteKind};

    #[test]
    fn test_nothing_drawn_on_title_screen() {
        let state = GameState::new(1);
        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.phase, Some(GamePhase::Start));
        assert!(frame.sprites.is_empty());
    }

    #[test]
    fn test_draw_order() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Paused;
        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.sprites.len(), 51);
        assert!(matches!(frame.sprites[0].kind, SpriteKind::Player { .. }));
        assert!(matches!(frame.sprites[1].kind, SpriteKind::Invader(_)));
        assert!(frame.hud.combo.is_none());
        assert!(frame.hud.time_attack.is_none());
    }

    #[test]
    fn test_combo_hud_above_one() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Playing;
        state.combo.add();
        assert!(RenderFrame::capture(&state).hud.combo.is_none());
        state.combo.add();
        let combo = RenderFrame::capture(&state).hud.combo.unwrap();
        assert_eq!(combo.count, 2);
        assert!((combo.multiplier - 1.2).abs() < 1e-9);
        assert_eq!(combo.timer_ratio, 1.0);
    }

    #[test]
    fn test_time_attack_hud() {
        let mut state = GameState::new(1);
        state.toggle_mode();
        state.phase = GamePhase::Playing;
        state.meteors_destroyed = 5;
        let hud = RenderFrame::capture(&state).hud.time_attack.unwrap();
        assert_eq!(hud.seconds_left, 120);
        assert_eq!(hud.met, [false, false, true]);
        assert!(!hud.all_completed);
    }

    #[test]
    fn test_sound_mapping() {
        assert_eq!(sound_for(&GameEvent::Shot), Some(SoundEvent::Shoot));
        assert_eq!(
            sound_for(&GameEvent::PowerUpCollected(PowerUpKind::Shield)),
            Some(SoundEvent::PowerUp)
        );
        assert_eq!(
            sound_for(&GameEvent::PlayerDamaged { lives: 2 }),
            Some(SoundEvent::Explosion)
        );
        assert_eq!(sound_for(&GameEvent::ShieldAbsorbed), None);
        assert_eq!(sound_for(&GameEvent::BossDefeated), None);
    }
}
