//! Frame driver
//!
//! Turns wall-clock frame deltas into fixed simulation ticks and feeds the
//! presentation sinks with the results.

use crate::consts::{FRAME_MS, MAX_FRAME_MS, MAX_SUBSTEPS};
use crate::error::Result;
use crate::sim::{GameEvent, GameState, TickInput, UpgradeKind, tick};
use crate::sinks::{RenderFrame, RenderSink, SoundSink, UiSink, UiSnapshot, sound_for};

/// Game instance holding the session and its sinks
pub struct Game<R, S, U> {
    state: GameState,
    accumulator: f32,
    /// Pending intents, consumed by the next tick
    input: TickInput,
    last_ui: Option<UiSnapshot>,
    render: R,
    sound: S,
    ui: U,
}

impl<R: RenderSink, S: SoundSink, U: UiSink> Game<R, S, U> {
    pub fn new(state: GameState, render: R, sound: S, ui: U) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput::default(),
            last_ui: None,
            render,
            sound,
            ui,
        }
    }

    /// Run one display frame. Returns the number of simulation ticks taken.
    pub fn frame(&mut self, dt_ms: f32, input: &TickInput) -> u32 {
        let dt = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.input.latch(input);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= FRAME_MS;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_edges();
            self.dispatch_events();
        }
        if substeps == MAX_SUBSTEPS {
            log::debug!("Dropping {:.1} ms of backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        self.render.render(&RenderFrame::capture(&self.state));
        self.publish_ui();
        substeps
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(sound) = sound_for(&event) {
                self.sound.play(sound);
            }
            match event {
                GameEvent::GameOver { score } => self.ui.game_over(score),
                GameEvent::PlayerDamaged { lives } => log::debug!("Player hit, {} lives left", lives),
                _ => log::trace!("{:?}", event),
            }
        }
    }

    fn publish_ui(&mut self) {
        let snapshot = UiSnapshot::capture(&self.state);
        if self.last_ui != Some(snapshot) {
            self.ui.update(&snapshot);
            self.last_ui = Some(snapshot);
        }
    }

    /// Spend an upgrade point between waves
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<u32> {
        let level = self.state.purchase_upgrade(kind)?;
        Ok(level)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn render_sink(&self) -> &R {
        &self.render
    }

    pub fn sound_sink(&self) -> &S {
        &self.sound
    }

    pub fn ui_sink(&self) -> &U {
        &self.ui
    }
}
