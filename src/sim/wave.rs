//! Invader waves
//!
//! A wave is a 5x10 grid. All invaders share one horizontal direction and
//! speed; when any of them reaches the edge it is heading for, the whole
//! formation turns around and drops one step.

use serde::{Deserialize, Serialize};

use super::entities::{INVADER_SIZE, Invader, InvaderKind};

pub const WAVE_ROWS: usize = 5;
pub const WAVE_COLS: usize = 10;
pub const WAVE_SPACING: f32 = 60.0;
pub const WAVE_START_Y: f32 = 80.0;
/// Vertical drop on each edge bounce
pub const WAVE_DROP: f32 = 20.0;
pub const BASE_INVADER_SPEED: f32 = 1.0;
/// Speed added per level
pub const INVADER_SPEED_STEP: f32 = 0.5;

/// Build a fresh wave centred on the canvas
pub fn generate_wave(canvas_width: f32) -> Vec<Invader> {
    let start_x = (canvas_width - (WAVE_COLS - 1) as f32 * WAVE_SPACING) / 2.0;
    let mut invaders = Vec::with_capacity(WAVE_ROWS * WAVE_COLS);
    for row in 0..WAVE_ROWS {
        for col in 0..WAVE_COLS {
            invaders.push(Invader::new(
                start_x + col as f32 * WAVE_SPACING,
                WAVE_START_Y + row as f32 * WAVE_SPACING,
                InvaderKind::for_row(row),
            ));
        }
    }
    invaders
}

/// Shared movement state for the current wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    /// +1 right, -1 left
    pub direction: f32,
    /// Pixels per frame
    pub speed: f32,
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            direction: 1.0,
            speed: BASE_INVADER_SPEED,
        }
    }
}

impl Formation {
    /// Bounce off the edges if needed, then move and animate every invader
    pub fn advance(&mut self, invaders: &mut [Invader], canvas_width: f32) {
        let right_edge = canvas_width - INVADER_SIZE.x;
        let at_edge = invaders.iter().any(|inv| {
            (inv.pos.x <= 0.0 && self.direction < 0.0)
                || (inv.pos.x >= right_edge && self.direction > 0.0)
        });

        if at_edge {
            self.direction = -self.direction;
            for invader in invaders.iter_mut() {
                invader.pos.y += WAVE_DROP;
            }
        }

        for invader in invaders.iter_mut() {
            invader.pos.x += self.direction * self.speed;
            invader.advance();
        }
    }

    pub fn speed_up(&mut self) {
        self.speed += INVADER_SPEED_STEP;
    }
}
