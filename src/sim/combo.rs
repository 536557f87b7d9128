//! Combo counter and score multiplier
//!
//! Every kill extends the streak and refreshes a 3 second window. The
//! multiplier grows by 0.1 per streak step up to 3x. Score math is done in
//! tenths so `floor(points * multiplier)` is exact.

use serde::{Deserialize, Serialize};

/// Idle time before the streak expires (ms)
pub const COMBO_WINDOW_MS: f32 = 3000.0;
/// Multiplier at combo 0, in tenths
const BASE_TENTHS: u64 = 10;
/// Multiplier cap, in tenths
const MAX_TENTHS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    /// Current streak
    pub count: u32,
    /// Time left before the streak decays (ms)
    pub timer_ms: f32,
    /// Best streak this session
    pub max: u32,
}

impl Combo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kill
    pub fn add(&mut self) {
        self.count += 1;
        self.timer_ms = COMBO_WINDOW_MS;
        self.max = self.max.max(self.count);
    }

    /// Count down the decay window; the streak drops when it runs out
    pub fn decay(&mut self, dt_ms: f32) {
        if self.timer_ms > 0.0 {
            self.timer_ms -= dt_ms.max(0.0);
            if self.timer_ms <= 0.0 {
                self.timer_ms = 0.0;
                self.count = 0;
            }
        }
    }

    /// Drop the streak immediately (player took damage)
    pub fn reset(&mut self) {
        self.count = 0;
        self.timer_ms = 0.0;
    }

    fn tenths(&self) -> u64 {
        (BASE_TENTHS + self.count as u64).min(MAX_TENTHS)
    }

    /// Current multiplier in [1.0, 3.0]
    pub fn multiplier(&self) -> f64 {
        self.tenths() as f64 / 10.0
    }

    /// `floor(points * multiplier)`
    pub fn scale(&self, points: u64) -> u64 {
        points * self.tenths() / 10
    }

    /// Fraction of the decay window left (HUD timer bar)
    pub fn timer_ratio(&self) -> f32 {
        (self.timer_ms / COMBO_WINDOW_MS).clamp(0.0, 1.0)
    }
}
