//! Game modes and the time-attack objective tracker

use serde::{Deserialize, Serialize};

use crate::consts::{FPS, secs_to_frames};

/// Bonus for meeting every objective (awarded once)
pub const COMPLETION_BONUS: u64 = 2000;
/// Bonus per objective met when the clock runs out
pub const EXPIRY_BONUS_PER_OBJECTIVE: u64 = 1000;
/// Default round length
pub const DEFAULT_DURATION_SECS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Normal,
    TimeAttack,
}

impl GameMode {
    pub fn toggled(self) -> Self {
        match self {
            GameMode::Normal => GameMode::TimeAttack,
            GameMode::TimeAttack => GameMode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::TimeAttack => "Time Attack",
        }
    }
}

/// Time-attack targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objectives {
    pub score: u64,
    pub combo: u32,
    pub meteors: u32,
}

impl Default for Objectives {
    fn default() -> Self {
        Self {
            score: 5000,
            combo: 10,
            meteors: 5,
        }
    }
}

/// Session numbers the objectives are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub score: u64,
    pub max_combo: u32,
    pub meteors_destroyed: u32,
}

impl Objectives {
    /// Met flags for (score, combo, meteors)
    pub fn status(&self, progress: &Progress) -> [bool; 3] {
        [
            progress.score >= self.score,
            progress.max_combo >= self.combo,
            progress.meteors_destroyed >= self.meteors,
        ]
    }

    pub fn completed_count(&self, progress: &Progress) -> u32 {
        self.status(progress).iter().filter(|met| **met).count() as u32
    }
}

/// Bonuses produced by one time-attack frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeAttackAward {
    pub completion_bonus: u64,
    pub expiry_bonus: u64,
    /// Clock ran out this frame
    pub expired: bool,
}

impl TimeAttackAward {
    pub fn total(&self) -> u64 {
        self.completion_bonus + self.expiry_bonus
    }
}

/// Time-attack clock and one-shot bonus bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAttack {
    pub elapsed_frames: u32,
    pub duration_frames: u32,
    pub objectives: Objectives,
    pub completion_awarded: bool,
    pub expired: bool,
}

impl Default for TimeAttack {
    fn default() -> Self {
        Self::new(secs_to_frames(DEFAULT_DURATION_SECS), Objectives::default())
    }
}

impl TimeAttack {
    pub fn new(duration_frames: u32, objectives: Objectives) -> Self {
        Self {
            elapsed_frames: 0,
            duration_frames,
            objectives,
            completion_awarded: false,
            expired: false,
        }
    }

    /// Advance the clock by one frame.
    ///
    /// Objectives are judged once against `progress` (pre-bonus). The
    /// completion bonus is paid at most once; on the expiring frame it is
    /// paid before the per-objective expiry bonus.
    pub fn advance(&mut self, progress: Progress) -> TimeAttackAward {
        let mut award = TimeAttackAward::default();
        if self.expired {
            return award;
        }

        self.elapsed_frames += 1;
        let completed = self.objectives.completed_count(&progress);

        if !self.completion_awarded && completed == 3 {
            self.completion_awarded = true;
            award.completion_bonus = COMPLETION_BONUS;
        }

        if self.elapsed_frames >= self.duration_frames {
            self.expired = true;
            award.expired = true;
            award.expiry_bonus = completed as u64 * EXPIRY_BONUS_PER_OBJECTIVE;
        }

        award
    }

    /// Whole seconds left on the clock
    pub fn seconds_left(&self) -> u32 {
        (self.duration_frames / FPS).saturating_sub(self.elapsed_frames / FPS)
    }
}
