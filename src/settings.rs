//! Game settings
//!
//! Stored as JSON. Missing fields fall back to their defaults, so an empty
//! object is a valid settings file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, MAX_DURATION_SECS, secs_to_frames};
use crate::error::{Error, Result};
use crate::sim::{GameMode, Objectives, Rules};
use crate::sim::state::STARTING_LIVES;
use crate::sim::time_attack::DEFAULT_DURATION_SECS;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; random when unset
    pub seed: Option<u64>,

    // === Arena ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub starting_lives: u32,

    // === Modes ===
    /// Mode selected on the title screen
    pub mode: GameMode,
    pub time_attack_secs: u32,
    pub objective_score: u64,
    pub objective_combo: u32,
    pub objective_meteors: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let objectives = Objectives::default();
        Self {
            seed: None,

            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            starting_lives: STARTING_LIVES,

            mode: GameMode::Normal,
            time_attack_secs: DEFAULT_DURATION_SECS,
            objective_score: objectives.score,
            objective_combo: objectives.combo,
            objective_meteors: objectives.meteors,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Simulation rules described by these settings
    pub fn rules(&self) -> Rules {
        Rules {
            width: self.canvas_width,
            height: self.canvas_height,
            starting_lives: self.starting_lives,
            time_attack_frames: secs_to_frames(self.time_attack_secs),
            objectives: Objectives {
                score: self.objective_score,
                combo: self.objective_combo,
                meteors: self.objective_meteors,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canvas_width > 0.0 && self.canvas_width.is_finite()) {
            return Err(Error::invalid("canvas_width", "must be positive"));
        }
        if !(self.canvas_height > 0.0 && self.canvas_height.is_finite()) {
            return Err(Error::invalid("canvas_height", "must be positive"));
        }
        if self.starting_lives == 0 {
            return Err(Error::invalid("starting_lives", "must be at least 1"));
        }
        if self.time_attack_secs == 0 {
            return Err(Error::invalid("time_attack_secs", "must be at least 1"));
        }
        if self.time_attack_secs > MAX_DURATION_SECS {
            return Err(Error::invalid(
                "time_attack_secs",
                format!("must be at most {MAX_DURATION_SECS}"),
            ));
        }
        for (name, vol) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&vol) {
                return Err(Error::invalid(name, format!("{vol} is outside 0.0 - 1.0")));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
