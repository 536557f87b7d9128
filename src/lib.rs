//! Invader Storm - A space invaders arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, scoring, game state)
//! - `sinks`: Presentation interfaces (render, sound, UI)
//! - `audio`: Sound sink with volume control and graceful fallback
//! - `runner`: Fixed timestep frame driver that feeds the sinks
//! - `autopilot`: Demo mode AI
//! - `settings`: JSON-backed configuration

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod sinks;

pub use error::Error;
pub use runner::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (frames per second)
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const FRAME_MS: f32 = 1000.0 / FPS as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock delta accepted per frame (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Longest duration `secs_to_frames` represents exactly
    pub const MAX_DURATION_SECS: u32 = u32::MAX / FPS;

    /// Convert a duration in seconds to fixed-timestep frames (saturating)
    #[inline]
    pub const fn secs_to_frames(secs: u32) -> u32 {
        secs.saturating_mul(FPS)
    }
}
