//! Audio system
//!
//! Every cue is a single procedurally generated tone. The manager owns the
//! volume settings and forwards tones to a backend. Without a backend it
//! degrades to a no-op.

use serde::Serialize;

use crate::sinks::{SoundEvent, SoundSink};

/// Peak gain of every tone before volume scaling
pub const TONE_GAIN: f32 = 0.1;
/// Gain the envelope decays to at the end of the tone
pub const TONE_FLOOR: f32 = 0.01;

/// Oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One synthesized tone with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
    /// Starting gain after volume scaling
    pub gain: f32,
    /// Gain the envelope ramps down to
    pub end_gain: f32,
}

/// Tone for a sound cue at unit volume
pub fn tone_for(sound: SoundEvent) -> Tone {
    let (frequency_hz, duration_secs, waveform) = match sound {
        SoundEvent::Shoot => (800.0, 0.1, Waveform::Square),
        SoundEvent::Explosion => (200.0, 0.3, Waveform::Sawtooth),
        SoundEvent::PowerUp => (1200.0, 0.2, Waveform::Sine),
        SoundEvent::EnemyHit => (400.0, 0.15, Waveform::Triangle),
    };
    Tone {
        frequency_hz,
        duration_secs,
        waveform,
        gain: TONE_GAIN,
        end_gain: TONE_FLOOR,
    }
}

/// Something that can actually make noise
pub trait ToneBackend {
    fn play_tone(&mut self, tone: &Tone);
}

/// Logs tones instead of playing them
#[derive(Debug, Clone, Default)]
pub struct LogToneBackend {
    pub played: u64,
}

impl ToneBackend for LogToneBackend {
    fn play_tone(&mut self, tone: &Tone) {
        self.played += 1;
        log::debug!(
            "tone {:?} {:.0} Hz {:.2}s gain {:.3} -> {:.3}",
            tone.waveform,
            tone.frequency_hz,
            tone.duration_secs,
            tone.gain,
            tone.end_gain
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn ToneBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn ToneBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// The tone a cue would produce right now, if any
    pub fn tone(&self, sound: SoundEvent) -> Option<Tone> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return None;
        }
        let mut tone = tone_for(sound);
        tone.gain *= vol;
        Some(tone)
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, sound: SoundEvent) {
        let Some(tone) = self.tone(sound) else {
            return;
        };
        if let Some(backend) = self.backend.as_mut() {
            backend.play_tone(&tone);
        }
    }
}
