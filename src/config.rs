//! Scene configuration.
//!
//! All tuned constants of the animation live here so they can be adjusted
//! without touching the pipeline. Configs serialize to JSON; missing fields
//! take their defaults.
//!
//! ```ignore
//! let config = MorphConfig::load("scene.json")?;
//! let scene = Scene::new(config)?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::Vec3;

/// Largest accepted jitter half-range, in world units.
pub const MAX_JITTER: f32 = 100.0;

/// Shape-change transition tuning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionConfig {
    /// Per-frame multiplier applied to the warp intensity.
    pub decay: f32,
    /// Intensity below which the transition counts as settled.
    pub cutoff: f32,
    /// Scatter half-range at full intensity.
    pub warp_magnitude: f32,
    /// Extra integration rate per unit of intensity.
    pub lerp_boost: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            decay: 0.92,
            cutoff: 0.01,
            warp_magnitude: 3.0,
            lerp_boost: 0.1,
        }
    }
}

/// How the gesture signal maps to motion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureTuning {
    /// Expansion added at full openness (`openness^1.5 × gain`).
    pub expansion_gain: f32,
    /// Ambient bass contribution to expansion.
    pub ambient_bass_gain: f32,
    /// Amplitude of the openness pulse.
    pub pulse_gain: f32,
    /// Pulse frequency at zero openness, in Hz.
    pub pulse_base_hz: f32,
    /// Extra pulse frequency per unit of openness, in Hz.
    pub pulse_hz_per_openness: f32,
    pub vortex_base: f32,
    pub vortex_gain: f32,
    pub noise_base: f32,
    pub noise_gain: f32,
    pub lerp_base: f32,
    pub lerp_gain: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            expansion_gain: 3.2,
            ambient_bass_gain: 0.3,
            pulse_gain: 0.15,
            pulse_base_hz: 1.0,
            pulse_hz_per_openness: 3.0,
            vortex_base: 0.15,
            vortex_gain: 1.2,
            noise_base: 0.02,
            noise_gain: 0.25,
            lerp_base: 0.06,
            lerp_gain: 0.08,
        }
    }
}

/// How the audio bands map to motion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioTuning {
    /// Expansion added at full bass (`1 + bass × gain`).
    pub bass_expansion: f32,
    /// Amplitude of the rhythmic kick, scaled by bass.
    pub kick_gain: f32,
    /// Kick frequency in Hz.
    pub kick_hz: f32,
    pub vortex_base: f32,
    pub vortex_gain: f32,
    pub noise_base: f32,
    pub noise_gain: f32,
    /// Bass level above which the shockwave jitter kicks in.
    pub shock_threshold: f32,
    pub shock_gain: f32,
    pub lerp_base: f32,
    pub lerp_gain: f32,
}

impl Default for AudioTuning {
    fn default() -> Self {
        Self {
            bass_expansion: 2.5,
            kick_gain: 0.25,
            kick_hz: 2.0,
            vortex_base: 0.1,
            vortex_gain: 1.5,
            noise_base: 0.02,
            noise_gain: 0.35,
            shock_threshold: 0.3,
            shock_gain: 0.4,
            lerp_base: 0.08,
            lerp_gain: 0.12,
        }
    }
}

/// Mode-independent motion shaping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionTuning {
    /// Base vortex spin in radians per second.
    pub spin_rate: f32,
    /// Strength of the inverse-distance twist.
    pub twist: f32,
    /// Added to the horizontal distance before dividing by it.
    pub vortex_epsilon: f32,
    /// Temporal frequency of the fluid noise.
    pub noise_frequency: f32,
    /// Easing rate of the expansion factor toward its signal-driven value.
    pub expansion_smoothing: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            spin_rate: 0.2,
            twist: 0.6,
            vortex_epsilon: 0.5,
            noise_frequency: 1.5,
            expansion_smoothing: 0.1,
        }
    }
}

/// Per-vertex color tuning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorTuning {
    /// Blend between base color (0) and positional gradient (1).
    pub gradient_mix: f32,
    /// Radius mapped onto the full gradient range.
    pub gradient_radius: f32,
    pub bass_weight: f32,
    pub high_weight: f32,
}

impl Default for ColorTuning {
    fn default() -> Self {
        Self {
            gradient_mix: 0.35,
            gradient_radius: 4.0,
            bass_weight: 0.6,
            high_weight: 0.4,
        }
    }
}

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MorphConfig {
    pub particle_count: usize,
    /// Number of trail slots per particle, including the current position.
    pub trail_depth: usize,
    /// User-chosen base RGB, 0.0-1.0.
    pub base_color: [f32; 3],
    pub transition: TransitionConfig,
    pub gesture: GestureTuning,
    pub audio: AudioTuning,
    pub motion: MotionTuning,
    pub color: ColorTuning,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            particle_count: 20_000,
            trail_depth: 5,
            base_color: [1.0, 0.35, 0.55],
            transition: TransitionConfig::default(),
            gesture: GestureTuning::default(),
            audio: AudioTuning::default(),
            motion: MotionTuning::default(),
            color: ColorTuning::default(),
        }
    }
}

impl MorphConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn base_color(&self) -> Vec3 {
        Vec3::from_array(self.base_color)
    }

    /// Reject values the frame pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trail_depth == 0 {
            return Err(ConfigError::Invalid("trail_depth must be at least 1".into()));
        }

        let t = &self.transition;
        if !(t.decay > 0.0 && t.decay < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "transition.decay must be in (0, 1), got {}",
                t.decay
            )));
        }
        if !(t.cutoff > 0.0 && t.cutoff < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "transition.cutoff must be in (0, 1), got {}",
                t.cutoff
            )));
        }

        let rates = [
            ("gesture.lerp_base", self.gesture.lerp_base),
            ("audio.lerp_base", self.audio.lerp_base),
            ("motion.expansion_smoothing", self.motion.expansion_smoothing),
        ];
        for (name, rate) in rates {
            if !(rate > 0.0 && rate < 1.0) {
                return Err(ConfigError::Invalid(format!("{name} must be in (0, 1), got {rate}")));
            }
        }

        let jitters = [
            ("transition.warp_magnitude", t.warp_magnitude),
            ("audio.shock_gain", self.audio.shock_gain),
        ];
        for (name, amount) in jitters {
            if !(0.0..=MAX_JITTER).contains(&amount) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in [0, {MAX_JITTER}], got {amount}"
                )));
            }
        }

        if self.motion.vortex_epsilon <= 0.0 {
            return Err(ConfigError::Invalid("motion.vortex_epsilon must be positive".into()));
        }

        if !self.all_finite() {
            return Err(ConfigError::Invalid("config contains a non-finite value".into()));
        }

        Ok(())
    }

    fn all_finite(&self) -> bool {
        let t = &self.transition;
        let g = &self.gesture;
        let a = &self.audio;
        let m = &self.motion;
        let c = &self.color;
        let finite = self
            .base_color
            .iter()
            .chain(&[t.decay, t.cutoff, t.warp_magnitude, t.lerp_boost])
            .chain(&[
                g.expansion_gain,
                g.ambient_bass_gain,
                g.pulse_gain,
                g.pulse_base_hz,
                g.pulse_hz_per_openness,
                g.vortex_base,
                g.vortex_gain,
                g.noise_base,
                g.noise_gain,
                g.lerp_base,
                g.lerp_gain,
            ])
            .chain(&[
                a.bass_expansion,
                a.kick_gain,
                a.kick_hz,
                a.vortex_base,
                a.vortex_gain,
                a.noise_base,
                a.noise_gain,
                a.shock_threshold,
                a.shock_gain,
                a.lerp_base,
                a.lerp_gain,
            ])
            .chain(&[m.spin_rate, m.twist, m.vortex_epsilon, m.noise_frequency, m.expansion_smoothing])
            .chain(&[c.gradient_mix, c.gradient_radius, c.bass_weight, c.high_weight])
            .all(|v| v.is_finite());
        finite
    }
}
