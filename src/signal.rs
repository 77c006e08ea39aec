//! Control signals read once per frame.
//!
//! The gesture tracker and the audio analyzer live outside this crate. They hand
//! over already-smoothed snapshots, and the frame pipeline uses them as-is.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Snapshot from the gesture tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureSnapshot {
    /// Whether the hand currently reads as open.
    pub is_open: bool,
    /// Hand openness, 0 (fist) to 1 (fully open).
    pub value: f32,
    /// Hand position, each axis in `[0, 1]`.
    pub position: Vec2,
}

impl GestureSnapshot {
    pub fn new(value: f32, position: Vec2) -> Self {
        let value = sanitize_unit(value);
        Self {
            is_open: value > 0.5,
            value,
            position: Vec2::new(sanitize_unit(position.x), sanitize_unit(position.y)),
        }
    }

    /// Openness clamped to `[0, 1]`.
    #[inline]
    pub fn openness(&self) -> f32 {
        sanitize_unit(self.value)
    }
}

/// Frequency-band energies from the audio analyzer, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioBands {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl AudioBands {
    pub const SILENT: AudioBands = AudioBands {
        bass: 0.0,
        mid: 0.0,
        high: 0.0,
    };

    pub fn new(bass: f32, mid: f32, high: f32) -> Self {
        Self { bass, mid, high }.clamped()
    }

    /// Copy with every band clamped to `[0, 1]` and NaN treated as silence.
    pub fn clamped(self) -> Self {
        Self {
            bass: sanitize_unit(self.bass),
            mid: sanitize_unit(self.mid),
            high: sanitize_unit(self.high),
        }
    }
}

/// Which signal drives motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Hand gesture drives expansion, vortex and noise.
    #[default]
    Gesture,
    /// Music drives motion; gesture input is ignored for motion.
    Audio,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Gesture => ControlMode::Audio,
            ControlMode::Audio => ControlMode::Gesture,
        }
    }
}

/// Everything the frame pipeline reads from the outside world for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub mode: ControlMode,
    pub gesture: GestureSnapshot,
    pub audio: AudioBands,
}

impl FrameInput {
    pub fn gesture(gesture: GestureSnapshot) -> Self {
        Self {
            mode: ControlMode::Gesture,
            gesture,
            audio: AudioBands::SILENT,
        }
    }

    pub fn audio(audio: AudioBands) -> Self {
        Self {
            mode: ControlMode::Audio,
            gesture: GestureSnapshot::default(),
            audio,
        }
    }

    pub fn with_mode(mut self, mode: ControlMode) -> Self {
        self.mode = mode;
        self
    }
}

#[inline]
fn sanitize_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
