//! The per-frame update pipeline.
//!
//! [`FrameUpdater`] runs once per display refresh. For every particle it reads
//! the target from the active point cloud and pushes it through a fixed chain
//! of transforms before easing the particle toward it:
//!
//! 1. read the target sample
//! 2. transition scatter (`intensity × warp_magnitude`)
//! 3. expansion from the active control signal
//! 4. distance-dependent vortex about the Y axis
//! 5. per-axis fluid noise with a per-particle phase
//! 6. audio shockwave jitter on strong bass
//! 7. exponential integration toward the transformed target
//! 8. trail shift
//! 9. per-vertex color with quadratic trail fade
//!
//! Each step works on the output of the previous one. The signal-derived
//! scalars of steps 3-7 are the same for every particle in a frame and are
//! computed once up front as [`FrameParams`].

use std::f32::consts::TAU;

use glam::Mat3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::animation::{AnimationState, Transition};
use crate::config::MorphConfig;
use crate::signal::{ControlMode, FrameInput};
use crate::{PointCloud, Vec3};

/// Integration rate bounds; keeps the smoothing strictly inside `(0, 1)`.
const LERP_MIN: f32 = 1e-3;
const LERP_MAX: f32 = 0.95;

/// Outcome of one [`FrameUpdater::update`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Every particle was transformed and integrated.
    Updated,
    /// The target was missing or the wrong length; particles held position.
    Skipped,
}

/// Signal-derived scalars shared by every particle in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameParams {
    /// Scatter half-range from the transition.
    pub scatter: f32,
    /// Expansion multiplier including the pulse/kick term.
    pub expansion: f32,
    /// Vortex strength.
    pub vortex: f32,
    /// Fluid-noise amplitude.
    pub noise: f32,
    /// Shockwave jitter half-range, zero outside audio mode.
    pub shock: f32,
    /// Integration rate.
    pub lerp: f32,
    /// Color brightness multiplier.
    pub brightness: f32,
}

impl FrameParams {
    /// Evaluate the mode branch for this frame.
    ///
    /// `smoothed_expansion` is the eased signal-driven base the pulse term is
    /// added to; [`target_expansion`](Self::target_expansion) gives the value it
    /// eases toward.
    pub fn compute(
        config: &MorphConfig,
        input: &FrameInput,
        smoothed_expansion: f32,
        intensity: f32,
        time: f32,
    ) -> Self {
        let audio = input.audio.clamped();
        let color = &config.color;
        let brightness = 1.0 + audio.bass * color.bass_weight + audio.high * color.high_weight;
        let scatter = intensity * config.transition.warp_magnitude;
        let boost = intensity * config.transition.lerp_boost;

        match input.mode {
            ControlMode::Gesture => {
                let g = &config.gesture;
                let o = input.gesture.openness();
                let pulse = (time * TAU * (g.pulse_base_hz + o * g.pulse_hz_per_openness)).sin() * o * g.pulse_gain;
                Self {
                    scatter,
                    expansion: smoothed_expansion + pulse,
                    vortex: g.vortex_base + o * g.vortex_gain,
                    noise: g.noise_base + o * g.noise_gain,
                    shock: 0.0,
                    lerp: (g.lerp_base + o * g.lerp_gain + boost).clamp(LERP_MIN, LERP_MAX),
                    brightness,
                }
            }
            ControlMode::Audio => {
                let a = &config.audio;
                let kick = (time * TAU * a.kick_hz).sin() * audio.bass * a.kick_gain;
                let shock = if audio.bass > a.shock_threshold {
                    audio.bass * a.shock_gain
                } else {
                    0.0
                };
                Self {
                    scatter,
                    expansion: smoothed_expansion + kick,
                    vortex: a.vortex_base + audio.high * a.vortex_gain,
                    noise: a.noise_base + audio.high * a.noise_gain,
                    shock,
                    lerp: (a.lerp_base + audio.bass * a.lerp_gain + boost).clamp(LERP_MIN, LERP_MAX),
                    brightness,
                }
            }
        }
    }

    /// The value the smoothed expansion base eases toward.
    ///
    /// Gesture mode: `1 + openness^1.5 × gain + bass × ambient`.
    /// Audio mode: `1 + bass × bass_expansion`. Gesture input is ignored.
    pub fn target_expansion(config: &MorphConfig, input: &FrameInput) -> f32 {
        let audio = input.audio.clamped();
        match input.mode {
            ControlMode::Gesture => {
                let g = &config.gesture;
                let o = input.gesture.openness();
                1.0 + o.powf(1.5) * g.expansion_gain + audio.bass * g.ambient_bass_gain
            }
            ControlMode::Audio => 1.0 + audio.bass * config.audio.bass_expansion,
        }
    }
}

/// Borrowed view of the buffers handed to a renderer each frame.
///
/// Both slices hold `3 × count × trail_depth` floats, `trail_depth` groups per
/// particle, newest first.
#[derive(Clone, Copy, Debug)]
pub struct FrameBuffers<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub count: usize,
    pub trail_depth: usize,
}

impl FrameBuffers<'_> {
    /// Number of vertices (`count × trail_depth`).
    pub fn vertex_count(&self) -> usize {
        self.count * self.trail_depth
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colors)
    }
}

/// Owner and sole writer of the [`AnimationState`].
pub struct FrameUpdater {
    config: MorphConfig,
    state: AnimationState,
    colors: Vec<f32>,
    base_color: Vec3,
    rng: SmallRng,
    last: FrameParams,
    mismatch_reported: bool,
}

impl FrameUpdater {
    /// Create an updater for `config.particle_count` particles.
    pub fn new(config: MorphConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Create an updater with deterministic initial scatter, phases and jitter.
    pub fn with_seed(config: MorphConfig, seed: u64) -> Self {
        let transition = Transition::from_config(&config.transition);
        let state = AnimationState::new(config.particle_count, config.trail_depth, transition, seed);
        Self::from_state(config, state, seed)
    }

    /// Create an updater whose particles start exactly on `initial`.
    pub fn starting_at(config: MorphConfig, initial: &PointCloud, seed: u64) -> Self {
        let transition = Transition::from_config(&config.transition);
        let state = AnimationState::from_cloud(initial, config.trail_depth, transition, seed);
        Self::from_state(config, state, seed)
    }

    fn from_state(config: MorphConfig, state: AnimationState, seed: u64) -> Self {
        let base_color = config.base_color();
        let mut updater = Self {
            colors: vec![0.0; state.trail().len()],
            config,
            state,
            base_color,
            rng: SmallRng::seed_from_u64(seed.wrapping_add(0x9e37_79b9)),
            last: FrameParams::default(),
            mismatch_reported: false,
        };
        updater.recolor(1.0);
        updater
    }

    #[inline]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.state.count()
    }

    /// Parameters evaluated by the last updated frame.
    #[inline]
    pub fn last_params(&self) -> &FrameParams {
        &self.last
    }

    /// Start the explode-then-settle transition.
    pub fn begin_transition(&mut self) {
        self.state.transition_mut().trigger();
    }

    pub fn set_base_color(&mut self, color: Vec3) {
        self.base_color = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    pub fn base_color(&self) -> Vec3 {
        self.base_color
    }

    pub fn buffers(&self) -> FrameBuffers<'_> {
        FrameBuffers {
            positions: self.state.trail(),
            colors: &self.colors,
            count: self.state.count(),
            trail_depth: self.state.trail_depth(),
        }
    }

    /// Run one frame toward `target`.
    ///
    /// `time` is elapsed seconds. A missing target or one whose length does not
    /// match the particle count skips the transform: particles hold position and
    /// the mismatch is logged once until a valid frame runs again. The transition
    /// decays either way.
    pub fn update(&mut self, target: Option<&PointCloud>, input: &FrameInput, time: f32) -> FrameStatus {
        let count = self.state.count();
        let target = match target {
            Some(t) if t.len() == count => t,
            other => {
                if !self.mismatch_reported {
                    tracing::warn!(
                        expected = count,
                        actual = other.map(PointCloud::len),
                        "target buffer mismatch, holding particle positions"
                    );
                    self.mismatch_reported = true;
                }
                self.state.transition_mut().step();
                return FrameStatus::Skipped;
            }
        };
        self.mismatch_reported = false;

        let intensity = self.state.transition().intensity();
        let base = self.state.ease_expansion(
            FrameParams::target_expansion(&self.config, input),
            self.config.motion.expansion_smoothing,
        );
        let params = FrameParams::compute(&self.config, input, base, intensity, time);

        for i in 0..count {
            let mut t = target.point(i);
            t = self.displace(t, params.scatter);
            t *= params.expansion;
            t = self.vortex(t, params.vortex, time);
            t = self.fluid_noise(t, params.noise, self.state.phase(i), time);
            t = self.displace(t, params.shock);

            let p = self.state.position(i);
            let next = p + (t - p) * params.lerp;
            // A single non-finite coordinate would poison the smoothing forever.
            let next = if next.is_finite() { next } else { p };

            self.state.set_position(i, next);
            self.state.push_trail(i, next);
        }

        self.recolor(params.brightness);
        self.state.transition_mut().step();
        self.last = params;
        FrameStatus::Updated
    }

    // ========================================================================
    // Transform steps
    // ========================================================================

    fn displace(&mut self, p: Vec3, amount: f32) -> Vec3 {
        if !(amount > 0.0 && amount.is_finite()) {
            return p;
        }
        let mut signed = || (self.rng.gen::<f32>() * 2.0 - 1.0) * amount;
        p + Vec3::new(signed(), signed(), signed())
    }

    fn vortex(&self, p: Vec3, strength: f32, time: f32) -> Vec3 {
        let m = &self.config.motion;
        let dist = (p.x * p.x + p.z * p.z).sqrt();
        let angle = strength * (time * m.spin_rate + m.twist / (dist + m.vortex_epsilon));
        Mat3::from_rotation_y(angle) * p
    }

    fn fluid_noise(&self, p: Vec3, amplitude: f32, phase: f32, time: f32) -> Vec3 {
        let f = self.config.motion.noise_frequency;
        Vec3::new(
            p.x + (time * f + p.y * 0.5 + phase).sin() * amplitude,
            p.y + (time * f * 0.8 + p.z * 0.5 + phase).cos() * amplitude,
            p.z + (time * f * 1.2 + p.x * 0.5 + phase).sin() * amplitude,
        )
    }

    fn recolor(&mut self, brightness: f32) {
        let c = &self.config.color;
        let depth = self.state.trail_depth();
        let radius = c.gradient_radius.max(f32::EPSILON);
        let trail = self.state.trail();

        for (slot_index, (pos, col)) in trail.chunks_exact(3).zip(self.colors.chunks_exact_mut(3)).enumerate() {
            let slot = slot_index % depth;
            let q = Vec3::new(pos[0], pos[1], pos[2]);
            let gradient = (q / radius * 0.5 + 0.5).clamp(Vec3::ZERO, Vec3::ONE);
            let fade = (depth - slot) as f32 / depth as f32;
            let rgb = (self.base_color.lerp(gradient, c.gradient_mix) * brightness * fade * fade)
                .clamp(Vec3::ZERO, Vec3::ONE);
            col.copy_from_slice(&rgb.to_array());
        }
    }
}
