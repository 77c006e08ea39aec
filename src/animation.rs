//! Per-particle animation state.
//!
//! [`AnimationState`] owns the current positions, the trailing history ring,
//! the per-particle noise phases and the shape-change [`Transition`]. It is
//! created once per scene and only ever nudged, never reset; the
//! [`FrameUpdater`](crate::frame::FrameUpdater) is its sole writer.
//!
//! # Buffer layout
//!
//! The trail is one flat arena of `3 × N × trail_depth` floats, particle-major:
//! particle `i`, slot `s` starts at `(i × trail_depth + s) × 3`. Slot 0 is the
//! newest position, slot `trail_depth - 1` the oldest.

use crate::config::TransitionConfig;
use crate::sample::SampleContext;
use crate::{PointCloud, Vec3};

/// Radius of the cloud particles start in before any shape is applied.
const INITIAL_SCATTER: f32 = 3.0;

/// Decaying warp intensity driving the explode-then-settle effect.
///
/// Triggering sets the intensity to 1; every [`step`](Transition::step)
/// multiplies it by `decay` and snaps it to 0 once it drops below `cutoff`.
/// "Transitioning" is simply `intensity > 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    intensity: f32,
    decay: f32,
    cutoff: f32,
}

impl Transition {
    pub fn new(decay: f32, cutoff: f32) -> Self {
        Self {
            intensity: 0.0,
            decay,
            cutoff,
        }
    }

    pub fn from_config(config: &TransitionConfig) -> Self {
        Self::new(config.decay, config.cutoff)
    }

    /// Start (or restart) a transition at full intensity.
    pub fn trigger(&mut self) {
        self.intensity = 1.0;
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        if self.intensity > 0.0 {
            self.intensity *= self.decay;
            if self.intensity < self.cutoff {
                self.intensity = 0.0;
            }
        }
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.intensity > 0.0
    }
}

/// Positions, trail history, phases and transition for one particle system.
#[derive(Clone, Debug)]
pub struct AnimationState {
    count: usize,
    trail_depth: usize,
    positions: Vec<f32>,
    trail: Vec<f32>,
    phases: Vec<f32>,
    transition: Transition,
    expansion: f32,
}

impl AnimationState {
    /// Create state for `count` particles scattered in a sphere.
    ///
    /// `trail_depth` is clamped to at least 1.
    pub fn new(count: usize, trail_depth: usize, transition: Transition, seed: u64) -> Self {
        let mut ctx = SampleContext::with_seed(count, seed);
        let initial = PointCloud::from_points((0..count).map(|_| ctx.random_in_sphere(INITIAL_SCATTER)));
        let phases = (0..count).map(|_| ctx.random_angle()).collect();
        Self::build(initial, phases, trail_depth, transition)
    }

    /// Create state whose particles start exactly on `initial`.
    pub fn from_cloud(initial: &PointCloud, trail_depth: usize, transition: Transition, seed: u64) -> Self {
        let mut ctx = SampleContext::with_seed(initial.len(), seed);
        let phases = (0..initial.len()).map(|_| ctx.random_angle()).collect();
        Self::build(initial.clone(), phases, trail_depth, transition)
    }

    fn build(initial: PointCloud, phases: Vec<f32>, trail_depth: usize, transition: Transition) -> Self {
        let count = initial.len();
        let trail_depth = trail_depth.max(1);
        let positions = initial.into_inner();

        let mut trail = Vec::with_capacity(positions.len() * trail_depth);
        for p in positions.chunks_exact(3) {
            for _ in 0..trail_depth {
                trail.extend_from_slice(p);
            }
        }

        Self {
            count,
            trail_depth,
            positions,
            trail,
            phases,
            transition,
            expansion: 1.0,
        }
    }

    /// Number of particles (N).
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn trail_depth(&self) -> usize {
        self.trail_depth
    }

    /// Current position of particle `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        let o = i * 3;
        Vec3::new(self.positions[o], self.positions[o + 1], self.positions[o + 2])
    }

    /// Current positions, `3 × N`.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Trail history, `3 × N × trail_depth`, newest slot first per particle.
    #[inline]
    pub fn trail(&self) -> &[f32] {
        &self.trail
    }

    /// Trail slot `slot` of particle `i`.
    #[inline]
    pub fn trail_position(&self, i: usize, slot: usize) -> Vec3 {
        let o = (i * self.trail_depth + slot) * 3;
        Vec3::new(self.trail[o], self.trail[o + 1], self.trail[o + 2])
    }

    /// Fixed noise phase of particle `i`.
    #[inline]
    pub fn phase(&self, i: usize) -> f32 {
        self.phases[i]
    }

    #[inline]
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Smoothed, signal-driven expansion factor (without pulse terms).
    #[inline]
    pub fn expansion(&self) -> f32 {
        self.expansion
    }

    pub(crate) fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    /// Ease the expansion factor a fraction `alpha` toward `target`.
    pub(crate) fn ease_expansion(&mut self, target: f32, alpha: f32) -> f32 {
        if target.is_finite() {
            self.expansion += (target - self.expansion) * alpha;
        }
        self.expansion
    }

    #[inline]
    pub(crate) fn set_position(&mut self, i: usize, p: Vec3) {
        let o = i * 3;
        self.positions[o] = p.x;
        self.positions[o + 1] = p.y;
        self.positions[o + 2] = p.z;
    }

    /// Shift particle `i`'s trail back one slot and store `p` at the head.
    pub(crate) fn push_trail(&mut self, i: usize, p: Vec3) {
        let stride = self.trail_depth * 3;
        let ring = &mut self.trail[i * stride..(i + 1) * stride];
        ring.copy_within(0..stride - 3, 3);
        ring[0] = p.x;
        ring[1] = p.y;
        ring[2] = p.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_decays_geometrically() {
        let mut t = Transition::new(0.92, 0.01);
        assert!(!t.is_active());
        t.trigger();
        for k in 1..=20 {
            t.step();
            assert!((t.intensity() - 0.92f32.powi(k)).abs() < 1e-5, "frame {k}");
        }
    }

    #[test]
    fn test_transition_snaps_to_zero() {
        let mut t = Transition::new(0.92, 0.01);
        t.trigger();
        let mut frames = 0;
        while t.is_active() {
            t.step();
            frames += 1;
        }
        // 0.92^55 ≈ 0.0102, 0.92^56 ≈ 0.0094
        assert_eq!(frames, 56);
        assert_eq!(t.intensity(), 0.0);
    }

    #[test]
    fn test_retrigger_restarts_at_one() {
        let mut t = Transition::new(0.92, 0.01);
        t.trigger();
        t.step();
        t.trigger();
        assert_eq!(t.intensity(), 1.0);
    }

    #[test]
    fn test_buffers_sized_consistently() {
        let state = AnimationState::new(100, 5, Transition::new(0.92, 0.01), 1);
        assert_eq!(state.count(), 100);
        assert_eq!(state.positions().len(), 300);
        assert_eq!(state.trail().len(), 1500);
        assert_eq!(state.trail_position(7, 4), state.position(7));
    }

    #[test]
    fn test_push_trail_shifts_history() {
        let cloud = PointCloud::from_points([Vec3::ZERO, Vec3::ONE]);
        let mut state = AnimationState::from_cloud(&cloud, 3, Transition::new(0.92, 0.01), 1);

        state.push_trail(0, Vec3::X);
        state.push_trail(0, Vec3::Y);

        assert_eq!(state.trail_position(0, 0), Vec3::Y);
        assert_eq!(state.trail_position(0, 1), Vec3::X);
        assert_eq!(state.trail_position(0, 2), Vec3::ZERO);
        // neighbours untouched
        assert_eq!(state.trail_position(1, 0), Vec3::ONE);
    }

    #[test]
    fn test_phases_are_stable_and_varied() {
        let state = AnimationState::new(64, 1, Transition::new(0.92, 0.01), 9);
        let first = state.phase(0);
        assert!((0.0..std::f32::consts::TAU).contains(&first));
        assert!((1..64).any(|i| (state.phase(i) - first).abs() > 1e-3));
    }
}
