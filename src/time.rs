//! Frame clock.
//!
//! The animation reads a single `time` value per frame (seconds of animated
//! time) for its pulse, kick, spin and noise terms. [`FrameClock`] produces it
//! from wall-clock ticks, honoring pause, time scale and an optional fixed
//! delta. Elapsed time is accumulated from deltas, so pausing simply stops it.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! loop {
//!     let t = clock.tick();
//!     scene.frame(&input, t.elapsed);
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest wall-clock gap counted as one frame; longer stalls are clipped.
const MAX_DELTA: f32 = 0.25;

/// How often the FPS estimate refreshes.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Timing for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Animated seconds since the clock started.
    pub elapsed: f32,
    /// Animated seconds since the previous frame.
    pub delta: f32,
    /// Frames advanced so far (paused ticks do not count).
    pub frame: u64,
}

/// Pausable, scalable animation clock.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    now: FrameTime,
    paused: bool,
    time_scale: f32,
    fixed_delta: Option<f32>,
    fps: f32,
    fps_frames: u32,
    fps_window: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            now: FrameTime::default(),
            paused: false,
            time_scale: 1.0,
            fixed_delta: None,
            fps: 0.0,
            fps_frames: 0,
            fps_window: Duration::ZERO,
        }
    }

    /// Advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let raw = now.duration_since(self.last_tick);
        self.last_tick = now;

        self.fps_frames += 1;
        self.fps_window += raw;
        if self.fps_window >= FPS_WINDOW {
            self.fps = self.fps_frames as f32 / self.fps_window.as_secs_f32();
            self.fps_frames = 0;
            self.fps_window = Duration::ZERO;
        }

        self.advance(raw.as_secs_f32())
    }

    /// Advance by `raw_delta` seconds of wall-clock time.
    ///
    /// Applies the fixed delta (if set) and the time scale. Does nothing
    /// while paused except report a zero delta.
    pub fn advance(&mut self, raw_delta: f32) -> FrameTime {
        if self.paused {
            self.now.delta = 0.0;
            return self.now;
        }

        let raw = if raw_delta.is_finite() {
            raw_delta.clamp(0.0, MAX_DELTA)
        } else {
            0.0
        };
        let delta = self.fixed_delta.unwrap_or(raw) * self.time_scale;

        self.now.delta = delta;
        self.now.elapsed += delta;
        self.now.frame += 1;
        self.now
    }

    #[inline]
    pub fn time(&self) -> FrameTime {
        self.now
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.now.elapsed
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the animation speed multiplier (negative values clamp to 0).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Use a constant delta per frame instead of wall-clock time.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.1);
        let t = clock.advance(0.2);
        assert!((t.elapsed - 0.3).abs() < 1e-6);
        assert!((t.delta - 0.2).abs() < 1e-6);
        assert_eq!(t.frame, 2);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut clock = FrameClock::new();
        clock.advance(0.1);
        clock.toggle_pause();

        let t = clock.advance(0.1);
        assert_eq!(t.delta, 0.0);
        assert!((t.elapsed - 0.1).abs() < 1e-6);
        assert_eq!(t.frame, 1);

        clock.set_paused(false);
        assert_eq!(clock.advance(0.1).frame, 2);
    }

    #[test]
    fn test_fixed_delta_and_scale() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));
        clock.set_time_scale(2.0);

        let t = clock.advance(0.2);
        assert!((t.delta - 2.0 / 60.0).abs() < 1e-6);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
    }

    #[test]
    fn test_stalls_are_clipped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5.0).delta, MAX_DELTA);
        assert_eq!(clock.advance(f32::NAN).delta, 0.0);
    }

    #[test]
    fn test_tick_moves_forward() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let t = clock.tick();
        assert!(t.elapsed > 0.0);
        assert_eq!(t.frame, 1);
    }
}
