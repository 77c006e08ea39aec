//! # morphe - morphing particle clouds
//!
//! A cloud of particles that flows between procedural 3D shapes, driven
//! frame by frame by a hand-gesture signal or by music.
//!
//! The crate is the animation core. It generates target point clouds
//! ([`shapes`]), turns freehand drawings into clouds ([`stroke`]), and runs
//! the per-frame pipeline that eases every particle toward its target while
//! applying expansion, vortex, noise and shockwave effects ([`frame`]). The
//! output is two flat buffers, positions and colors, that any renderer can draw.
//!
//! ## Quick Start
//!
//! ```ignore
//! use morphe::prelude::*;
//!
//! let mut scene = Scene::new(MorphConfig::default())?;
//! scene.set_shape(Shape::Heart);
//!
//! let mut clock = FrameClock::new();
//! loop {
//!     let t = clock.tick();
//!     let input = FrameInput::gesture(GestureSnapshot::new(openness, hand));
//!     scene.frame(&input, t.elapsed);
//!     renderer.draw(scene.buffers());
//! }
//! ```
//!
//! ## Control modes
//!
//! | Mode | Expansion | Vortex / noise | Extras |
//! |------|-----------|----------------|--------|
//! | [`ControlMode::Gesture`] | `1 + openness^1.5 × gain` | openness | openness pulse |
//! | [`ControlMode::Audio`] | `1 + bass × 2.5` | high band | bass kick, shockwave |
//!
//! Switching modes never resets particle state; motion continues from
//! wherever the particles are.
//!
//! ## Features
//!
//! - `viewer`: a winit/wgpu demo window and the `morphe` binary.

pub mod animation;
pub mod cloud;
pub mod config;
pub mod error;
pub mod frame;
pub mod render;
pub mod sample;
pub mod scene;
pub mod shapes;
pub mod signal;
pub mod stroke;
pub mod time;

#[cfg(feature = "viewer")]
pub mod input;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};

pub use animation::{AnimationState, Transition};
pub use cloud::PointCloud;
pub use config::MorphConfig;
pub use error::{ConfigError, StrokeError, UnknownShape};
pub use frame::{FrameBuffers, FrameParams, FrameStatus, FrameUpdater};
pub use sample::SampleContext;
pub use scene::Scene;
pub use shapes::{generate, generate_named, Shape};
pub use signal::{AudioBands, ControlMode, FrameInput, GestureSnapshot};
pub use stroke::{resample, CanvasSize, Drawing, Stroke, StrokePoint};
pub use time::{FrameClock, FrameTime};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use morphe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::MorphConfig;
    pub use crate::frame::{FrameBuffers, FrameStatus, FrameUpdater};
    pub use crate::scene::Scene;
    pub use crate::shapes::Shape;
    pub use crate::signal::{AudioBands, ControlMode, FrameInput, GestureSnapshot};
    pub use crate::stroke::{Drawing, Stroke};
    pub use crate::time::FrameClock;
    pub use crate::PointCloud;
    pub use crate::{Vec2, Vec3, Vec4};
}
