//! Scene driver: the state behind one frame loop.
//!
//! A [`Scene`] owns the [`FrameUpdater`], the active [`Shape`] and its target
//! buffer, the user's custom drawing, and any shape regeneration running in
//! the background. Whoever drives the frame loop calls [`Scene::frame`] once
//! per refresh with the latest signal snapshots and hands
//! [`Scene::buffers`] to the renderer.
//!
//! Regeneration requested with [`Scene::request_shape`] runs on a worker
//! thread. The finished cloud is swapped in whole at the start of a later
//! frame; until then the previous target stays authoritative.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::config::MorphConfig;
use crate::error::{ConfigError, StrokeError};
use crate::frame::{FrameBuffers, FrameStatus, FrameUpdater};
use crate::shapes::{self, Shape};
use crate::signal::{ControlMode, FrameInput};
use crate::stroke::Drawing;
use crate::{PointCloud, Vec3};

/// A finished background regeneration.
struct Regenerated {
    shape: Shape,
    count: usize,
    cloud: PointCloud,
}

/// Particle scene with a swappable target shape.
pub struct Scene {
    config: MorphConfig,
    updater: FrameUpdater,
    /// Particle seed of a reproducible scene, reused when the buffers are rebuilt.
    seed: Option<u64>,
    mode: ControlMode,
    shape: Shape,
    target: Arc<PointCloud>,
    drawing: Option<Drawing>,
    custom: Option<Arc<PointCloud>>,
    pending: Option<(Shape, Receiver<Regenerated>)>,
}

impl Scene {
    /// Create a scene showing a sphere.
    pub fn new(config: MorphConfig) -> Result<Self, ConfigError> {
        Self::with_shape(config, Shape::default())
    }

    /// Create a scene showing `shape`.
    pub fn with_shape(config: MorphConfig, shape: Shape) -> Result<Self, ConfigError> {
        config.validate()?;
        let updater = FrameUpdater::new(config.clone());
        Ok(Self::assemble(config, updater, None, shape))
    }

    /// Create a scene with deterministic particle state.
    pub fn with_seed(config: MorphConfig, shape: Shape, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let updater = FrameUpdater::with_seed(config.clone(), seed);
        Ok(Self::assemble(config, updater, Some(seed), shape))
    }

    fn assemble(config: MorphConfig, updater: FrameUpdater, seed: Option<u64>, shape: Shape) -> Self {
        let target = Arc::new(timed_generate(shape, config.particle_count));
        Self {
            config,
            updater,
            seed,
            mode: ControlMode::default(),
            shape,
            target,
            drawing: None,
            custom: None,
            pending: None,
        }
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    /// The shape currently displayed.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The shape being generated in the background, if any.
    pub fn pending_shape(&self) -> Option<Shape> {
        self.pending.as_ref().map(|(shape, _)| *shape)
    }

    /// The active target buffer.
    #[inline]
    pub fn target(&self) -> &PointCloud {
        &self.target
    }

    /// The resampled custom drawing, if one was accepted.
    pub fn custom_cloud(&self) -> Option<&PointCloud> {
        self.custom.as_deref()
    }

    /// Switch to `shape` immediately and start a transition.
    ///
    /// Cancels any pending background regeneration.
    pub fn set_shape(&mut self, shape: Shape) {
        self.pending = None;
        let target = self.build_target(shape);
        self.swap_target(shape, target);
    }

    /// Switch to `shape` once it has been generated on a worker thread.
    ///
    /// A newer request supersedes an older one. `Custom` needs no generation
    /// and switches immediately.
    pub fn request_shape(&mut self, shape: Shape) {
        if shape == Shape::Custom {
            self.set_shape(shape);
            return;
        }

        let count = self.config.particle_count;
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(format!("morphe-{}", shape.name()))
            .spawn(move || {
                let cloud = timed_generate(shape, count);
                // The scene may have moved on; a closed channel is fine.
                let _ = tx.send(Regenerated { shape, count, cloud });
            });

        match spawned {
            Ok(_) => self.pending = Some((shape, rx)),
            Err(e) => {
                tracing::warn!(error = %e, shape = shape.name(), "failed to spawn shape worker, generating inline");
                self.set_shape(shape);
            }
        }
    }

    /// Swap in a finished background regeneration, if there is one.
    ///
    /// Returns `true` when the target changed. Called by [`frame`](Self::frame).
    pub fn poll_pending(&mut self) -> bool {
        let Some((_, rx)) = &self.pending else {
            return false;
        };

        match rx.try_recv() {
            Ok(done) => {
                self.pending = None;
                if done.count != self.config.particle_count {
                    tracing::debug!(shape = done.shape.name(), "discarding stale regeneration");
                    return false;
                }
                self.swap_target(done.shape, Arc::new(done.cloud));
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("shape worker exited without a result");
                self.pending = None;
                false
            }
        }
    }

    /// Resample a drawing into the custom shape.
    ///
    /// On success the drawing becomes the custom shape and, if `Custom` is
    /// active, the new target. A degenerate drawing leaves the previous custom
    /// shape in place.
    pub fn set_drawing(&mut self, drawing: &Drawing) -> Result<(), StrokeError> {
        let cloud = match drawing.resample(self.config.particle_count) {
            Ok(cloud) => cloud,
            Err(e) => {
                tracing::debug!(error = %e, "drawing rejected");
                return Err(e);
            }
        };

        tracing::info!(strokes = drawing.strokes.len(), points = cloud.len(), "custom drawing accepted");
        let cloud = Arc::new(cloud);
        self.custom = Some(Arc::clone(&cloud));
        self.drawing = Some(drawing.clone());

        if self.shape == Shape::Custom {
            self.pending = None;
            self.swap_target(Shape::Custom, cloud);
        }
        Ok(())
    }

    /// Forget the custom drawing. `Custom` falls back to the sphere.
    pub fn clear_drawing(&mut self) {
        self.drawing = None;
        self.custom = None;
        if self.shape == Shape::Custom {
            self.set_shape(Shape::Custom);
        }
    }

    fn build_target(&self, shape: Shape) -> Arc<PointCloud> {
        match (shape, &self.custom) {
            (Shape::Custom, Some(custom)) => Arc::clone(custom),
            _ => Arc::new(timed_generate(shape, self.config.particle_count)),
        }
    }

    fn swap_target(&mut self, shape: Shape, target: Arc<PointCloud>) {
        self.shape = shape;
        self.target = target;
        self.updater.begin_transition();
    }

    // ========================================================================
    // Particles, color, mode
    // ========================================================================

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.config.particle_count
    }

    /// Rebuild every buffer for `count` particles.
    ///
    /// Trail history restarts, the target is regenerated and a stored drawing
    /// is resampled to the new count.
    pub fn set_particle_count(&mut self, count: usize) {
        if count == self.config.particle_count {
            return;
        }

        let base_color = self.updater.base_color();
        self.config.particle_count = count;
        self.updater = match self.seed {
            Some(seed) => FrameUpdater::with_seed(self.config.clone(), seed),
            None => FrameUpdater::new(self.config.clone()),
        };
        self.updater.set_base_color(base_color);

        self.custom = match &self.drawing {
            Some(drawing) => drawing.resample(count).ok().map(Arc::new),
            None => None,
        };
        self.set_shape(self.shape);
    }

    pub fn set_base_color(&mut self, color: Vec3) {
        self.updater.set_base_color(color);
    }

    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Change which signal drives motion. Particle state carries over.
    pub fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> ControlMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    #[inline]
    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    #[inline]
    pub fn updater(&self) -> &FrameUpdater {
        &self.updater
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Run one frame at `time` seconds.
    ///
    /// The scene's own [`mode`](Self::mode) decides which signal drives motion;
    /// `input.mode` is ignored.
    pub fn frame(&mut self, input: &FrameInput, time: f32) -> FrameStatus {
        self.poll_pending();
        let input = input.with_mode(self.mode);
        self.updater.update(Some(&self.target), &input, time)
    }

    /// Position and color buffers for the renderer.
    pub fn buffers(&self) -> FrameBuffers<'_> {
        self.updater.buffers()
    }
}

fn timed_generate(shape: Shape, count: usize) -> PointCloud {
    let start = Instant::now();
    let cloud = shapes::generate(shape, count);
    tracing::debug!(
        shape = shape.name(),
        count,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "generated shape"
    );
    cloud
}
