//! Demo window.
//!
//! Runs a [`Scene`] in a winit window and draws it with the wgpu
//! [`Renderer`]. The cursor stands in for the gesture tracker and a synthetic
//! beat stands in for the audio analyzer.
//!
//! | Input | Effect |
//! |-------|--------|
//! | Left / Right | previous / next shape |
//! | M | toggle gesture / audio mode |
//! | C | next base hue |
//! | Space | pause |
//! | Esc | quit |
//! | cursor height | hand openness |
//! | left drag, wheel | orbit, zoom |

use std::f32::consts::TAU;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::error::ViewerError;
use crate::input::{Action, Input};
use crate::render::Renderer;
use crate::sample::hsv_to_rgb;
use crate::scene::Scene;
use crate::signal::{AudioBands, FrameInput};
use crate::time::FrameClock;

/// Beats per minute of the synthetic audio signal.
const SYNTH_BPM: f32 = 120.0;

/// Hue step for the color key.
const HUE_STEP: f32 = 1.0 / 8.0;

/// Band energies of a simple four-on-the-floor pattern at `time` seconds.
pub fn synthetic_beat(time: f32) -> AudioBands {
    let beat = (time * SYNTH_BPM / 60.0).fract();
    let bass = (1.0 - beat).powi(4);
    let mid = 0.5 + 0.5 * (time * TAU * 0.25).sin();
    let high = if (beat * 2.0).fract() < 0.1 { 0.8 } else { 0.0 };
    AudioBands::new(bass, mid * 0.6, high)
}

/// Open a window and run `scene` until it is closed.
pub fn run(scene: Scene) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    scene: Scene,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    input: Input,
    clock: FrameClock,
    hue: f32,
    error: Option<ViewerError>,
}

impl App {
    fn new(scene: Scene) -> Self {
        Self {
            scene,
            window: None,
            renderer: None,
            input: Input::new(),
            clock: FrameClock::new(),
            hue: 0.0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let attrs = Window::default_attributes()
            .with_title("morphe")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.renderer = Some(pollster::block_on(Renderer::new(Arc::clone(&window)))?);
        self.window = Some(window);

        tracing::info!(
            shape = self.scene.shape().name(),
            particles = self.scene.particle_count(),
            "viewer started"
        );
        Ok(())
    }

    fn apply(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        match action {
            Action::NextShape => self.scene.request_shape(self.target_shape().next()),
            Action::PrevShape => self.scene.request_shape(self.target_shape().prev()),
            Action::ToggleMode => {
                let mode = self.scene.toggle_mode();
                tracing::info!(?mode, "control mode");
            }
            Action::CycleColor => {
                self.hue = (self.hue + HUE_STEP).fract();
                self.scene.set_base_color(hsv_to_rgb(self.hue, 0.65, 1.0));
            }
            Action::TogglePause => self.clock.toggle_pause(),
            Action::Quit => event_loop.exit(),
        }
    }

    /// The shape the user is heading to, counting one still being generated.
    fn target_shape(&self) -> crate::shapes::Shape {
        self.scene.pending_shape().unwrap_or(self.scene.shape())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        for action in self.input.take_actions() {
            self.apply(action, event_loop);
        }

        let Some(renderer) = &mut self.renderer else {
            return;
        };

        let drag = self.input.take_drag();
        renderer.camera.orbit(drag.x, drag.y);
        renderer.camera.zoom(self.input.take_scroll());

        let time = self.clock.tick();
        if !self.clock.is_paused() {
            let input = FrameInput {
                mode: self.scene.mode(),
                gesture: self.input.gesture(),
                audio: synthetic_beat(time.elapsed),
            };
            self.scene.frame(&input, time.elapsed);
        }

        renderer.upload(&self.scene.buffers());
        match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = ?e, "render error"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!(error = %e, "viewer failed to start");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_beat_peaks_on_the_beat() {
        let on = synthetic_beat(0.0);
        let off = synthetic_beat(0.25);
        assert_eq!(on.bass, 1.0);
        assert!(off.bass < 0.1);
    }

    #[test]
    fn test_synthetic_beat_in_range() {
        for i in 0..200 {
            let b = synthetic_beat(i as f32 * 0.037);
            for v in [b.bass, b.mid, b.high] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
