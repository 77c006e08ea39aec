//! Orbit camera.

use glam::{Mat4, Vec3};

const FOV_Y: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 200.0;

/// Camera orbiting a target point, driven by mouse drag and wheel.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal angle in radians.
    pub yaw: f32,
    /// Vertical angle in radians, kept inside (-1.5, 1.5).
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.25,
            distance: 14.0,
            target: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cp * sy, sp, cp * cy)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y.to_radians(), aspect.max(1e-3), NEAR, FAR);
        proj * view
    }

    /// Rotate by a mouse drag of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Move closer (positive) or further away (negative).
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(2.0, 60.0);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at_distance() {
        let cam = OrbitCamera::new();
        assert!((cam.position().length() - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_and_zoom_clamp() {
        let mut cam = OrbitCamera::new();
        cam.orbit(0.0, 10_000.0);
        assert_eq!(cam.pitch, 1.5);
        cam.zoom(1_000.0);
        assert_eq!(cam.distance, 2.0);
    }
}
