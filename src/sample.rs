//! Sampling context for shape generation.
//!
//! Every call to [`generate`](crate::shapes::generate) creates its own
//! [`SampleContext`], so shapes never share RNG state.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// RNG plus geometric helpers handed to each shape sampler.
///
/// ```ignore
/// let mut ctx = SampleContext::new(count);
/// for i in 0..count {
///     ctx.set_index(i);
///     cloud.push(ctx.random_in_sphere(3.0));
/// }
/// ```
pub struct SampleContext {
    /// Index of the point being sampled (0 to count-1).
    pub index: usize,
    /// Total number of points being sampled.
    pub count: usize,
    rng: SmallRng,
}

impl SampleContext {
    /// Create a context seeded from the clock, different on every call.
    pub fn new(count: usize) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
            ^ (count as u64).rotate_left(32);
        Self::with_seed(count, seed)
    }

    /// Create a reproducible context.
    pub fn with_seed(count: usize, seed: u64) -> Self {
        Self {
            index: 0,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Normalized progress through the sample (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.index as f32 / self.count as f32
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random f32 in `[-amount, amount)`.
    #[inline]
    pub fn random_signed(&mut self, amount: f32) -> f32 {
        (self.rng.gen::<f32>() * 2.0 - 1.0) * amount
    }

    /// Random index in `0..len`. `len` must be non-zero.
    #[inline]
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Independent jitter on all three axes.
    pub fn jitter(&mut self, amount: f32) -> Vec3 {
        Vec3::new(
            self.random_signed(amount),
            self.random_signed(amount),
            self.random_signed(amount),
        )
    }

    // ========== Position helpers ==========

    /// Random unit vector, uniform on the sphere.
    pub fn random_direction(&mut self) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let cos_phi: f32 = self.rng.gen_range(-1.0..1.0);
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
        Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin())
    }

    /// Random point inside a sphere, uniform throughout the volume.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        // Cube root for uniform volume distribution
        let r = radius * self.rng.gen::<f32>().cbrt();
        self.random_direction() * r
    }

    /// Random point in a solid shell between `inner` and `outer`, uniform by volume.
    pub fn random_in_shell(&mut self, inner: f32, outer: f32) -> Vec3 {
        let (i3, o3) = (inner.powi(3), outer.powi(3));
        let r = (i3 + self.rng.gen::<f32>() * (o3 - i3)).cbrt();
        self.random_direction() * r
    }

    /// Random point inside a cube of given half-size, centered at origin.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        self.jitter(half_size)
    }

    /// Random point on the surface of a cube of given half-size.
    pub fn random_on_cube(&mut self, half_size: f32) -> Vec3 {
        let face = self.rng.gen_range(0..6u32);
        let u = self.random_signed(half_size);
        let v = self.random_signed(half_size);
        let s = if face % 2 == 0 { half_size } else { -half_size };
        match face / 2 {
            0 => Vec3::new(s, u, v),
            1 => Vec3::new(u, s, v),
            _ => Vec3::new(u, v, s),
        }
    }

    /// Random point inside a disk in the XZ plane at y=0.
    pub fn random_in_disk(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let r = radius * self.rng.gen::<f32>().sqrt();
        Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
    }

    /// Random point in a flat annulus in the XZ plane, uniform by area.
    pub fn random_in_annulus(&mut self, inner: f32, outer: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let (i2, o2) = (inner * inner, outer * outer);
        let r = (i2 + self.rng.gen::<f32>() * (o2 - i2)).sqrt();
        Vec3::new(r * theta.cos(), 0.0, r * theta.sin())
    }

    /// Random point on a ring (circle) in the XZ plane at y=0.
    pub fn random_on_ring(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin())
    }

    /// Random point on a torus lying in the XZ plane.
    ///
    /// * `major` - distance from the center to the tube center
    /// * `minor` - tube radius
    pub fn random_on_torus(&mut self, major: f32, minor: f32) -> Vec3 {
        let u = self.rng.gen_range(0.0..TAU);
        let v = self.rng.gen_range(0.0..TAU);
        let r = major + minor * v.cos();
        Vec3::new(r * u.cos(), minor * v.sin(), r * u.sin())
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.rng.gen_range(0.0..TAU)
    }
}

/// Convert HSV to RGB.
///
/// * `h` - 0.0 to 1.0 (wraps: red → yellow → green → cyan → blue → magenta → red)
/// * `s` - 0.0 (gray) to 1.0 (vivid)
/// * `v` - 0.0 (black) to 1.0 (bright)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let mut ctx = SampleContext::with_seed(100, 1);
        ctx.set_index(50);
        assert!((ctx.progress() - 0.5).abs() < 0.001);
        assert_eq!(SampleContext::with_seed(0, 1).progress(), 0.0);
    }

    #[test]
    fn test_random_in_sphere_bounds() {
        let mut ctx = SampleContext::with_seed(1, 7);
        for _ in 0..500 {
            assert!(ctx.random_in_sphere(0.5).length() <= 0.5 + 0.001);
        }
    }

    #[test]
    fn test_random_in_shell_bounds() {
        let mut ctx = SampleContext::with_seed(1, 9);
        for _ in 0..500 {
            let r = ctx.random_in_shell(2.0, 3.0).length();
            assert!((2.0 - 0.001..=3.0 + 0.001).contains(&r), "r = {r}");
        }
    }

    #[test]
    fn test_random_on_cube_lies_on_a_face() {
        let mut ctx = SampleContext::with_seed(1, 3);
        for _ in 0..200 {
            let p = ctx.random_on_cube(2.0);
            let m = p.abs().max_element();
            assert!((m - 2.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_random_range_empty() {
        let mut ctx = SampleContext::with_seed(1, 3);
        assert_eq!(ctx.random_range(1.0, 1.0), 1.0);
    }

    #[test]
    fn test_hsv_to_rgb() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((red.x - 1.0).abs() < 0.001);
        assert!(red.y < 0.001);
        assert!(red.z < 0.001);

        let wrapped = hsv_to_rgb(1.0, 1.0, 1.0);
        assert!((wrapped - red).length() < 0.001);
    }
}
