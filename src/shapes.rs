//! Procedural point-cloud generators, one per built-in shape.
//!
//! Every shape samples points with one of four strategies:
//!
//! | Strategy | Shapes |
//! |----------|--------|
//! | Closed-form parametric | [`Shape::Galaxy`], [`Shape::Dna`], [`Shape::Flower`], [`Shape::Butterfly`], [`Shape::Ring`], [`Shape::Tornado`], [`Shape::TorusKnot`] |
//! | Rejection | [`Shape::Heart`], [`Shape::DoubleHeart`] |
//! | Composite (partitioned) | [`Shape::Saturn`], [`Shape::SolarSystem`], [`Shape::Buddha`], [`Shape::ILoveU`] |
//! | Uniform volume / field | [`Shape::Sphere`], [`Shape::FlowerSea`], [`Shape::Fireworks`], [`Shape::Star`], [`Shape::Cube`] |
//!
//! Generation is random but deterministic in distribution, and always yields
//! exactly `count` finite points.
//!
//! ```ignore
//! let cloud = shapes::generate(Shape::Heart, 10_000);
//! assert_eq!(cloud.len(), 10_000);
//! ```

use std::f32::consts::{FRAC_PI_4, PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Mat3;
use serde::{Deserialize, Serialize};

use crate::error::UnknownShape;
use crate::sample::SampleContext;
use crate::{PointCloud, Vec3};

/// Built-in shapes plus the user-drawn custom shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Uniform solid sphere. Also the fallback for anything unknown.
    #[default]
    Sphere,
    /// Volumetric heart, rejection sampled from its implicit surface.
    Heart,
    /// Two hearts, each tilted 45° toward the other.
    DoubleHeart,
    /// Three-armed logarithmic spiral, thicker toward the core.
    Galaxy,
    /// Double helix with a rung every tenth particle.
    Dna,
    /// Five-petal rose curve.
    Flower,
    /// Closed-form butterfly curve.
    Butterfly,
    /// Torus with a vertical beam rising above it.
    Ring,
    /// Planet body with a flat ring band.
    Saturn,
    /// Sun, eight orbit rings and their planets.
    SolarSystem,
    /// Seated statue silhouette: head, tapering torso, base.
    Buddha,
    /// "I", a heart and a "U".
    ILoveU,
    /// Rolling terrain field.
    FlowerSea,
    /// Solid spherical shell.
    Fireworks,
    /// Widening conical helix.
    Tornado,
    /// Five-point star prism.
    Star,
    /// (2, 3) torus knot tube.
    TorusKnot,
    /// Cube surface.
    Cube,
    /// Shape resampled from a freehand drawing.
    Custom,
}

impl Shape {
    /// Every shape, in display order.
    pub const ALL: [Shape; 19] = [
        Shape::Sphere,
        Shape::Heart,
        Shape::DoubleHeart,
        Shape::Galaxy,
        Shape::Dna,
        Shape::Flower,
        Shape::Butterfly,
        Shape::Ring,
        Shape::Saturn,
        Shape::SolarSystem,
        Shape::Buddha,
        Shape::ILoveU,
        Shape::FlowerSea,
        Shape::Fireworks,
        Shape::Tornado,
        Shape::Star,
        Shape::TorusKnot,
        Shape::Cube,
        Shape::Custom,
    ];

    /// Snake-case identifier, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Heart => "heart",
            Shape::DoubleHeart => "double_heart",
            Shape::Galaxy => "galaxy",
            Shape::Dna => "dna",
            Shape::Flower => "flower",
            Shape::Butterfly => "butterfly",
            Shape::Ring => "ring",
            Shape::Saturn => "saturn",
            Shape::SolarSystem => "solar_system",
            Shape::Buddha => "buddha",
            Shape::ILoveU => "i_love_u",
            Shape::FlowerSea => "flower_sea",
            Shape::Fireworks => "fireworks",
            Shape::Tornado => "tornado",
            Shape::Star => "star",
            Shape::TorusKnot => "torus_knot",
            Shape::Cube => "cube",
            Shape::Custom => "custom",
        }
    }

    /// Look a shape up by its identifier. Case-insensitive; `-` and `_` are interchangeable.
    pub fn from_name(name: &str) -> Option<Shape> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Shape::ALL.iter().copied().find(|s| s.name() == normalized)
    }

    /// The shape after this one in [`Shape::ALL`], wrapping around.
    pub fn next(self) -> Shape {
        let i = self.position();
        Shape::ALL[(i + 1) % Shape::ALL.len()]
    }

    /// The shape before this one in [`Shape::ALL`], wrapping around.
    pub fn prev(self) -> Shape {
        let i = self.position();
        Shape::ALL[(i + Shape::ALL.len() - 1) % Shape::ALL.len()]
    }

    fn position(self) -> usize {
        Shape::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::from_name(s).ok_or_else(|| UnknownShape(s.to_string()))
    }
}

/// Generate `count` points for `shape`.
///
/// [`Shape::Custom`] has no drawing to work from here and yields the sphere;
/// custom clouds come from [`resample`](crate::stroke::resample).
pub fn generate(shape: Shape, count: usize) -> PointCloud {
    generate_with(shape, &mut SampleContext::new(count))
}

/// Generate with a fixed seed, for reproducible clouds.
pub fn generate_seeded(shape: Shape, count: usize, seed: u64) -> PointCloud {
    generate_with(shape, &mut SampleContext::with_seed(count, seed))
}

/// Generate by identifier, falling back to a sphere for unknown names.
pub fn generate_named(name: &str, count: usize) -> PointCloud {
    match Shape::from_name(name) {
        Some(shape) => generate(shape, count),
        None => {
            tracing::warn!(name, "unknown shape, falling back to sphere");
            generate(Shape::Sphere, count)
        }
    }
}

fn generate_with(shape: Shape, ctx: &mut SampleContext) -> PointCloud {
    let count = ctx.count;
    let mut cloud = PointCloud::with_capacity(count);

    for i in 0..count {
        ctx.set_index(i);
        let p = match shape {
            Shape::Sphere | Shape::Custom => sphere(ctx),
            Shape::Heart => heart(ctx),
            Shape::DoubleHeart => double_heart(ctx),
            Shape::Galaxy => galaxy(ctx),
            Shape::Dna => dna(ctx),
            Shape::Flower => flower(ctx),
            Shape::Butterfly => butterfly(ctx),
            Shape::Ring => ring(ctx),
            Shape::Saturn => saturn(ctx),
            Shape::SolarSystem => solar_system(ctx),
            Shape::Buddha => buddha(ctx),
            Shape::ILoveU => i_love_u(ctx),
            Shape::FlowerSea => flower_sea(ctx),
            Shape::Fireworks => fireworks(ctx),
            Shape::Tornado => tornado(ctx),
            Shape::Star => star(ctx),
            Shape::TorusKnot => torus_knot(ctx),
            Shape::Cube => ctx.random_on_cube(2.2),
        };
        cloud.push(p);
    }

    cloud
}

// ========== Uniform volume / field ==========

const SPHERE_RADIUS: f32 = 3.0;

fn sphere(ctx: &mut SampleContext) -> Vec3 {
    ctx.random_in_sphere(SPHERE_RADIUS)
}

fn fireworks(ctx: &mut SampleContext) -> Vec3 {
    ctx.random_in_shell(2.6, 3.2)
}

fn flower_sea(ctx: &mut SampleContext) -> Vec3 {
    let x = ctx.random_signed(6.0);
    let z = ctx.random_signed(6.0);
    let y = (0.5 * x).sin() * (0.5 * z).cos() + ctx.random_signed(0.05);
    Vec3::new(x, y, z)
}

fn star(ctx: &mut SampleContext) -> Vec3 {
    const OUTER: f32 = 3.2;
    const INNER: f32 = 1.3;
    let sector = TAU / 5.0;

    let theta = ctx.random_angle();
    let local = theta.rem_euclid(sector) / sector;
    // 0 at a tip, 1 halfway between two tips
    let valley = local.min(1.0 - local) * 2.0;
    let outline = OUTER + (INNER - OUTER) * valley;
    let r = outline * ctx.random().sqrt();

    // one tip points straight up
    let a = theta + PI / 2.0;
    Vec3::new(r * a.cos(), r * a.sin(), ctx.random_signed(0.35))
}

// ========== Rejection sampling ==========

/// Scale applied to the unit heart.
pub const HEART_SCALE: f32 = 1.8;

const HEART_BOUND: f32 = 1.5;
const MAX_REJECTIONS: usize = 10_000;

/// Implicit heart surface: negative inside, positive outside.
///
/// `(x² + 9/4·y² + z² − 1)³ − x²z³ − 9/80·y²z³`, with `z` as the heart's vertical axis.
pub fn heart_inequality(p: Vec3) -> f32 {
    let x2 = p.x * p.x;
    let y2 = p.y * p.y;
    let z3 = p.z * p.z * p.z;
    let a = x2 + 2.25 * y2 + p.z * p.z - 1.0;
    a * a * a - x2 * z3 - (9.0 / 80.0) * y2 * z3
}

/// A point strictly inside the unit heart, in the heart's own axes.
pub(crate) fn heart_raw(ctx: &mut SampleContext) -> Vec3 {
    for _ in 0..MAX_REJECTIONS {
        let p = ctx.random_in_cube(HEART_BOUND);
        if heart_inequality(p) < 0.0 {
            return p;
        }
    }
    // The origin is always inside.
    Vec3::ZERO
}

/// Permute heart axes so its vertical axis becomes world Y.
#[inline]
fn upright(raw: Vec3) -> Vec3 {
    Vec3::new(raw.x, raw.z, raw.y)
}

fn heart(ctx: &mut SampleContext) -> Vec3 {
    upright(heart_raw(ctx)) * HEART_SCALE
}

const DOUBLE_HEART_SCALE: f32 = 1.3;
const DOUBLE_HEART_OFFSET: f32 = 1.8;

fn double_heart(ctx: &mut SampleContext) -> Vec3 {
    let side = if ctx.random() < 0.5 { -1.0 } else { 1.0 };
    place_side_heart(side, upright(heart_raw(ctx)) * DOUBLE_HEART_SCALE)
}

/// Rotate an upright heart 45° about Z so its top points at the other
/// heart, then move it to `side` (±1) of the origin.
fn place_side_heart(side: f32, local: Vec3) -> Vec3 {
    Mat3::from_rotation_z(side * FRAC_PI_4) * local + Vec3::new(side * DOUBLE_HEART_OFFSET, 0.0, 0.0)
}

// ========== Closed-form parametric ==========

const GALAXY_ARMS: usize = 3;

fn galaxy(ctx: &mut SampleContext) -> Vec3 {
    const CORE: f32 = 0.3;
    const PITCH: f32 = 0.45;

    let arm = ctx.random_index(GALAXY_ARMS);
    let t = ctx.random();
    let r = CORE + t * 5.2;
    // logarithmic spiral r = CORE·e^(PITCH·θ)
    let theta = (r / CORE).ln() / PITCH + arm as f32 * TAU / GALAXY_ARMS as f32;
    let spread = 0.15 + 0.6 * (1.0 - t);

    Vec3::new(
        r * theta.cos() + ctx.random_signed(spread),
        ctx.random_signed(spread * 0.5),
        r * theta.sin() + ctx.random_signed(spread),
    )
}

fn dna(ctx: &mut SampleContext) -> Vec3 {
    const RADIUS: f32 = 1.3;
    const HEIGHT: f32 = 9.0;
    const TURNS: f32 = 5.0;

    let t = ctx.progress();
    let y = (t - 0.5) * HEIGHT;
    let angle = t * TAU * TURNS;
    let a = Vec3::new(RADIUS * angle.cos(), y, RADIUS * angle.sin());
    // second strand half a turn behind
    let b = Vec3::new(-a.x, y, -a.z);

    if ctx.index % 10 == 0 {
        let s = ctx.random();
        a.lerp(b, s) + ctx.jitter(0.03)
    } else if ctx.index % 2 == 0 {
        a + ctx.jitter(0.08)
    } else {
        b + ctx.jitter(0.08)
    }
}

fn flower(ctx: &mut SampleContext) -> Vec3 {
    const PETALS: f32 = 5.0;

    let theta = ctx.random_angle();
    let curve = 3.0 * (PETALS * theta).cos();
    let r = curve * (1.0 - 0.35 * ctx.random()) + ctx.random_signed(0.1);
    let x = r * theta.cos();
    let y = r * theta.sin();
    // shallow cup
    let z = -0.08 * r * r + ctx.random_signed(0.1);
    Vec3::new(x, y, z)
}

fn butterfly(ctx: &mut SampleContext) -> Vec3 {
    let t = ctx.random_range(0.0, 12.0 * PI);
    let r = t.cos().exp() - 2.0 * (4.0 * t).cos() + (t / 12.0).sin().powi(5);
    let x = t.sin() * r;
    let y = t.cos() * r;
    // wings fold slightly toward the viewer
    let z = x.abs() * 0.25;
    Vec3::new(x, y, z) * 0.9 + ctx.jitter(0.06)
}

fn ring(ctx: &mut SampleContext) -> Vec3 {
    if ctx.random() < 0.85 {
        ctx.random_on_torus(3.0, 0.35)
    } else {
        let base = ctx.random_in_disk(0.25);
        Vec3::new(base.x, ctx.random_range(0.5, 5.0), base.z)
    }
}

fn tornado(ctx: &mut SampleContext) -> Vec3 {
    let t = ctx.random();
    let y = t * 6.0 - 3.0;
    let radius = 0.2 + 2.3 * t * t;
    let angle = t * TAU * 5.0 + ctx.random_signed(0.4);
    Vec3::new(radius * angle.cos(), y, radius * angle.sin()) + ctx.jitter(0.12 * (0.3 + t))
}

fn torus_knot(ctx: &mut SampleContext) -> Vec3 {
    const P: f32 = 2.0;
    const Q: f32 = 3.0;

    let t = ctx.random_angle();
    let r = 2.0 + (Q * t).cos();
    let center = Vec3::new(r * (P * t).cos(), -(Q * t).sin(), r * (P * t).sin()) * 1.4;
    center + ctx.random_in_sphere(0.25)
}

// ========== Composite ==========

const SATURN_TILT: f32 = 0.4;

fn saturn(ctx: &mut SampleContext) -> Vec3 {
    let p = if ctx.random() < 0.6 {
        ctx.random_in_sphere(1.6)
    } else {
        ctx.random_in_annulus(2.2, 3.6) + Vec3::Y * ctx.random_signed(0.04)
    };
    Mat3::from_rotation_x(SATURN_TILT) * p
}

const ORBIT_RADII: [f32; 8] = [1.5, 2.0, 2.6, 3.2, 3.9, 4.6, 5.3, 6.0];
const PLANET_SIZES: [f32; 8] = [0.12, 0.2, 0.22, 0.16, 0.42, 0.36, 0.27, 0.26];
const PLANET_ANGLES: [f32; 8] = [0.3, 1.9, 3.4, 4.8, 0.9, 2.7, 4.1, 5.6];
/// The sixth listed planet carries a ring.
const RINGED_PLANET: usize = 5;

fn solar_system(ctx: &mut SampleContext) -> Vec3 {
    let selector = ctx.random();

    if selector < 0.15 {
        ctx.random_in_sphere(0.9)
    } else if selector < 0.55 {
        let k = ctx.random_index(ORBIT_RADII.len());
        ctx.random_on_ring(ORBIT_RADII[k]) + Vec3::Y * ctx.random_signed(0.02)
    } else {
        let k = ctx.random_index(ORBIT_RADII.len());
        let (radius, angle, size) = (ORBIT_RADII[k], PLANET_ANGLES[k], PLANET_SIZES[k]);
        let center = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());

        if k == RINGED_PLANET && ctx.random() < 0.4 {
            let band = ctx.random_in_annulus(size * 1.5, size * 2.3);
            center + Mat3::from_rotation_x(0.45) * band
        } else {
            center + ctx.random_in_sphere(size)
        }
    }
}

fn buddha(ctx: &mut SampleContext) -> Vec3 {
    let selector = ctx.random();

    if selector < 0.2 {
        ctx.random_in_sphere(0.7) + Vec3::new(0.0, 2.3, 0.0)
    } else if selector < 0.6 {
        // torso narrows from the lap to the shoulders
        let h = ctx.random();
        let y = -1.0 + h * 2.6;
        let radius = 1.6 - 1.1 * h;
        let d = ctx.random_in_disk(radius);
        Vec3::new(d.x, y, d.z)
    } else {
        let d = ctx.random_in_disk(2.8);
        Vec3::new(d.x, -1.4 + ctx.random_signed(0.12), d.z)
    }
}

const LETTER_OFFSET: f32 = 4.2;

fn i_love_u(ctx: &mut SampleContext) -> Vec3 {
    let selector = ctx.random();

    if selector < 0.2 {
        Vec3::new(
            -LETTER_OFFSET + ctx.random_signed(0.18),
            ctx.random_range(-1.6, 1.6),
            ctx.random_signed(0.18),
        )
    } else if selector < 0.6 {
        upright(heart_raw(ctx)) * 1.1
    } else {
        let s = ctx.random();
        u_curve(s) + ctx.jitter(0.12) + Vec3::new(LETTER_OFFSET, 0.0, 0.0)
    }
}

/// A "U" traced by `s` in `[0, 1]`: left arm down, bottom arc, right arm up.
fn u_curve(s: f32) -> Vec3 {
    const HALF_WIDTH: f32 = 1.1;
    const TOP: f32 = 1.6;
    const ARC_Y: f32 = -0.4;

    let s3 = s * 3.0;
    if s3 < 1.0 {
        Vec3::new(-HALF_WIDTH, TOP + (ARC_Y - TOP) * s3, 0.0)
    } else if s3 < 2.0 {
        let a = PI + (s3 - 1.0) * PI;
        Vec3::new(HALF_WIDTH * a.cos(), ARC_Y + HALF_WIDTH * a.sin(), 0.0)
    } else {
        Vec3::new(HALF_WIDTH, ARC_Y + (TOP - ARC_Y) * (s3 - 2.0), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_yields_count_finite_points() {
        for shape in Shape::ALL {
            let cloud = generate_seeded(shape, 500, 11);
            assert_eq!(cloud.as_slice().len(), 1500, "{shape}");
            assert!(cloud.is_finite(), "{shape} produced a non-finite point");
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        for shape in Shape::ALL {
            assert!(generate(shape, 0).is_empty());
        }
    }

    #[test]
    fn test_heart_points_satisfy_inequality() {
        let cloud = generate_seeded(Shape::Heart, 1000, 5);
        for p in cloud.points() {
            // undo the scale and axis permutation
            let raw = Vec3::new(p.x, p.z, p.y) / HEART_SCALE;
            assert!(heart_inequality(raw) < 1e-4, "{raw:?} lies outside the heart");
            assert!(p.length() <= 2.0 * HEART_SCALE);
        }
    }

    #[test]
    fn test_heart_raw_rejects_outside() {
        let mut ctx = SampleContext::with_seed(1, 99);
        for _ in 0..1000 {
            assert!(heart_inequality(heart_raw(&mut ctx)) < 0.0);
        }
        assert!(heart_inequality(Vec3::new(1.4, 1.4, 1.4)) > 0.0);
    }

    #[test]
    fn test_heart_stands_upright() {
        let cloud = generate_seeded(Shape::Heart, 4000, 2);
        let height = cloud.points().map(|p| p.y).fold(f32::MIN, f32::max)
            - cloud.points().map(|p| p.y).fold(f32::MAX, f32::min);
        let depth = cloud.points().map(|p| p.z).fold(f32::MIN, f32::max)
            - cloud.points().map(|p| p.z).fold(f32::MAX, f32::min);
        assert!(height > depth);
    }

    #[test]
    fn test_double_heart_tilts_each_heart_45_degrees() {
        for side in [-1.0, 1.0] {
            let top = place_side_heart(side, Vec3::Y) - place_side_heart(side, Vec3::ZERO);
            let tilt = top.angle_between(Vec3::Y);
            assert!((tilt - FRAC_PI_4).abs() < 1e-5);
            // the top leans toward the middle
            assert!(top.x * side < 0.0);
        }
    }

    #[test]
    fn test_double_heart_points_lie_in_a_heart() {
        let cloud = generate_seeded(Shape::DoubleHeart, 2000, 6);
        let mut sides = [0usize; 2];
        for p in cloud.points() {
            let inside = |side: f32| {
                let local = Mat3::from_rotation_z(-side * FRAC_PI_4)
                    * (p - Vec3::new(side * DOUBLE_HEART_OFFSET, 0.0, 0.0))
                    / DOUBLE_HEART_SCALE;
                heart_inequality(Vec3::new(local.x, local.z, local.y)) < 1e-4
            };
            assert!(inside(-1.0) || inside(1.0), "{p:?} lies in neither heart");
            sides[usize::from(p.x > 0.0)] += 1;
        }
        assert!(sides.iter().all(|&n| n > 800), "{sides:?}");
    }

    #[test]
    fn test_names_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(Shape::from_name(shape.name()), Some(shape));
            assert_eq!(shape.name().parse::<Shape>().ok(), Some(shape));
        }
        assert_eq!(Shape::from_name("Double-Heart"), Some(Shape::DoubleHeart));
        assert!("teapot".parse::<Shape>().is_err());
    }

    #[test]
    fn test_unknown_name_falls_back_to_sphere() {
        let cloud = generate_named("teapot", 300);
        assert_eq!(cloud.len(), 300);
        assert!(cloud.max_radius() <= SPHERE_RADIUS + 1e-3);
    }

    #[test]
    fn test_next_prev_cycle() {
        assert_eq!(Shape::Sphere.next(), Shape::Heart);
        assert_eq!(Shape::Sphere.prev(), Shape::Custom);
        for shape in Shape::ALL {
            assert_eq!(shape.next().prev(), shape);
        }
    }

    #[test]
    fn test_dna_rungs_lie_between_strands() {
        let cloud = generate_seeded(Shape::Dna, 1000, 4);
        for i in (0..1000).step_by(10) {
            let p = cloud.point(i);
            let horizontal = (p.x * p.x + p.z * p.z).sqrt();
            assert!(horizontal <= 1.3 + 0.1);
        }
    }

    #[test]
    fn test_flower_sea_follows_terrain() {
        let cloud = generate_seeded(Shape::FlowerSea, 500, 8);
        for p in cloud.points() {
            let expected = (0.5 * p.x).sin() * (0.5 * p.z).cos();
            assert!((p.y - expected).abs() <= 0.05 + 1e-4);
        }
    }

    #[test]
    fn test_fireworks_is_a_shell() {
        let cloud = generate_seeded(Shape::Fireworks, 500, 8);
        for p in cloud.points() {
            let r = p.length();
            assert!((2.6 - 1e-3..=3.2 + 1e-3).contains(&r));
        }
    }

    // ========================================================================
    // Composite partitions
    // ========================================================================

    const PARTITION_SAMPLES: usize = 20_000;
    /// Allowed deviation of a region's share; about five standard deviations.
    const SHARE_TOLERANCE: f64 = 0.02;

    /// Count points per region. `classify` returns the region index.
    fn region_shares(shape: Shape, regions: usize, classify: impl Fn(Vec3) -> usize) -> Vec<f64> {
        let cloud = generate_seeded(shape, PARTITION_SAMPLES, 21);
        let mut counts = vec![0usize; regions];
        for p in cloud.points() {
            counts[classify(p)] += 1;
        }
        counts.iter().map(|&n| n as f64 / PARTITION_SAMPLES as f64).collect()
    }

    fn assert_shares(shape: Shape, shares: &[f64], expected: &[f64]) {
        for (i, (got, want)) in shares.iter().zip(expected).enumerate() {
            assert!(
                (got - want).abs() < SHARE_TOLERANCE,
                "{shape} region {i}: share {got:.3}, expected {want}"
            );
        }
    }

    fn horizontal(p: Vec3) -> f32 {
        (p.x * p.x + p.z * p.z).sqrt()
    }

    #[test]
    fn test_saturn_body_and_ring_split() {
        let shares = region_shares(Shape::Saturn, 3, |p| {
            let q = Mat3::from_rotation_x(-SATURN_TILT) * p;
            let r = horizontal(q);
            if q.length() <= 1.6 + 1e-3 {
                0
            } else if (2.2 - 1e-3..=3.6 + 1e-3).contains(&r) && q.y.abs() <= 0.04 + 1e-3 {
                1
            } else {
                2
            }
        });
        assert_shares(Shape::Saturn, &shares, &[0.6, 0.4, 0.0]);
    }

    #[test]
    fn test_ring_torus_and_beam_split() {
        let shares = region_shares(Shape::Ring, 3, |p| {
            let r = horizontal(p);
            let tube = Vec3::new(r - 3.0, p.y, 0.0).length();
            if (tube - 0.35).abs() < 1e-3 {
                0
            } else if r <= 0.25 + 1e-3 && (0.5..=5.0).contains(&p.y) {
                1
            } else {
                2
            }
        });
        assert_shares(Shape::Ring, &shares, &[0.85, 0.15, 0.0]);
    }

    /// Sun, orbit rings, planet bodies, planet ring band, anything else.
    fn classify_solar(p: Vec3) -> usize {
        let on_orbit = p.y.abs() <= 0.02 + 1e-4
            && ORBIT_RADII.iter().any(|&r| (horizontal(p) - r).abs() < 1e-3);
        let planet = |k: usize| {
            let angle = PLANET_ANGLES[k];
            Vec3::new(ORBIT_RADII[k] * angle.cos(), 0.0, ORBIT_RADII[k] * angle.sin())
        };

        if p.length() <= 0.9 + 1e-3 {
            0
        } else if on_orbit {
            1
        } else if (0..ORBIT_RADII.len()).any(|k| (p - planet(k)).length() <= PLANET_SIZES[k] + 1e-3) {
            2
        } else {
            let size = PLANET_SIZES[RINGED_PLANET];
            let band = Mat3::from_rotation_x(-0.45) * (p - planet(RINGED_PLANET));
            let r = horizontal(band);
            if band.y.abs() < 1e-3 && (size * 1.5 - 1e-3..=size * 2.3 + 1e-3).contains(&r) {
                3
            } else {
                4
            }
        }
    }

    #[test]
    fn test_solar_system_split() {
        let shares = region_shares(Shape::SolarSystem, 5, classify_solar);
        // planet bodies and the ring band share the 45% planet slice
        let merged = [shares[0], shares[1], shares[2] + shares[3], shares[4]];
        assert_shares(Shape::SolarSystem, &merged, &[0.15, 0.40, 0.45, 0.0]);
    }

    #[test]
    fn test_only_the_ringed_planet_has_a_ring() {
        let shares = region_shares(Shape::SolarSystem, 5, classify_solar);
        // 45% planets × 1/8 for the sixth planet × 40% of its points in the band
        let expected = 0.45 / 8.0 * 0.4;
        assert!((shares[3] - expected).abs() < 0.01, "ring share {:.4}", shares[3]);
        assert_eq!(shares[4], 0.0, "points outside every region");
    }

    #[test]
    fn test_buddha_split() {
        let shares = region_shares(Shape::Buddha, 4, |p| {
            let head = Vec3::new(0.0, 2.3, 0.0);
            if (p - head).length() < 0.7 + 1e-3 {
                0
            } else if (-1.0 - 1e-3..=1.6 + 1e-3).contains(&p.y) {
                let h = (p.y + 1.0) / 2.6;
                if horizontal(p) <= 1.6 - 1.1 * h + 1e-3 {
                    1
                } else {
                    3
                }
            } else if (p.y + 1.4).abs() <= 0.12 + 1e-3 && horizontal(p) <= 2.8 + 1e-3 {
                2
            } else {
                3
            }
        });
        assert_shares(Shape::Buddha, &shares, &[0.2, 0.4, 0.4, 0.0]);
    }

    #[test]
    fn test_i_love_u_split() {
        let shares = region_shares(Shape::ILoveU, 4, |p| {
            if (p.x + LETTER_OFFSET).abs() <= 0.18 + 1e-3 {
                0
            } else if p.x.abs() < 2.0 {
                let raw = Vec3::new(p.x, p.z, p.y) / 1.1;
                if heart_inequality(raw) < 1e-4 {
                    1
                } else {
                    3
                }
            } else if p.x > LETTER_OFFSET - 1.1 - 0.13 {
                2
            } else {
                3
            }
        });
        assert_shares(Shape::ILoveU, &shares, &[0.2, 0.4, 0.4, 0.0]);
    }

    #[test]
    fn test_u_curve_endpoints() {
        assert!((u_curve(0.0) - Vec3::new(-1.1, 1.6, 0.0)).length() < 1e-4);
        assert!((u_curve(0.5) - Vec3::new(0.0, -1.5, 0.0)).length() < 1e-4);
        assert!((u_curve(0.9999) - Vec3::new(1.1, 1.6, 0.0)).length() < 1e-2);
    }
}
