//! Freehand drawings resampled into custom point clouds.
//!
//! A [`Drawing`] is a set of polyline strokes in canvas pixel space. [`resample`]
//! spreads a fixed number of points along them with uniform arc-length spacing,
//! giving each stroke a share proportional to its length, then maps the result
//! into the same centered space the built-in shapes use.
//!
//! ```ignore
//! let drawing = Drawing::new(strokes, 800.0, 600.0);
//! match drawing.resample(20_000) {
//!     Ok(cloud) => scene.use_custom(cloud),
//!     Err(_) => {} // keep the previous custom shape
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::StrokeError;
use crate::sample::SampleContext;
use crate::{PointCloud, Vec3};

/// Canvas units per shape unit is `min(width, height) / CANVAS_SCALE_DIVISOR`.
pub const CANVAS_SCALE_DIVISOR: f32 = 5.0;

/// Half-range of the random depth given to each resampled point.
pub const DEPTH_JITTER: f32 = 0.15;

/// A single stroke vertex in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(self, other: StrokePoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered polyline. Insertion order is the drawing direction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    pub points: Vec<StrokePoint>,
}

impl Stroke {
    pub fn new(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    /// Polyline arc length.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl FromIterator<(f32, f32)> for Stroke {
    fn from_iter<I: IntoIterator<Item = (f32, f32)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(x, y)| StrokePoint::new(x, y)).collect())
    }
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Raw stroke data as handed over by the drawing surface.
///
/// Serializes as `{ "strokes": [[{x, y}, ...], ...], "canvasWidth", "canvasHeight" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Drawing {
    pub fn new(strokes: Vec<Stroke>, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            strokes,
            canvas_width,
            canvas_height,
        }
    }

    /// Parse a drawing from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    /// Resample into `target_count` points. See [`resample`].
    pub fn resample(&self, target_count: usize) -> Result<PointCloud, StrokeError> {
        resample(&self.strokes, target_count, self.canvas())
    }
}

/// Split `target` points across strokes in proportion to their lengths.
///
/// Each stroke gets `round(length / total × target)`, capped so the running sum
/// never exceeds `target`. The sum may fall short; [`resample`] fills the gap.
pub fn allocate_budgets(lengths: &[f32], target: usize) -> Vec<usize> {
    let total: f32 = lengths.iter().sum();
    let mut remaining = target;

    lengths
        .iter()
        .map(|&len| {
            let share = if total > 0.0 {
                (len / total * target as f32).round() as usize
            } else {
                0
            };
            let budget = share.min(remaining);
            remaining -= budget;
            budget
        })
        .collect()
}

/// Resample strokes into exactly `target_count` points.
///
/// Returns an error instead of a cloud for degenerate input: no strokes, fewer
/// than two points overall, zero total length, a zero target, or a canvas
/// without positive size.
pub fn resample(
    strokes: &[Stroke],
    target_count: usize,
    canvas: CanvasSize,
) -> Result<PointCloud, StrokeError> {
    resample_with(strokes, target_count, canvas, &mut SampleContext::new(target_count))
}

/// [`resample`] with a fixed seed for the depth jitter and gap filling.
pub fn resample_seeded(
    strokes: &[Stroke],
    target_count: usize,
    canvas: CanvasSize,
    seed: u64,
) -> Result<PointCloud, StrokeError> {
    resample_with(
        strokes,
        target_count,
        canvas,
        &mut SampleContext::with_seed(target_count, seed),
    )
}

fn resample_with(
    strokes: &[Stroke],
    target_count: usize,
    canvas: CanvasSize,
    ctx: &mut SampleContext,
) -> Result<PointCloud, StrokeError> {
    if target_count == 0 {
        return Err(StrokeError::ZeroTarget);
    }
    if strokes.is_empty() {
        return Err(StrokeError::EmptyDrawing);
    }
    let total_points: usize = strokes.iter().map(|s| s.points.len()).sum();
    if total_points < 2 {
        return Err(StrokeError::TooFewPoints(total_points));
    }
    let valid_canvas = canvas.width.is_finite()
        && canvas.height.is_finite()
        && canvas.width > 0.0
        && canvas.height > 0.0;
    if !valid_canvas {
        return Err(StrokeError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        });
    }

    let lengths: Vec<f32> = strokes.iter().map(Stroke::length).collect();
    let total: f32 = lengths.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(StrokeError::ZeroLength);
    }

    let mapping = CanvasMapping::new(canvas);
    let budgets = allocate_budgets(&lengths, target_count);
    let mut cloud = PointCloud::with_capacity(target_count);

    for ((stroke, &len), &budget) in strokes.iter().zip(&lengths).zip(&budgets) {
        if budget == 0 || len <= 0.0 {
            continue;
        }
        let step = len / budget as f32;
        walk_stroke(&stroke.points, step, budget, |p| {
            let depth = ctx.random_signed(DEPTH_JITTER);
            cloud.push(mapping.to_space(p, depth));
        });
    }

    // Rounding can starve every stroke when there are more strokes than points.
    if cloud.is_empty() {
        let longest = lengths
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let start = strokes[longest].points[0];
        cloud.push(mapping.to_space(start, ctx.random_signed(DEPTH_JITTER)));
    }

    let placed = cloud.len();
    while cloud.len() < target_count {
        let k = ctx.random_index(placed);
        cloud.push(cloud.point(k));
    }

    tracing::debug!(
        strokes = strokes.len(),
        placed,
        filled = target_count - placed,
        "resampled drawing"
    );

    Ok(cloud)
}

/// Emit `budget` points spaced `step` apart along the polyline, starting at its first vertex.
fn walk_stroke(points: &[StrokePoint], step: f32, budget: usize, mut emit: impl FnMut(StrokePoint)) {
    let last_segment = points.len() - 2;
    let mut seg = 0;
    let mut seg_start = 0.0;

    for k in 0..budget {
        let d = k as f32 * step;
        while seg < last_segment && seg_start + points[seg].distance(points[seg + 1]) < d {
            seg_start += points[seg].distance(points[seg + 1]);
            seg += 1;
        }

        let (a, b) = (points[seg], points[seg + 1]);
        let seg_len = a.distance(b);
        let t = if seg_len > 0.0 {
            ((d - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        emit(StrokePoint::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
    }
}

/// Canvas pixels to centered shape space, Y pointing up.
struct CanvasMapping {
    cx: f32,
    cy: f32,
    scale: f32,
}

impl CanvasMapping {
    fn new(canvas: CanvasSize) -> Self {
        Self {
            cx: canvas.width / 2.0,
            cy: canvas.height / 2.0,
            scale: canvas.width.min(canvas.height) / CANVAS_SCALE_DIVISOR,
        }
    }

    fn to_space(&self, p: StrokePoint, depth: f32) -> Vec3 {
        Vec3::new((p.x - self.cx) / self.scale, -(p.y - self.cy) / self.scale, depth)
    }
}
