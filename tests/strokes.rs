//! Integration tests for stroke resampling.

use morphe::stroke::{allocate_budgets, resample_seeded};
use morphe::{CanvasSize, Drawing, Stroke, StrokeError};
use proptest::prelude::*;

fn horizontal(y: f32, from: f32, to: f32) -> Stroke {
    [(from, y), (to, y)].into_iter().collect()
}

fn arb_stroke() -> impl Strategy<Value = Stroke> {
    prop::collection::vec((0.0f32..800.0, 0.0f32..600.0), 2..12).prop_map(|points| points.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resampling_preserves_target_count(
        strokes in prop::collection::vec(arb_stroke(), 1..6),
        target in 1usize..2000,
        seed in any::<u64>(),
    ) {
        let total: f32 = strokes.iter().map(Stroke::length).sum();
        prop_assume!(total > 0.0);

        let cloud = resample_seeded(&strokes, target, CanvasSize::new(800.0, 600.0), seed).unwrap();
        prop_assert_eq!(cloud.len(), target);
        prop_assert!(cloud.is_finite());
    }

    #[test]
    fn budgets_follow_length_ratio(unit in 1.0f32..500.0, target in 1usize..5000) {
        let budgets = allocate_budgets(&[unit, 2.0 * unit], target);
        let (a, b) = (budgets[0] as i64, budgets[1] as i64);
        prop_assert!((b - 2 * a).abs() <= 1, "a={} b={}", a, b);
        prop_assert!((a + b) as usize <= target);
    }
}

#[test]
fn test_hundred_and_three_hundred_pixel_strokes() {
    let canvas = CanvasSize::new(500.0, 500.0);
    // y = 100 px maps above center, y = 400 px below
    let strokes = [horizontal(100.0, 50.0, 150.0), horizontal(400.0, 50.0, 350.0)];

    let cloud = resample_seeded(&strokes, 400, canvas, 9).unwrap();
    let upper = cloud.points().filter(|p| p.y > 0.0).count();
    let lower = cloud.points().filter(|p| p.y < 0.0).count();

    assert_eq!(upper + lower, 400);
    assert!((upper as i64 - 100).abs() <= 1);
    assert!((lower as i64 - 300).abs() <= 1);
}

#[test]
fn test_drawing_from_json_resamples() {
    let json = r#"{
        "strokes": [
            [{"x": 10, "y": 10}, {"x": 200, "y": 10}, {"x": 200, "y": 200}],
            [{"x": 50, "y": 250}, {"x": 60, "y": 260}]
        ],
        "canvasWidth": 300,
        "canvasHeight": 300
    }"#;
    let drawing = Drawing::from_json(json).unwrap();
    let cloud = drawing.resample(777).unwrap();
    assert_eq!(cloud.len(), 777);

    // scale = 300 / 5 = 60 px per unit, so everything sits within the half-canvas
    assert!(cloud.points().all(|p| p.x.abs() <= 2.5 + 1e-4 && p.y.abs() <= 2.5 + 1e-4));
}

#[test]
fn test_degenerate_drawing_produces_no_shape() {
    let drawing = Drawing::new(vec![], 300.0, 300.0);
    assert_eq!(drawing.resample(100), Err(StrokeError::EmptyDrawing));

    let single: Stroke = [(4.0, 4.0)].into_iter().collect();
    let drawing = Drawing::new(vec![single, Stroke::default()], 300.0, 300.0);
    assert_eq!(drawing.resample(100), Err(StrokeError::TooFewPoints(1)));
}
