//! Property tests for the rasterizers and geometry.
//!
//! Run: cargo test --test raster_properties_test

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::BTreeSet;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use grayraster::compute::{PoolMode, RowRenderer, ScanlineEngine, ZoomSettings};
use grayraster::framebuffer::{DirtyRect, Framebuffer};
use grayraster::geometry::{convex_hull, Matrix2, Point2, Polygon, Vector2};
use grayraster::output::RecordingSurface;
use grayraster::render::{draw_line, ActiveEdgeFill, NaiveFill, PolygonFiller, Span};

type Edge = (i32, i32, i32, i32);

fn edges() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec((-20i32..80, -20i32..80, -20i32..80, -20i32..80), 0..24)
}

fn closed_polygon() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((-10i32..70, -10i32..70), 3..12)
}

fn spans_of<F: PolygonFiller>(mut filler: F, edges: &[Edge]) -> Vec<Span> {
    for &(x0, y0, x1, y1) in edges {
        filler.add_line(x0, y0, x1, y1);
    }
    filler.spans()
}

fn lit(fb: &Framebuffer) -> BTreeSet<(i32, i32)> {
    let mut set = BTreeSet::new();
    for y in 0..fb.height() as i32 {
        for x in 0..fb.width() as i32 {
            if fb.pixel(x, y) != Some(0) {
                set.insert((x, y));
            }
        }
    }
    set
}

fn int_points(coords: &[(i32, i32)]) -> Vec<Point2> {
    coords.iter().map(|&(x, y)| Point2::new(f64::from(x), f64::from(y))).collect()
}

// ============================================================================
// Fill engines
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Both engines emit the same spans for arbitrary edge soups
    #[test]
    fn prop_naive_and_active_edge_spans_identical(edges in edges()) {
        prop_assert_eq!(spans_of(NaiveFill::new(), &edges), spans_of(ActiveEdgeFill::new(), &edges));
    }

    /// Closed polygons fill the same pixels with either engine
    #[test]
    fn prop_engines_fill_identical_pixels(vertices in closed_polygon()) {
        let mut naive = NaiveFill::new();
        let mut active = ActiveEdgeFill::new();
        for (i, &(x0, y0)) in vertices.iter().enumerate() {
            let (x1, y1) = vertices[(i + 1) % vertices.len()];
            naive.add_line(x0, y0, x1, y1);
            active.add_line(x0, y0, x1, y1);
        }
        let mut a = Framebuffer::new(64, 64).unwrap();
        let mut b = Framebuffer::new(64, 64).unwrap();
        naive.fill(&mut a, 255);
        active.fill(&mut b, 255);
        prop_assert_eq!(a.to_compact_pixels(), b.to_compact_pixels());
    }

    /// Reset then re-adding the same edges reproduces the first fill
    #[test]
    fn prop_reset_is_idempotent(edges in edges(), other in edges()) {
        let mut filler = ActiveEdgeFill::new();
        for &(x0, y0, x1, y1) in &edges {
            filler.add_line(x0, y0, x1, y1);
        }
        let first = filler.spans();

        filler.reset();
        for &(x0, y0, x1, y1) in &other {
            filler.add_line(x0, y0, x1, y1);
        }
        let _ = filler.spans();

        filler.reset();
        for &(x0, y0, x1, y1) in &edges {
            filler.add_line(x0, y0, x1, y1);
        }
        prop_assert_eq!(filler.spans(), first);
    }

    /// Spans are sorted, non-empty and never overlap on a row
    #[test]
    fn prop_spans_ordered_and_disjoint(edges in edges()) {
        let spans = spans_of(ActiveEdgeFill::new(), &edges);
        for span in &spans {
            prop_assert!(span.x0 < span.x1);
        }
        for pair in spans.windows(2) {
            prop_assert!(pair[0].y <= pair[1].y);
            if pair[0].y == pair[1].y {
                prop_assert!(pair[0].x1 <= pair[1].x0);
            }
        }
    }
}

// ============================================================================
// Lines
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Swapping endpoints touches the same pixels
    #[test]
    fn prop_line_direction_independent(x1 in 0i32..48, y1 in 0i32..48, x2 in 0i32..48, y2 in 0i32..48) {
        let mut forward = Framebuffer::new(48, 48).unwrap();
        let mut backward = Framebuffer::new(48, 48).unwrap();
        draw_line(&mut forward, x1, y1, x2, y2, 255);
        draw_line(&mut backward, x2, y2, x1, y1, 255);
        prop_assert_eq!(lit(&forward), lit(&backward));
    }

    /// A line has max(|dx|, |dy|) + 1 pixels, including both endpoints
    #[test]
    fn prop_line_pixel_count(x1 in 0i32..48, y1 in 0i32..48, x2 in 0i32..48, y2 in 0i32..48) {
        let mut fb = Framebuffer::new(48, 48).unwrap();
        draw_line(&mut fb, x1, y1, x2, y2, 255);
        let pixels = lit(&fb);
        let expected = (x2 - x1).abs().max((y2 - y1).abs()) as usize + 1;
        prop_assert_eq!(pixels.len(), expected);
        prop_assert!(pixels.contains(&(x1, y1)));
        prop_assert!(pixels.contains(&(x2, y2)));
    }
}

// ============================================================================
// Framebuffer sessions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The single commit is the bounding box of every touched pixel
    #[test]
    fn prop_commit_is_bounding_box(pixels in prop::collection::vec((0i32..32, 0i32..24), 1..40)) {
        let mut fb = Framebuffer::with_surface(32, 24, RecordingSurface::new()).unwrap();
        {
            let mut session = fb.session();
            for &(x, y) in &pixels {
                session.set_pixel(x, y, 1);
            }
        }
        let mut expected = DirtyRect::EMPTY;
        for &(x, y) in &pixels {
            expected.include(x, y);
        }
        prop_assert_eq!(fb.surface().commits(), &[expected]);
    }
}

// ============================================================================
// Geometry
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every input point is inside or on the hull
    #[test]
    fn prop_hull_contains_all_points(coords in prop::collection::vec((-50i32..50, -50i32..50), 3..40)) {
        let points = int_points(&coords);
        let hull = convex_hull(&points);
        if hull.len() >= 3 {
            for p in &points {
                for i in 0..hull.len() {
                    let a = hull[i];
                    let b = hull[(i + 1) % hull.len()];
                    prop_assert!((b - a).cross(*p - a) >= 0.0, "{} outside edge {} -> {}", p, a, b);
                }
            }
        } else if hull.len() == 2 {
            let (a, b) = (hull[0], hull[1]);
            for p in &points {
                prop_assert_eq!((b - a).cross(*p - a), 0.0);
            }
        }
    }

    /// Hull vertices come from the input and turn strictly the same way
    #[test]
    fn prop_hull_subset_and_consistent_order(coords in prop::collection::vec((-50i32..50, -50i32..50), 3..40)) {
        let points = int_points(&coords);
        let hull = convex_hull(&points);
        for h in &hull {
            prop_assert!(points.contains(h));
        }
        if hull.len() >= 3 {
            for i in 0..hull.len() {
                let a = hull[i];
                let b = hull[(i + 1) % hull.len()];
                let c = hull[(i + 2) % hull.len()];
                prop_assert!((b - a).cross(c - a) > 0.0);
            }
        }
    }

    /// Transforming by M then M⁻¹ restores the polygon
    #[test]
    fn prop_transform_round_trip(
        coords in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..16),
        theta in -3.2f64..3.2,
        scale in 0.1f64..10.0,
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let polygon = Polygon::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()).unwrap();
        let m = Matrix2::rotation(theta) * Matrix2::scaling(scale) * Matrix2::translation(Vector2::new(dx, dy));
        let inverse = m.inverse().unwrap();
        let back = &(&polygon * m) * inverse;
        for (p, q) in polygon.points().iter().zip(back.points()) {
            assert_abs_diff_eq!(p.x, q.x, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y, q.y, epsilon = 1e-9);
        }

        let same = &polygon * Matrix2::IDENTITY;
        prop_assert_eq!(same.points(), polygon.points());
    }
}

// ============================================================================
// Parallel engine
// ============================================================================

#[test]
fn test_pool_modes_render_identical_frames() {
    let settings = ZoomSettings::default();
    let persistent = ScanlineEngine::new(PoolMode::Persistent, 0).unwrap();
    let scoped = ScanlineEngine::new(PoolMode::Scoped, 0).unwrap();
    for frame in [0, 7, 40] {
        let view = settings.view(frame, 96, 64).unwrap();
        let mut a = Framebuffer::new(96, 64).unwrap();
        let mut b = Framebuffer::new(96, 64).unwrap();
        persistent.render(&mut a, &view).unwrap();
        scoped.render(&mut b, &view).unwrap();
        assert_eq!(a.to_compact_pixels(), b.to_compact_pixels());

        let mut row = vec![0; 96];
        view.render_row(31, &mut row).unwrap();
        assert_eq!(a.row(31).unwrap(), row.as_slice());
    }
}

#[test]
fn test_square_scenario_fills_100_pixels() {
    let square = Polygon::new(int_points(&[(0, 0), (10, 0), (10, 10), (0, 10)])).unwrap();
    let mut fb = Framebuffer::new(20, 20).unwrap();
    let mut fill = ActiveEdgeFill::new();
    fill.add_polygon(&square, &Matrix2::IDENTITY);
    fill.fill(&mut fb, 255);
    let pixels = lit(&fb);
    assert_eq!(pixels.len(), 100);
    assert!(pixels.iter().all(|&(x, y)| (0..10).contains(&x) && (0..10).contains(&y)));
}
