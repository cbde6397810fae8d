//! Convex hull by Graham scan.

use std::cmp::Ordering;

use super::point::Point2;

/// Compute the convex hull of an unordered point set.
///
/// The pivot is the lowest point (smallest `y`, then smallest `x`); the other
/// points are sorted by polar angle around it and folded into a stack that
/// only ever turns left. The result is counter-clockwise in a y-up frame
/// (clockwise on a y-down display), starts at the pivot and contains no
/// collinear or duplicate points.
///
/// Fewer than three distinct input points are returned as-is (deduplicated).
///
/// ```
/// use grayraster::geometry::{convex_hull, Point2};
///
/// let pts = [
///     Point2::new(0.0, 0.0),
///     Point2::new(4.0, 0.0),
///     Point2::new(2.0, 1.0),
///     Point2::new(4.0, 4.0),
///     Point2::new(0.0, 4.0),
/// ];
/// let hull = convex_hull(&pts);
/// assert_eq!(hull.len(), 4);
/// assert!(!hull.contains(&Point2::new(2.0, 1.0)));
/// ```
#[must_use]
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let Some(pivot) = points.iter().copied().min_by(|a, b| lowest_first(*a, *b)) else {
        return Vec::new();
    };

    let mut rest: Vec<Point2> = points.iter().copied().filter(|&p| p != pivot).collect();
    rest.sort_by(|&a, &b| by_polar_angle(pivot, a, b));
    rest.dedup();

    let mut hull = Vec::with_capacity(rest.len() + 1);
    hull.push(pivot);
    for p in rest {
        while hull.len() >= 2 {
            let top = hull[hull.len() - 1];
            let below = hull[hull.len() - 2];
            if (top - below).cross(p - below) > 0.0 {
                break;
            }
            hull.pop();
        }
        hull.push(p);
    }
    // A nearer point sorted after a farther one on the last ray survives the scan.
    while hull.len() >= 3 {
        let top = hull[hull.len() - 1];
        let below = hull[hull.len() - 2];
        if (top - below).cross(pivot - below) > 0.0 {
            break;
        }
        hull.pop();
    }
    hull
}

/// Orders by `y`, then `x`.
fn lowest_first(a: Point2, b: Point2) -> Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

/// Polar angle around `pivot`, nearer first on ties.
///
/// Every point lies at an angle in `[0, π)` from the pivot. The angle is
/// compared as a float key so the order stays total for nearly collinear
/// points; the exact turn test is left to the stack.
fn by_polar_angle(pivot: Point2, a: Point2, b: Point2) -> Ordering {
    let (da, db) = (a - pivot, b - pivot);
    pivot
        .angle_to(a)
        .total_cmp(&pivot.angle_to(b))
        .then_with(|| da.dot(da).total_cmp(&db.dot(db)))
}
