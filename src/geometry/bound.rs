//! Axis-aligned bounding boxes.

use super::point::Point2;

/// An axis-aligned bounding box `[x0, x1] x [y0, y1]`.
///
/// The empty bound uses inverted infinite extrema so that folding any point
/// into it yields that point's degenerate box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound2 {
    /// Minimum X.
    pub x0: f64,
    /// Minimum Y.
    pub y0: f64,
    /// Maximum X.
    pub x1: f64,
    /// Maximum Y.
    pub y1: f64,
}

impl Default for Bound2 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bound2 {
    /// A bound containing nothing.
    pub const EMPTY: Self = Self {
        x0: f64::INFINITY,
        y0: f64::INFINITY,
        x1: f64::NEG_INFINITY,
        y1: f64::NEG_INFINITY,
    };

    /// Create a bound from explicit extrema.
    #[must_use]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest bound containing every point.
    #[must_use]
    pub fn from_points<I: IntoIterator<Item = Point2>>(points: I) -> Self {
        points.into_iter().fold(Self::EMPTY, Self::including)
    }

    /// Union of a set of bounds.
    #[must_use]
    pub fn from_bounds<I: IntoIterator<Item = Bound2>>(bounds: I) -> Self {
        bounds.into_iter().fold(Self::EMPTY, Self::union)
    }

    /// This bound grown to include `p`.
    #[must_use]
    pub fn including(self, p: Point2) -> Self {
        Self::new(self.x0.min(p.x), self.y0.min(p.y), self.x1.max(p.x), self.y1.max(p.y))
    }

    /// Smallest bound containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// True when the bound has no horizontal extent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Center of the box.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        Point2::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Check if a point lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    /// The box grown by `margin` on every side.
    #[must_use]
    pub fn inflated(&self, margin: f64) -> Self {
        Self::new(self.x0 - margin, self.y0 - margin, self.x1 + margin, self.y1 + margin)
    }
}
