//! Points, vectors and line segments in double precision.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A location in 2D space with double-precision coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2 {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert to device-space integer coordinates, rounding half up.
    ///
    /// Coordinates outside the `i32` range saturate to `i32::MIN` or
    /// `i32::MAX`, and NaN becomes 0. Use [`try_round`](Self::try_round)
    /// to reject such points instead.
    ///
    /// ```
    /// use grayraster::geometry::Point2;
    ///
    /// assert_eq!(Point2::new(2.5, -0.5).round(), (3, 0));
    /// assert_eq!(Point2::new(2.49, -0.51).round(), (2, -1));
    /// ```
    #[must_use]
    pub fn round(self) -> (i32, i32) {
        ((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }

    /// Like [`round`](Self::round), but `None` when a rounded coordinate is
    /// NaN or does not fit in `i32`.
    ///
    /// ```
    /// use grayraster::geometry::Point2;
    ///
    /// assert_eq!(Point2::new(-1.5, 7.2).try_round(), Some((-1, 7)));
    /// assert_eq!(Point2::new(3e9, 0.0).try_round(), None);
    /// assert_eq!(Point2::new(0.0, f64::NAN).try_round(), None);
    /// ```
    #[must_use]
    pub fn try_round(self) -> Option<(i32, i32)> {
        let fit = |v: f64| {
            let r = (v + 0.5).floor();
            (r >= f64::from(i32::MIN) && r <= f64::from(i32::MAX)).then_some(r as i32)
        };
        Some((fit(self.x)?, fit(self.y)?))
    }

    /// Polar angle (radians) of the direction from `self` to `other`.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// The point at distance `radius` from `self` along angle `theta`.
    #[must_use]
    pub fn radial_move(self, radius: f64, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(self.x + radius * cos, self.y + radius * sin)
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", round6(self.x), round6(self.y))
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

impl Sub for Point2 {
    type Output = Vector2;

    fn sub(self, rhs: Self) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector2> for Point2 {
    type Output = Self;

    fn add(self, rhs: Vector2) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign<Vector2> for Point2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Vector2> for Point2 {
    type Output = Self;

    fn sub(self, rhs: Vector2) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A displacement in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product (`self × other`).
    ///
    /// Positive when `other` is counter-clockwise from `self` in a y-up frame.
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The vector rotated by +90 degrees.
    #[must_use]
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    #[must_use]
    pub fn try_normalized(self) -> Option<Self> {
        let len = self.length();
        (len > 0.0 && len.is_finite()).then(|| Self::new(self.x / len, self.y / len))
    }

    /// Unit vector in the same direction.
    ///
    /// # Panics
    ///
    /// Panics if the vector has zero length; guard with
    /// [`try_normalized`](Self::try_normalized) when that can happen.
    #[must_use]
    #[track_caller]
    pub fn normalized(self) -> Self {
        match self.try_normalized() {
            Some(unit) => unit,
            None => panic!("cannot normalize zero-length vector {self:?}"),
        }
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A directed line segment (A -> B).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    /// Start point.
    pub a: Point2,
    /// End point.
    pub b: Point2,
}

impl Line {
    /// Create a new line segment.
    #[must_use]
    pub const fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    /// Create a line from coordinates.
    #[must_use]
    pub const fn from_coords(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(Point2::new(x0, y0), Point2::new(x1, y1))
    }

    /// Get the length of the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Both endpoints rounded to device space, saturating like [`Point2::round`].
    #[must_use]
    pub fn round(&self) -> ((i32, i32), (i32, i32)) {
        (self.a.round(), self.b.round())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_round_half_up() {
        assert_eq!(Point2::new(0.5, 1.5).round(), (1, 2));
        assert_eq!(Point2::new(-1.5, -0.4).round(), (-1, 0));
        assert_eq!(Point2::new(3.0, 7.0).round(), (3, 7));
    }

    #[test]
    fn test_round_saturates_and_try_round_rejects() {
        let far = Point2::new(1e12, -1e12);
        assert_eq!(far.round(), (i32::MAX, i32::MIN));
        assert_eq!(far.try_round(), None);
        assert_eq!(Point2::new(f64::NAN, 1.0).round(), (0, 1));
        assert_eq!(Point2::new(f64::NAN, 1.0).try_round(), None);

        let edge = Point2::new(f64::from(i32::MAX) - 0.6, f64::from(i32::MIN));
        assert_eq!(edge.try_round(), Some((i32::MAX - 1, i32::MIN)));
        assert_eq!(Point2::new(f64::from(i32::MAX) + 0.5, 0.0).try_round(), None);
    }

    #[test]
    fn test_angle_to() {
        let o = Point2::ORIGIN;
        assert_relative_eq!(o.angle_to(Point2::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(o.angle_to(Point2::new(0.0, 2.0)), PI / 2.0);
        assert_relative_eq!(o.angle_to(Point2::new(-1.0, 0.0)), PI);
    }

    #[test]
    fn test_radial_move() {
        let p = Point2::new(1.0, 1.0).radial_move(2.0, PI / 2.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_radial_move_inverts_angle_to() {
        let a = Point2::new(3.0, -2.0);
        let b = Point2::new(-4.0, 5.0);
        let back = a.radial_move(a.distance(b), a.angle_to(b));
        assert_relative_eq!(back.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, b.y, epsilon = 1e-9);
    }

    #[test]
    fn test_vector_ops() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, -1.0);
        assert_eq!(a + b, Vector2::new(4.0, 1.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_relative_eq!(a.dot(b), 1.0);
        assert_relative_eq!(a.cross(b), -7.0);
        assert_relative_eq!(Vector2::new(1.0, 0.0).cross(Vector2::new(0.0, 1.0)), 1.0);
    }

    #[test]
    fn test_normalized() {
        let v = Vector2::new(3.0, 4.0).normalized();
        assert_relative_eq!(v.x, 0.6);
        assert_relative_eq!(v.y, 0.8);
        assert_relative_eq!(v.length(), 1.0);
    }

    #[test]
    fn test_try_normalized_zero() {
        assert!(Vector2::ZERO.try_normalized().is_none());
    }

    #[test]
    #[should_panic(expected = "zero-length")]
    fn test_normalized_zero_panics() {
        let _ = Vector2::ZERO.normalized();
    }

    #[test]
    fn test_point_vector_arithmetic() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(4.0, 5.0);
        let d = b - a;
        assert_eq!(d, Vector2::new(3.0, 4.0));
        assert_eq!(a + d, b);
        assert_relative_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn test_line_display() {
        let line = Line::from_coords(0.0, 0.0, 1.5, 2.0);
        assert_eq!(line.to_string(), "(0, 0) -> (1.5, 2)");
        assert_relative_eq!(line.length(), 2.5);
    }
}
