//! 2D affine transforms.
//!
//! Points are row vectors: `p' = p · M`. Composition follows the same
//! convention, so `(p * a) * b == p * (a * b)`: the left operand is applied
//! first.

use std::ops::Mul;

use super::point::{Point2, Vector2};

/// A 2D affine transform: a 2x2 linear part plus a translation.
///
/// ```text
/// [x' y' 1] = [x y 1] · | m11 m12 0 |
///                       | m21 m22 0 |
///                       | dx  dy  1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2 {
    /// Row 1, column 1.
    pub m11: f64,
    /// Row 1, column 2.
    pub m12: f64,
    /// Row 2, column 1.
    pub m21: f64,
    /// Row 2, column 2.
    pub m22: f64,
    /// X translation.
    pub dx: f64,
    /// Y translation.
    pub dy: f64,
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2 {
    /// The neutral transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create a matrix from its six components.
    #[must_use]
    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> Self {
        Self { m11, m12, m21, m22, dx, dy }
    }

    /// Counter-clockwise rotation (in a y-up frame) by `theta` radians about the origin.
    #[must_use]
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `theta` radians about `center`.
    #[must_use]
    pub fn rotation_about(center: Point2, theta: f64) -> Self {
        let to_origin = Vector2::new(-center.x, -center.y);
        Self::translation(to_origin) * Self::rotation(theta) * Self::translation(-to_origin)
    }

    /// Uniform scaling about the origin.
    #[must_use]
    pub const fn scaling(factor: f64) -> Self {
        Self::scaling_xy(factor, factor)
    }

    /// Non-uniform scaling about the origin.
    #[must_use]
    pub const fn scaling_xy(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Translation by `v`.
    #[must_use]
    pub const fn translation(v: Vector2) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, v.x, v.y)
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// The inverse transform, or `None` if the linear part is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m11 = self.m22 / det;
        let m12 = -self.m12 / det;
        let m21 = -self.m21 / det;
        let m22 = self.m11 / det;
        let dx = -(self.dx * m11 + self.dy * m21);
        let dy = -(self.dx * m12 + self.dy * m22);
        Some(Self::new(m11, m12, m21, m22, dx, dy))
    }

    /// Apply the full transform to a point.
    #[must_use]
    pub fn transform_point(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.m11 + p.y * self.m21 + self.dx,
            p.x * self.m12 + p.y * self.m22 + self.dy,
        )
    }

    /// Apply only the linear part to a vector.
    #[must_use]
    pub fn transform_vector(&self, v: Vector2) -> Vector2 {
        Vector2::new(v.x * self.m11 + v.y * self.m21, v.x * self.m12 + v.y * self.m22)
    }
}

/// `a * b` applies `a` first, then `b`.
impl Mul for Matrix2 {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.m11 * b.m11 + a.m12 * b.m21,
            a.m11 * b.m12 + a.m12 * b.m22,
            a.m21 * b.m11 + a.m22 * b.m21,
            a.m21 * b.m12 + a.m22 * b.m22,
            a.dx * b.m11 + a.dy * b.m21 + b.dx,
            a.dx * b.m12 + a.dy * b.m22 + b.dy,
        )
    }
}

impl Mul<Matrix2> for Point2 {
    type Output = Self;

    fn mul(self, m: Matrix2) -> Self {
        m.transform_point(self)
    }
}

impl Mul<Matrix2> for Vector2 {
    type Output = Self;

    fn mul(self, m: Matrix2) -> Self {
        m.transform_vector(self)
    }
}
