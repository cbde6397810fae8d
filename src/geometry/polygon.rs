//! Closed polygons and drawings (collections of polygons and loose lines).

use std::ops::Mul;

use super::bound::Bound2;
use super::hull::convex_hull;
use super::matrix::Matrix2;
use super::point::{Line, Point2};
use crate::error::{Error, Result};

/// An ordered, closed sequence of points; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point2>,
    bound: Bound2,
}

impl Polygon {
    /// Create a polygon from its vertices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegeneratePolygon`] for fewer than two points.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::DegeneratePolygon { points: points.len() });
        }
        let bound = Bound2::from_points(points.iter().copied());
        Ok(Self { points, bound })
    }

    /// The vertices, in order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of vertices (and of edges).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: construction rejects empty polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the vertices.
    #[must_use]
    pub fn bound(&self) -> Bound2 {
        self.bound
    }

    /// The edges, including the closing edge from the last vertex to the first.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        let next = self.points.iter().cycle().skip(1);
        self.points.iter().zip(next).map(|(&a, &b)| Line::new(a, b))
    }

    /// A copy with every vertex transformed.
    #[must_use]
    pub fn transformed(&self, xfm: &Matrix2) -> Self {
        let points: Vec<Point2> = self.points.iter().map(|&p| p * *xfm).collect();
        let bound = Bound2::from_points(points.iter().copied());
        Self { points, bound }
    }
}

impl Mul<Matrix2> for &Polygon {
    type Output = Polygon;

    fn mul(self, xfm: Matrix2) -> Polygon {
        self.transformed(&xfm)
    }
}

/// An ordered collection of polygons and loose line segments.
///
/// The bound and convex hull are derived views refreshed by every mutation
/// ([`add`](Self::add), [`add_line`](Self::add_line)), never stored elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    polygons: Vec<Polygon>,
    lines: Vec<Line>,
    hull: Vec<Point2>,
    bound: Bound2,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawing {
    /// Create an empty drawing.
    #[must_use]
    pub fn new() -> Self {
        Self { polygons: Vec::new(), lines: Vec::new(), hull: Vec::new(), bound: Bound2::EMPTY }
    }

    /// Build a drawing from polygons.
    #[must_use]
    pub fn from_polygons<I: IntoIterator<Item = Polygon>>(polygons: I) -> Self {
        let mut dwg = Self::new();
        for poly in polygons {
            dwg.add(poly);
        }
        dwg
    }

    /// Build a drawing from loose line segments.
    #[must_use]
    pub fn from_lines<I: IntoIterator<Item = Line>>(lines: I) -> Self {
        let mut dwg = Self::new();
        for line in lines {
            dwg.add_line(line);
        }
        dwg
    }

    /// Add a polygon, refreshing the bound and hull.
    pub fn add(&mut self, polygon: Polygon) {
        self.bound = self.bound.union(polygon.bound());
        self.absorb_hull(polygon.points());
        self.polygons.push(polygon);
    }

    /// Add a loose line segment, refreshing the bound and hull.
    pub fn add_line(&mut self, line: Line) {
        self.bound = self.bound.including(line.a).including(line.b);
        self.absorb_hull(&[line.a, line.b]);
        self.lines.push(line);
    }

    /// The polygons, in insertion order.
    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// The loose line segments, in insertion order.
    #[must_use]
    pub fn loose_lines(&self) -> &[Line] {
        &self.lines
    }

    /// Every edge: polygon edges first, then loose lines.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.polygons.iter().flat_map(Polygon::lines).chain(self.lines.iter().copied())
    }

    /// True when the drawing has no polygons and no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.lines.is_empty()
    }

    /// Convex hull of every point in the drawing.
    #[must_use]
    pub fn hull(&self) -> &[Point2] {
        &self.hull
    }

    /// Bounding box of every point in the drawing.
    #[must_use]
    pub fn bound(&self) -> Bound2 {
        self.bound
    }

    /// A copy with every polygon and line transformed.
    #[must_use]
    pub fn transformed(&self, xfm: &Matrix2) -> Self {
        let mut dwg = Self::from_polygons(self.polygons.iter().map(|p| p.transformed(xfm)));
        for line in &self.lines {
            dwg.add_line(Line::new(line.a * *xfm, line.b * *xfm));
        }
        dwg
    }

    // The hull of (old hull + new points) is the hull of everything seen so far.
    fn absorb_hull(&mut self, points: &[Point2]) {
        let mut candidates = std::mem::take(&mut self.hull);
        candidates.extend_from_slice(points);
        self.hull = convex_hull(&candidates);
    }
}

impl Mul<Matrix2> for &Drawing {
    type Output = Drawing;

    fn mul(self, xfm: Matrix2) -> Drawing {
        self.transformed(&xfm)
    }
}
