//! Geometric primitives and transforms.
//!
//! World-space geometry is `f64`; [`Point2::round`] is the single bridge to
//! integer device space used by the rasterizers.

mod bound;
mod hull;
mod loader;
mod matrix;
mod point;
mod polygon;

pub use bound::Bound2;
pub use hull::convex_hull;
pub use loader::{
    load_line_drawing, load_polygon_drawing, parse_lines, parse_polygons, read_lines,
    read_polygons,
};
pub use matrix::Matrix2;
pub use point::{Line, Point2, Vector2};
pub use polygon::{Drawing, Polygon};
