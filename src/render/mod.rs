//! Rasterization into a [`Framebuffer`](crate::framebuffer::Framebuffer).
//!
//! # Algorithms
//!
//! - **Bresenham's Line**: integer-only 8-connected lines with a horizontal fast path
//! - **Thick lines**: an 8-vertex capped outline filled as a polygon
//! - **Scanline fill**: even-odd polygon fill, naive and active-edge-list variants
//!
//! # References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."
//! - Foley, J. D. et al. (1990). "Computer Graphics: Principles and Practice", §3.6.

mod fill;
mod line;
mod scene;

pub use fill::{ActiveEdgeFill, NaiveFill, PolygonFiller, Span};
pub use line::{draw_line, Stroker};
pub use scene::{fill_drawing, outline_drawing, stroke_drawing};
