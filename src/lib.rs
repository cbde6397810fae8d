//! # grayraster
//!
//! Software rasterization into 8-bit grayscale framebuffers.
//!
//! ## Features
//!
//! - **Sessions**: reentrant `begin`/`end` locking with one dirty-rectangle commit
//!   per outermost session
//! - **Geometry**: points, vectors, affine matrices, bounds, polygons, convex hulls
//! - **Lines**: integer Bresenham with a horizontal fast path, filled thick lines
//! - **Polygon fill**: even-odd scanline fill, naive and active-edge-list engines
//!   producing identical spans
//! - **Parallel rows**: a row-claiming worker pool (persistent rayon pool or
//!   scoped threads) driving an escape-time Mandelbrot field
//!
//! ## Quick Start
//!
//! ```rust
//! use grayraster::prelude::*;
//!
//! let mut fb = Framebuffer::new(20, 20)?;
//!
//! let mut fill = ActiveEdgeFill::new();
//! fill.add_line(0, 0, 10, 0);
//! fill.add_line(10, 0, 10, 10);
//! fill.add_line(10, 10, 0, 10);
//! fill.add_line(0, 10, 0, 0);
//! fill.fill(&mut fb, 255);
//!
//! draw_line(&mut fb, 0, 19, 19, 12, 128);
//! assert_eq!(fb.pixel(5, 5), Some(255));
//! # Ok::<(), grayraster::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli`: the `grayraster` headless frame driver binary
//!
//! ## References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."
//! - Graham, R. L. (1972). "An efficient algorithm for determining the convex hull
//!   of a finite planar set."

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in rasterization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Core framebuffer with lock sessions and dirty tracking.
pub mod framebuffer;

/// Geometric primitives (points, vectors, matrices, polygons, hulls).
pub mod geometry;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Line and polygon rasterization.
pub mod render;

/// Parallel per-row computation.
pub mod compute;

/// Commit surfaces and terminal preview.
pub mod output;

/// YAML render configuration.
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for grayraster operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use grayraster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compute::{escape, Complex, MandelbrotView, PoolMode, RowRenderer, ScanlineEngine};
    pub use crate::config::RenderConfig;
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::{DirtyRect, Framebuffer, Session};
    pub use crate::geometry::{convex_hull, Bound2, Drawing, Line, Matrix2, Point2, Polygon, Vector2};
    pub use crate::output::{NullSurface, RecordingSurface, Surface, TerminalEncoder};
    pub use crate::render::{
        draw_line, fill_drawing, outline_drawing, stroke_drawing, ActiveEdgeFill, NaiveFill,
        PolygonFiller, Span, Stroker,
    };
}
