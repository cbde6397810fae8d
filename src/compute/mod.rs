//! Parallel per-row computation into a framebuffer.
//!
//! [`ScanlineEngine`] distributes rows to workers; any [`RowRenderer`] can
//! be driven by it. [`MandelbrotView`] renders the escape-time field.

mod mandelbrot;
mod pool;

pub use mandelbrot::{escape, Complex, MandelbrotView, ZoomSettings, DEFAULT_MAX_ITERATIONS};
pub use pool::{PoolMode, RowRenderer, ScanlineEngine};
