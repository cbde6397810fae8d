//! Escape-time Mandelbrot field.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::compute::pool::RowRenderer;
use crate::error::{Error, Result};

/// Default iteration cap; escape counts are stored in a byte.
pub const DEFAULT_MAX_ITERATIONS: u32 = 255;

/// A complex number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Zero.
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    /// Create a complex number.
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Squared magnitude, `re² + im²`.
    #[must_use]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.re * rhs.re - self.im * rhs.im, self.re * rhs.im + self.im * rhs.re)
    }
}

/// Escape count of `c` under `z ← z² + c`, starting from `z = 0`.
///
/// Returns the first iteration `i` in `1..max_iterations` at which
/// `|z|² > 4`, clamped to 255, or 0 if `c` never escapes.
///
/// ```
/// use grayraster::compute::{escape, Complex};
///
/// assert_eq!(escape(Complex::ZERO, 255), 0);
/// assert_eq!(escape(Complex::new(2.0, 2.0), 255), 2);
/// ```
#[must_use]
pub fn escape(c: Complex, max_iterations: u32) -> u8 {
    let mut z = Complex::ZERO;
    for i in 1..max_iterations {
        if z.norm_sq() > 4.0 {
            return i.min(255) as u8;
        }
        z = z * z + c;
    }
    0
}

/// A framing of the complex plane onto a `width x height` buffer.
///
/// The buffer height spans `2 / zoom` units; pixels are square and row 0 is
/// the top (largest imaginary part).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotView {
    /// Complex coordinate of pixel (0, 0).
    origin: Complex,
    /// Plane units per pixel.
    step: f64,
    width: u32,
    height: u32,
    max_iterations: u32,
}

impl MandelbrotView {
    /// Frame `center` at `zoom` onto a buffer of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-sized buffer or a zoom that is not a
    /// positive finite number.
    pub fn new(center: Complex, zoom: f64, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(Error::Rendering(format!("zoom must be positive and finite, got {zoom}")));
        }
        let step = 2.0 / f64::from(height) / zoom;
        let origin = Complex::new(
            center.re - step * f64::from(width) / 2.0,
            center.im + step * f64::from(height) / 2.0,
        );
        Ok(Self { origin, step, width, height, max_iterations: DEFAULT_MAX_ITERATIONS })
    }

    /// Set the iteration cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Plane units per pixel.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// The complex point sampled by pixel `(x, y)`.
    #[must_use]
    pub fn point(&self, x: u32, y: u32) -> Complex {
        Complex::new(self.origin.re + f64::from(x) * self.step, self.origin.im - f64::from(y) * self.step)
    }
}

impl RowRenderer for MandelbrotView {
    fn render_row(&self, y: u32, row: &mut [u8]) -> Result<()> {
        if y >= self.height || row.len() != self.width as usize {
            return Err(Error::Rendering(format!(
                "row {y} of {} pixels does not fit a {}x{} view",
                row.len(),
                self.width,
                self.height
            )));
        }
        let im = self.origin.im - f64::from(y) * self.step;
        for (x, px) in (0_u32..).zip(row.iter_mut()) {
            *px = escape(Complex::new(self.origin.re + f64::from(x) * self.step, im), self.max_iterations);
        }
        Ok(())
    }
}

/// A zoom animation into a fixed center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    /// Real part of the zoom center.
    #[serde(default = "default_center_x")]
    pub center_x: f64,
    /// Imaginary part of the zoom center.
    #[serde(default = "default_center_y")]
    pub center_y: f64,
    /// Zoom of the first frame.
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Factor applied to the zoom after each frame.
    #[serde(default = "default_zoom_rate")]
    pub zoom_rate: f64,
    /// Iteration cap per pixel.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_center_x() -> f64 {
    -0.599_906_25
}
fn default_center_y() -> f64 {
    -0.429_070_200_97
}
fn default_zoom() -> f64 {
    1000.0
}
fn default_zoom_rate() -> f64 {
    1.02
}
fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            center_x: default_center_x(),
            center_y: default_center_y(),
            zoom: default_zoom(),
            zoom_rate: default_zoom_rate(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl ZoomSettings {
    /// The zoom center.
    #[must_use]
    pub const fn center(&self) -> Complex {
        Complex::new(self.center_x, self.center_y)
    }

    /// Zoom level of frame `frame` (0-based).
    #[must_use]
    pub fn zoom_at(&self, frame: u32) -> f64 {
        self.zoom * self.zoom_rate.powi(frame as i32)
    }

    /// The view for frame `frame` on a `width x height` buffer.
    ///
    /// # Errors
    ///
    /// See [`MandelbrotView::new`].
    pub fn view(&self, frame: u32, width: u32, height: u32) -> Result<MandelbrotView> {
        Ok(MandelbrotView::new(self.center(), self.zoom_at(frame), width, height)?
            .with_max_iterations(self.max_iterations))
    }
}
