//! Configuration for headless frame rendering.
//!
//! YAML with per-field defaults; every key is optional.
//!
//! ```yaml
//! width: 800
//! height: 600
//! workers: 0          # 0 = host parallelism
//! pool: persistent    # or: scoped
//! frames: 60
//! mandelbrot:
//!   center_x: -0.59990625
//!   center_y: -0.42907020097
//!   zoom: 1000.0
//!   zoom_rate: 1.02
//!   max_iterations: 255
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::{PoolMode, ZoomSettings};
use crate::error::{Error, Result};

/// Frame rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Framebuffer width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Framebuffer height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Worker count for the scanline engine (0 = host parallelism).
    #[serde(default)]
    pub workers: usize,

    /// Worker pool strategy.
    #[serde(default)]
    pub pool: PoolMode,

    /// Number of frames to render.
    #[serde(default = "default_frames")]
    pub frames: u32,

    /// Mandelbrot zoom animation.
    #[serde(default)]
    pub mandelbrot: ZoomSettings,
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_frames() -> u32 {
    1
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            workers: 0,
            pool: PoolMode::default(),
            frames: default_frames(),
            mandelbrot: ZoomSettings::default(),
        }
    }
}

impl RenderConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with the line number if parsing fails, or the first
    /// failed [`validate`](Self::validate) check.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::Config(format!("line {line}: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::debug!("using default render config: {err}");
                Self::default()
            }
        }
    }

    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || i32::try_from(self.width.max(self.height)).is_err() {
            return Err(Error::Config(format!("invalid size {}x{}", self.width, self.height)));
        }
        let m = &self.mandelbrot;
        if !(m.zoom.is_finite() && m.zoom > 0.0) {
            return Err(Error::Config(format!("mandelbrot.zoom must be positive, got {}", m.zoom)));
        }
        if !(m.zoom_rate.is_finite() && m.zoom_rate > 0.0) {
            return Err(Error::Config(format!("mandelbrot.zoom_rate must be positive, got {}", m.zoom_rate)));
        }
        if m.max_iterations < 2 {
            return Err(Error::Config(format!("mandelbrot.max_iterations must be at least 2, got {}", m.max_iterations)));
        }
        Ok(())
    }
}
