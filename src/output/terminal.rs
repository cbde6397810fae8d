//! Terminal preview of a grayscale framebuffer.
//!
//! Renders a framebuffer to terminal-compatible text:
//! - ASCII: uses the ramp ` .:-=+*#%@` from dark to light
//! - Unicode: half-block characters (▀) with 24-bit gray escapes, two
//!   pixel rows per text row

use std::fmt::Write as FmtWrite;

use crate::framebuffer::Framebuffer;
use crate::output::Surface;

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// ASCII grayscale characters (widest compatibility)
    #[default]
    Ascii,
    /// Unicode half-block characters (2x vertical resolution)
    UnicodeHalfBlock,
}

/// Terminal encoder configuration.
#[derive(Debug, Clone)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    width: Option<u32>,
    height: Option<u32>,
    invert: bool,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEncoder {
    /// ASCII grayscale ramp from dark to light (10 levels).
    const ASCII_RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Create a new terminal encoder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { mode: TerminalMode::default(), width: None, height: None, invert: false }
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the target width in characters.
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the target height in text rows.
    /// If not set, calculates from width to preserve aspect ratio.
    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Invert the output (light on dark vs dark on light).
    #[must_use]
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Render a framebuffer to a string.
    #[must_use]
    pub fn render<S: Surface>(&self, fb: &Framebuffer<S>) -> String {
        match self.mode {
            TerminalMode::Ascii => self.render_ascii(fb),
            TerminalMode::UnicodeHalfBlock => self.render_unicode_half_block(fb),
        }
    }

    fn render_ascii<S: Surface>(&self, fb: &Framebuffer<S>) -> String {
        let (target_w, target_h) = self.compute_dimensions(fb, 2.0);
        let mut output = String::with_capacity((target_w + 1) as usize * target_h as usize);

        let scale_x = fb.width() as f32 / target_w as f32;
        let scale_y = fb.height() as f32 / target_h as f32;

        for y in 0..target_h {
            for x in 0..target_w {
                let gray = self.sample(fb, x, y, scale_x, scale_y);
                output.push(Self::ASCII_RAMP[Self::ramp_index(gray)]);
            }
            output.push('\n');
        }

        output
    }

    fn render_unicode_half_block<S: Surface>(&self, fb: &Framebuffer<S>) -> String {
        let (target_w, target_h) = self.compute_dimensions(fb, 1.0);
        // Round up to even height for half-blocks
        let target_h = (target_h + 1) & !1;

        let mut output = String::with_capacity((target_w * 40 + 8) as usize * (target_h / 2) as usize);

        let scale_x = fb.width() as f32 / target_w as f32;
        let scale_y = fb.height() as f32 / target_h as f32;

        for y in (0..target_h).step_by(2) {
            for x in 0..target_w {
                let top = self.sample(fb, x, y, scale_x, scale_y);
                let bottom = self.sample(fb, x, y + 1, scale_x, scale_y);
                // ▀ U+2580: foreground paints the top pixel, background the bottom
                let _ = write!(output, "\x1b[38;2;{top};{top};{top}m\x1b[48;2;{bottom};{bottom};{bottom}m▀");
            }
            output.push_str("\x1b[0m\n");
        }

        output
    }

    /// Compute target dimensions preserving aspect ratio.
    /// `char_aspect` is the approximate height/width ratio of a character cell.
    fn compute_dimensions<S: Surface>(&self, fb: &Framebuffer<S>, char_aspect: f32) -> (u32, u32) {
        let fb_aspect = fb.width() as f32 / fb.height() as f32;

        match (self.width, self.height) {
            (Some(w), Some(h)) => (w.max(1), h.max(1)),
            (Some(w), None) => {
                let h = (w as f32 / fb_aspect / char_aspect).round() as u32;
                (w.max(1), h.max(1))
            }
            (None, Some(h)) => {
                let w = (h as f32 * fb_aspect * char_aspect).round() as u32;
                (w.max(1), h.max(1))
            }
            (None, None) => {
                // Default to 80 characters wide
                let w = 80u32.min(fb.width());
                let h = (w as f32 / fb_aspect / char_aspect).round() as u32;
                (w, h.max(1))
            }
        }
    }

    /// Nearest-neighbour sample at a scaled position.
    fn sample<S: Surface>(&self, fb: &Framebuffer<S>, x: u32, y: u32, scale_x: f32, scale_y: f32) -> u8 {
        let fx = (x as f32 * scale_x).min((fb.width() - 1) as f32);
        let fy = (y as f32 * scale_y).min((fb.height() - 1) as f32);
        let gray = fb.pixel(fx as i32, fy as i32).unwrap_or(0);
        if self.invert {
            255 - gray
        } else {
            gray
        }
    }

    fn ramp_index(gray: u8) -> usize {
        let last = Self::ASCII_RAMP.len() - 1;
        ((f32::from(gray) / 255.0 * last as f32).round() as usize).min(last)
    }

    /// Write output directly to stdout.
    pub fn print<S: Surface>(&self, fb: &Framebuffer<S>) {
        print!("{}", self.render(fb));
    }
}
