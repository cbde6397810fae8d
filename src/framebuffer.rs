//! Core 8-bit grayscale framebuffer.
//!
//! All mutation goes through a reentrant lock session. The outermost
//! [`begin`](Framebuffer::begin) locks the [`Surface`] and resets the dirty
//! rectangle; every pixel write inside the session grows that rectangle; the
//! matching outermost [`end`](Framebuffer::end) commits it exactly once and
//! unlocks. Nested `begin`/`end` pairs share the outer session, so the
//! drawing primitives wrap themselves in one and are safe to call on their
//! own or inside a larger batch.
//!
//! Usage faults panic: touching the raw buffer outside a session, an `end`
//! without a `begin`, and out-of-range pixels.

use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};
use crate::output::{NullSurface, Surface};

/// Row alignment in bytes; the stride is the width rounded up to this.
const ROW_ALIGNMENT: usize = 4;

/// An inclusive pixel rectangle `[x0, x1] x [y0, y1]`.
///
/// The empty rectangle uses inverted extrema, so folding any pixel into it
/// yields that single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyRect {
    /// Leftmost column.
    pub x0: i32,
    /// Top row.
    pub y0: i32,
    /// Rightmost column (inclusive).
    pub x1: i32,
    /// Bottom row (inclusive).
    pub y1: i32,
}

impl Default for DirtyRect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl DirtyRect {
    /// The rectangle covering nothing.
    pub const EMPTY: Self = Self { x0: i32::MAX, y0: i32::MAX, x1: i32::MIN, y1: i32::MIN };

    /// Create a rectangle from inclusive corners.
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// True when no pixel has been included.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    /// Width in pixels (0 when empty).
    #[must_use]
    pub const fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (self.x1 - self.x0 + 1) as u32
        }
    }

    /// Height in pixels (0 when empty).
    #[must_use]
    pub const fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (self.y1 - self.y0 + 1) as u32
        }
    }

    /// Grow to include the pixel `(x, y)`.
    pub fn include(&mut self, x: i32, y: i32) {
        self.x0 = self.x0.min(x);
        self.x1 = self.x1.max(x);
        self.y0 = self.y0.min(y);
        self.y1 = self.y1.max(y);
    }

    /// Check if the pixel `(x, y)` lies inside.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// A `width x height` grid of gray bytes with a padded row stride.
///
/// Generic over the [`Surface`] that receives commits; the default
/// [`NullSurface`] makes it a plain off-screen buffer.
#[derive(Debug)]
pub struct Framebuffer<S: Surface = NullSurface> {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Stride in bytes (width plus alignment padding).
    stride: usize,
    /// Gray samples in row-major order, `stride * height` bytes.
    pixels: Vec<u8>,
    /// Number of unmatched `begin` calls.
    locks: u32,
    /// Region touched during the current outermost session.
    dirty: DirtyRect,
    surface: S,
}

impl Framebuffer<NullSurface> {
    /// Create an off-screen framebuffer with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero or does not fit an `i32`.
    ///
    /// # Example
    ///
    /// ```
    /// use grayraster::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert!(fb.stride() >= 800);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_surface(width, height, NullSurface)
    }
}

impl<S: Surface> Framebuffer<S> {
    /// Create a framebuffer that commits into `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero or does not fit an `i32`.
    pub fn with_surface(width: u32, height: u32, surface: S) -> Result<Self> {
        if width == 0 || height == 0 || i32::try_from(width.max(height)).is_err() {
            return Err(Error::InvalidDimensions { width, height });
        }

        let stride = (width as usize + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        let pixels = vec![0; stride * height as usize];

        Ok(Self { width, height, stride, pixels, locks: 0, dirty: DirtyRect::EMPTY, surface })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the stride (row width in bytes, including padding).
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The surface receiving commits.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Number of unmatched [`begin`](Self::begin) calls.
    #[must_use]
    pub const fn lock_depth(&self) -> u32 {
        self.locks
    }

    /// True while a session is open.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locks > 0
    }

    /// Region touched so far in the current session.
    #[must_use]
    pub const fn dirty_region(&self) -> DirtyRect {
        self.dirty
    }

    /// Open (or nest into) a session.
    pub fn begin(&mut self) {
        if self.locks == 0 {
            self.surface.lock();
            self.dirty = DirtyRect::EMPTY;
        }
        self.locks += 1;
    }

    /// Close a session level; the outermost close commits the dirty rectangle.
    ///
    /// # Panics
    ///
    /// Panics if there is no matching [`begin`](Self::begin).
    #[track_caller]
    pub fn end(&mut self) {
        self.release(true);
    }

    /// Open a session that ends when the returned guard is dropped.
    ///
    /// ```
    /// use grayraster::framebuffer::Framebuffer;
    ///
    /// let mut fb = Framebuffer::new(16, 16).unwrap();
    /// {
    ///     let mut session = fb.session();
    ///     session.set_pixel(3, 4, 255);
    ///     session.buffer_mut()[0] = 7;
    /// }
    /// assert!(!fb.is_locked());
    /// assert_eq!(fb.pixel(3, 4), Some(255));
    /// ```
    pub fn session(&mut self) -> Session<'_, S> {
        self.begin();
        Session { fb: self }
    }

    #[track_caller]
    fn release(&mut self, commit: bool) {
        assert!(self.locks > 0, "unbalanced Framebuffer::end() without a matching begin()");
        self.locks -= 1;
        if self.locks > 0 {
            return;
        }
        if commit && !self.dirty.is_empty() {
            log::debug!("commit dirty rect {:?}", self.dirty);
            self.surface.commit(&self.pixels, self.stride, self.dirty);
        }
        self.surface.unlock();
    }

    /// The raw buffer (`stride * height` bytes).
    ///
    /// # Panics
    ///
    /// Panics outside a session.
    #[must_use]
    #[track_caller]
    pub fn buffer(&self) -> &[u8] {
        self.assert_locked();
        &self.pixels
    }

    /// The raw buffer for writing (`stride * height` bytes).
    ///
    /// Writes through this slice are not tracked; mark them with
    /// [`dirty`](Self::dirty) and friends.
    ///
    /// # Panics
    ///
    /// Panics outside a session.
    #[track_caller]
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.assert_locked();
        &mut self.pixels
    }

    #[track_caller]
    fn assert_locked(&self) {
        assert!(self.locks > 0, "framebuffer buffer access outside begin()/end()");
    }

    /// Read one pixel; `None` when out of range.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.in_bounds(x, y).then(|| self.pixels[self.index(x, y)])
    }

    /// One row of logical pixels (padding excluded).
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// Check if `(x, y)` addresses a pixel.
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Assert that `(x, y)` addresses a pixel.
    ///
    /// # Panics
    ///
    /// Panics when the location is out of range.
    #[track_caller]
    pub fn check(&self, x: i32, y: i32) {
        assert!(
            self.in_bounds(x, y),
            "pixel location out of range: ({x},{y}) in {}x{}",
            self.width,
            self.height
        );
    }

    /// Mark a pixel as touched (clamped to the buffer).
    pub fn dirty(&mut self, x: i32, y: i32) {
        let x = x.clamp(0, self.width as i32 - 1);
        let y = y.clamp(0, self.height as i32 - 1);
        self.dirty.include(x, y);
    }

    /// Mark the rectangle spanned by two corners (in any order) as touched.
    pub fn dirty_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.dirty(x1, y1);
        self.dirty(x2, y2);
    }

    /// Mark the entire buffer as touched.
    pub fn dirty_all(&mut self) {
        self.dirty_rect(0, 0, self.width as i32 - 1, self.height as i32 - 1);
    }

    /// Fill the whole buffer, padding included, with one gray level.
    pub fn clear(&mut self, gray: u8) {
        self.begin();
        self.buffer_mut().fill(gray);
        self.dirty_all();
        self.end();
    }

    /// Set a single pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of range.
    #[track_caller]
    pub fn set_pixel(&mut self, x: i32, y: i32, gray: u8) {
        self.check(x, y);
        self.begin();
        self.dirty(x, y);
        let idx = self.index(x, y);
        self.buffer_mut()[idx] = gray;
        self.end();
    }

    /// Fill the inclusive run `x1..=x2` (in either order) of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if either end is out of range.
    #[track_caller]
    pub fn draw_horizontal_line(&mut self, x1: i32, x2: i32, y: i32, gray: u8) {
        self.check(x1, y);
        self.check(x2, y);
        self.begin();
        self.dirty_rect(x1, y, x2, y);
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (start, end) = (self.index(lo, y), self.index(hi, y));
        self.buffer_mut()[start..=end].fill(gray);
        self.end();
    }

    /// Byte offset of `(x, y)`; callers have already bounds-checked.
    #[inline]
    pub(crate) fn index(&self, x: i32, y: i32) -> usize {
        (y as usize) * self.stride + (x as usize)
    }

    /// Logical pixels without stride padding, row after row.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = self.width as usize;
        if self.stride == row_bytes {
            return self.pixels.clone();
        }
        let mut compact = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }
}

/// A scoped framebuffer session; dropping it ends the session.
///
/// If the guard is dropped while unwinding from a panic the session is
/// closed without committing, so a half-drawn frame never reaches the
/// surface.
#[derive(Debug)]
pub struct Session<'a, S: Surface> {
    fb: &'a mut Framebuffer<S>,
}

impl<S: Surface> Deref for Session<'_, S> {
    type Target = Framebuffer<S>;

    fn deref(&self) -> &Self::Target {
        self.fb
    }
}

impl<S: Surface> DerefMut for Session<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.fb
    }
}

impl<S: Surface> Drop for Session<'_, S> {
    fn drop(&mut self) {
        self.fb.release(!std::thread::panicking());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RecordingSurface;

    fn recording(width: u32, height: u32) -> Framebuffer<RecordingSurface> {
        Framebuffer::with_surface(width, height, RecordingSurface::new()).unwrap()
    }

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert!(fb.stride() >= 100);
        assert_eq!(fb.stride() % ROW_ALIGNMENT, 0);
        assert!(!fb.is_locked());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
        assert!(Framebuffer::new(0, 0).is_err());
        assert!(Framebuffer::new(u32::MAX, 1).is_err());
    }

    #[test]
    fn test_dirty_rect_spans_touched_pixels() {
        let mut fb = recording(20, 20);
        fb.begin();
        fb.set_pixel(3, 4, 200);
        fb.set_pixel(10, 1, 200);
        assert!(fb.surface().commits().is_empty());
        fb.end();

        assert_eq!(fb.surface().commits(), &[DirtyRect::new(3, 1, 10, 4)]);
        assert_eq!(fb.surface().locks(), 1);
        assert_eq!(fb.surface().unlocks(), 1);
    }

    /// Records every log line so tests can check levels.
    struct CaptureLog(std::sync::Mutex<Vec<(log::Level, String)>>);

    impl log::Log for CaptureLog {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            self.0.lock().unwrap().push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLog = CaptureLog(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn test_commit_logs_at_debug() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let mut fb = recording(20, 20);
        fb.set_pixel(17, 13, 1);

        let records = CAPTURE.0.lock().unwrap();
        let commits: Vec<_> = records.iter().filter(|(_, msg)| msg.contains("commit dirty rect")).collect();
        assert!(commits.iter().any(|(_, msg)| msg.contains("x1: 17") && msg.contains("y1: 13")), "{commits:?}");
        assert!(commits.iter().all(|(level, _)| *level == log::Level::Debug));
    }

    #[test]
    fn test_standalone_primitives_commit_individually() {
        let mut fb = recording(8, 8);
        fb.set_pixel(1, 1, 9);
        fb.draw_horizontal_line(6, 2, 5, 9);
        assert_eq!(fb.surface().commits(), &[DirtyRect::new(1, 1, 1, 1), DirtyRect::new(2, 5, 6, 5)]);
    }

    #[test]
    fn test_nested_sessions_commit_once() {
        let mut fb = recording(10, 10);
        fb.begin();
        fb.begin();
        fb.set_pixel(0, 0, 1);
        fb.end();
        assert!(fb.is_locked());
        {
            let mut session = fb.session();
            session.set_pixel(9, 9, 1);
            assert_eq!(session.lock_depth(), 2);
        }
        fb.end();
        assert_eq!(fb.surface().commits(), &[DirtyRect::new(0, 0, 9, 9)]);
        assert_eq!(fb.surface().locks(), 1);
    }

    #[test]
    fn test_untouched_session_commits_nothing() {
        let mut fb = recording(4, 4);
        drop(fb.session());
        assert!(fb.surface().commits().is_empty());
        assert_eq!(fb.surface().unlocks(), 1);
    }

    #[test]
    fn test_dirty_rect_resets_between_sessions() {
        let mut fb = recording(10, 10);
        fb.set_pixel(0, 0, 1);
        fb.set_pixel(9, 9, 1);
        assert_eq!(fb.surface().last_commit(), Some(DirtyRect::new(9, 9, 9, 9)));
    }

    #[test]
    #[should_panic(expected = "unbalanced")]
    fn test_unbalanced_end_panics() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.end();
    }

    #[test]
    #[should_panic(expected = "outside begin()/end()")]
    fn test_buffer_outside_session_panics() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        let _ = fb.buffer_mut();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_pixel_out_of_range_panics() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.set_pixel(4, 0, 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_horizontal_line_out_of_range_panics() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.draw_horizontal_line(-1, 2, 0, 1);
    }

    #[test]
    fn test_clear_includes_padding() {
        let mut fb = recording(5, 3);
        fb.clear(77);
        fb.begin();
        assert!(fb.buffer().iter().all(|&b| b == 77));
        fb.end();
        assert_eq!(fb.surface().commits(), &[DirtyRect::new(0, 0, 4, 2)]);
        assert_eq!(fb.to_compact_pixels().len(), 15);
    }

    #[test]
    fn test_horizontal_line_either_order() {
        let mut fb = Framebuffer::new(10, 3).unwrap();
        fb.draw_horizontal_line(7, 2, 1, 50);
        assert_eq!(fb.row(1).unwrap(), &[0, 0, 50, 50, 50, 50, 50, 50, 0, 0]);
        assert_eq!(fb.row(0).unwrap(), &[0; 10]);
        assert!(fb.row(3).is_none());
    }

    #[test]
    fn test_dirty_is_clamped() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.begin();
        fb.dirty_rect(-5, -5, 50, 3);
        assert_eq!(fb.dirty_region(), DirtyRect::new(0, 0, 9, 3));
        fb.end();
    }

    #[test]
    fn test_panicking_session_does_not_commit() {
        let mut fb = recording(4, 4);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut session = fb.session();
            session.set_pixel(1, 1, 1);
            session.set_pixel(9, 9, 1);
        }));
        assert!(result.is_err());
        assert!(!fb.is_locked());
        assert!(fb.surface().commits().is_empty());
        assert_eq!(fb.surface().unlocks(), 1);
    }

    #[test]
    fn test_dirty_rect_dimensions() {
        assert_eq!(DirtyRect::EMPTY.width(), 0);
        let r = DirtyRect::new(3, 1, 10, 4);
        assert_eq!((r.width(), r.height()), (8, 4));
        assert!(r.contains(10, 4));
        assert!(!r.contains(11, 4));
    }
}
