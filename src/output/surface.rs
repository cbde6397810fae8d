//! Display surfaces that receive framebuffer commits.

use crate::framebuffer::DirtyRect;

/// The display side of a [`Framebuffer`](crate::framebuffer::Framebuffer).
///
/// A framebuffer locks its surface when the outermost session opens, hands
/// over the accumulated dirty rectangle once when it closes, then unlocks.
pub trait Surface {
    /// Called when the outermost session opens.
    fn lock(&mut self) {}

    /// Called once per outermost session with the touched region.
    ///
    /// `pixels` is the whole back buffer (`stride` bytes per row); only the
    /// inclusive `rect` needs to be redrawn. Never called with an empty rect.
    fn commit(&mut self, pixels: &[u8], stride: usize, rect: DirtyRect);

    /// Called after the commit when the outermost session closes.
    fn unlock(&mut self) {}
}

/// A surface that discards every commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn commit(&mut self, _pixels: &[u8], _stride: usize, _rect: DirtyRect) {}
}

/// A surface that records what it was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSurface {
    commits: Vec<DirtyRect>,
    locks: usize,
    unlocks: usize,
}

impl RecordingSurface {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every committed rectangle, oldest first.
    #[must_use]
    pub fn commits(&self) -> &[DirtyRect] {
        &self.commits
    }

    /// The most recent commit, if any.
    #[must_use]
    pub fn last_commit(&self) -> Option<DirtyRect> {
        self.commits.last().copied()
    }

    /// Number of `lock` calls.
    #[must_use]
    pub fn locks(&self) -> usize {
        self.locks
    }

    /// Number of `unlock` calls.
    #[must_use]
    pub fn unlocks(&self) -> usize {
        self.unlocks
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Surface for RecordingSurface {
    fn lock(&mut self) {
        self.locks += 1;
    }

    fn commit(&mut self, _pixels: &[u8], _stride: usize, rect: DirtyRect) {
        self.commits.push(rect);
    }

    fn unlock(&mut self) {
        self.unlocks += 1;
    }
}
