//! Error types for grayraster operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in grayraster operations.
///
/// Programmer errors (touching the raw buffer outside a session, unbalanced
/// `end()`, out-of-range pixels) are not represented here; those panic.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (reading geometry or config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid dimensions for a framebuffer.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A polygon needs at least two vertices to have edges.
    #[error("Degenerate polygon: {points} point(s)")]
    DegeneratePolygon {
        /// Number of points supplied.
        points: usize,
    },

    /// Malformed geometry text.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending input.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid or unreadable configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// The worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker thread panicked while computing rows.
    #[error("Worker thread panicked")]
    WorkerPanicked,

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),
}

impl Error {
    /// Shorthand for a [`Error::Parse`] at the given 1-based line.
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse { line, message: message.into() }
    }
}
