//! Row-parallel rendering into a framebuffer.
//!
//! The engine opens one framebuffer session on the calling thread, splits
//! the raw buffer into one disjoint slice per row and hands those slices out
//! through a shared queue. Each claim removes the row from the queue, so
//! every row is computed by exactly one worker and workers never share
//! memory. The calling thread blocks until every worker has drained the
//! queue, then marks the whole buffer dirty and closes the session.
//!
//! Workers come from either a persistent rayon pool reused across frames or
//! a fresh set of scoped threads per frame. Both produce identical pixels.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::Surface;

/// Computes one row of pixels in isolation.
pub trait RowRenderer: Sync {
    /// Fill `row` (exactly the buffer width) for row index `y`.
    ///
    /// # Errors
    ///
    /// An error fails the whole frame; remaining rows are abandoned and the
    /// frame is not committed.
    fn render_row(&self, y: u32, row: &mut [u8]) -> Result<()>;
}

impl<F> RowRenderer for F
where
    F: Fn(u32, &mut [u8]) -> Result<()> + Sync,
{
    fn render_row(&self, y: u32, row: &mut [u8]) -> Result<()> {
        self(y, row)
    }
}

/// Where worker threads come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolMode {
    /// A rayon pool created once and reused for every frame.
    #[default]
    Persistent,
    /// Threads spawned and joined for each frame.
    Scoped,
}

/// Parallel per-row renderer.
#[derive(Debug)]
pub struct ScanlineEngine {
    workers: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ScanlineEngine {
    /// Create an engine with `workers` threads; 0 means host parallelism.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadPool`] if the persistent pool cannot be built.
    pub fn new(mode: PoolMode, workers: usize) -> Result<Self> {
        let workers = if workers == 0 { host_parallelism() } else { workers };
        let pool = match mode {
            PoolMode::Persistent => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("grayraster-row-{i}"))
                    .build()?,
            ),
            PoolMode::Scoped => None,
        };
        log::debug!("scanline engine: {mode:?} with {workers} worker(s)");
        Ok(Self { workers, pool })
    }

    /// Number of workers per frame.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// The pool mode in use.
    #[must_use]
    pub const fn mode(&self) -> PoolMode {
        if self.pool.is_some() {
            PoolMode::Persistent
        } else {
            PoolMode::Scoped
        }
    }

    /// Render every row of `fb` with `renderer`.
    ///
    /// Blocks until all rows are done. On success the whole buffer is
    /// registered dirty before the session closes. On failure the first
    /// error is returned and nothing is marked dirty, so an outermost
    /// session commits nothing.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the renderer, or
    /// [`Error::WorkerPanicked`] if a worker panicked.
    pub fn render<S: Surface, R: RowRenderer>(&self, fb: &mut Framebuffer<S>, renderer: &R) -> Result<()> {
        let started = Instant::now();
        let width = fb.width() as usize;
        let height = fb.height() as usize;
        let stride = fb.stride();

        let mut session = fb.session();
        let outcome = Outcome::default();
        {
            let mut rows: Vec<(u32, &mut [u8])> = session
                .buffer_mut()
                .chunks_mut(stride)
                .take(height)
                .zip(0_u32..)
                .map(|(row, y)| (y, &mut row[..width]))
                .collect();
            // Claims pop from the back; hand rows out top to bottom
            rows.reverse();
            let queue = RowQueue { rows: Mutex::new(rows) };
            let job = || run_worker(&queue, renderer, &outcome);

            match &self.pool {
                Some(pool) => pool.scope(|s| {
                    for _ in 0..self.workers {
                        s.spawn(|_| job());
                    }
                }),
                None => std::thread::scope(|s| {
                    for _ in 0..self.workers {
                        s.spawn(job);
                    }
                }),
            }
        }

        if let Some(err) = outcome.into_error() {
            log::debug!("frame failed after {:?}: {err}", started.elapsed());
            return Err(err);
        }
        session.dirty_all();
        log::debug!("rendered {height} rows on {} worker(s) in {:?}", self.workers, started.elapsed());
        Ok(())
    }
}

fn host_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Unclaimed rows; popping one claims it.
struct RowQueue<'a> {
    rows: Mutex<Vec<(u32, &'a mut [u8])>>,
}

impl<'a> RowQueue<'a> {
    fn claim(&self) -> Option<(u32, &'a mut [u8])> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).pop()
    }
}

/// First failure of a frame, shared by all workers.
#[derive(Default)]
struct Outcome {
    cancelled: AtomicBool,
    error: Mutex<Option<Error>>,
}

impl Outcome {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn fail(&self, err: Error) {
        self.cancelled.store(true, Ordering::Release);
        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    fn into_error(self) -> Option<Error> {
        self.error.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

fn run_worker<R: RowRenderer>(queue: &RowQueue<'_>, renderer: &R, outcome: &Outcome) {
    let drained = panic::catch_unwind(AssertUnwindSafe(|| {
        while !outcome.is_cancelled() {
            let Some((y, row)) = queue.claim() else {
                break;
            };
            if let Err(err) = renderer.render_row(y, row) {
                log::debug!("row {y} failed: {err}");
                outcome.fail(err);
            }
        }
    }));
    if drained.is_err() {
        outcome.fail(Error::WorkerPanicked);
    }
}
