//! Scanline polygon fill.
//!
//! Both engines consume directed integer edges and produce horizontal
//! [`Span`]s under the even-odd rule: crossings on a row are sorted and
//! paired left to right. Horizontal edges are skipped, and an edge from
//! `y0` to `y1` crosses rows `y0..y1` (half-open). Each crossing is the
//! edge's x at the top of the row, rounded half up, computed in exact
//! integer arithmetic so that both engines agree pixel for pixel.
//!
//! - [`NaiveFill`] intersects every edge with every row.
//! - [`ActiveEdgeFill`] sorts activation events once and only walks the
//!   edges alive on the current row.
//!
//! A row with an odd number of crossings drops the last one.

use std::ops::Range;

use crate::framebuffer::Framebuffer;
use crate::geometry::{Drawing, Line, Matrix2, Polygon};
use crate::output::Surface;

/// A run of pixels `x0..x1` (end exclusive) on row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Row.
    pub y: i32,
    /// First pixel.
    pub x0: i32,
    /// One past the last pixel.
    pub x1: i32,
}

impl Span {
    /// Number of pixels covered.
    #[must_use]
    pub const fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.x1.abs_diff(self.x0)
        }
    }

    /// True for a zero-length span.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0
    }
}

/// A scanline polygon filler.
pub trait PolygonFiller {
    /// Add a directed edge in device space.
    fn add_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    /// Forget every edge, keeping allocations for the next frame.
    fn reset(&mut self);

    /// Number of stored (non-horizontal) edges.
    fn edge_count(&self) -> usize;

    /// Produce the spans of rows in `rows`, top to bottom, left to right.
    ///
    /// Rows outside the window cost nothing, so a clipped fill is bounded by
    /// the window height rather than the edges' extent.
    fn sweep_rows(&mut self, rows: Range<i32>, emit: &mut dyn FnMut(Span));

    /// Produce every span, top to bottom, left to right.
    fn sweep(&mut self, emit: &mut dyn FnMut(Span)) {
        self.sweep_rows(i32::MIN..i32::MAX, emit);
    }

    /// Collect the spans of [`sweep`](Self::sweep).
    fn spans(&mut self) -> Vec<Span> {
        let mut spans = Vec::new();
        self.sweep(&mut |span| spans.push(span));
        spans
    }

    /// Add a world-space segment, transformed by `xfm` and rounded to device space.
    fn add_segment(&mut self, line: Line, xfm: &Matrix2) {
        let ((x0, y0), (x1, y1)) = Line::new(line.a * *xfm, line.b * *xfm).round();
        self.add_line(x0, y0, x1, y1);
    }

    /// Add every edge of a polygon.
    fn add_polygon(&mut self, polygon: &Polygon, xfm: &Matrix2) {
        for line in polygon.lines() {
            self.add_segment(line, xfm);
        }
    }

    /// Add every edge of a drawing.
    fn add_drawing(&mut self, drawing: &Drawing, xfm: &Matrix2) {
        for line in drawing.lines() {
            self.add_segment(line, xfm);
        }
    }

    /// Rasterize the stored edges into `fb`, clipping spans to the buffer.
    fn fill<S: Surface>(&mut self, fb: &mut Framebuffer<S>, gray: u8)
    where
        Self: Sized,
    {
        let (width, height) = (fb.width() as i32, fb.height() as i32);
        fb.begin();
        self.sweep_rows(0..height, &mut |span| {
            let (x0, x1) = (span.x0.max(0), span.x1.min(width));
            if x0 < x1 {
                fb.draw_horizontal_line(x0, x1 - 1, span.y, gray);
            }
        });
        fb.end();
    }
}

/// An edge normalized to run downwards (`y0 < y1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl Segment {
    fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Option<Self> {
        match y0.cmp(&y1) {
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Less => Some(Self { x0, y0, x1, y1 }),
            std::cmp::Ordering::Greater => Some(Self { x0: x1, y0: y1, x1: x0, y1: y0 }),
        }
    }

    /// The crossing on row `y`, `round_half_up(x0 + (y - y0) * dx)`.
    fn crossing(&self, y: i32) -> i32 {
        let mut cursor = Cursor::new(self);
        cursor.skip(i64::from(y) - i64::from(self.y0));
        cursor.x()
    }
}

/// An edge being swept: `x = floor(num / den)` on the current row.
///
/// `num / den` is `x0 + k * dx + 1/2` held as an exact fraction, so
/// stepping never drifts from the direct interpolation. The fraction is
/// 128-bit: an edge spanning the whole `i32` plane needs about 66 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    num: i128,
    step: i128,
    den: i128,
    /// Rows left before the edge retires.
    life: i64,
}

impl Cursor {
    fn new(seg: &Segment) -> Self {
        let h = i64::from(seg.y1) - i64::from(seg.y0);
        let w = i64::from(seg.x1) - i64::from(seg.x0);
        let (h2, w2) = (i128::from(h), i128::from(w));
        Self { num: 2 * i128::from(seg.x0) * h2 + h2, step: 2 * w2, den: 2 * h2, life: h }
    }

    /// Always between the edge's endpoints while the edge is alive.
    fn x(&self) -> i32 {
        self.num.div_euclid(self.den) as i32
    }

    fn advance(&mut self) {
        self.num += self.step;
        self.life -= 1;
    }

    /// Advance `rows` rows at once.
    fn skip(&mut self, rows: i64) {
        self.num += i128::from(rows) * self.step;
        self.life -= rows;
    }
}

/// Pair sorted crossings into spans; returns true if one was left over.
fn emit_pairs(y: i32, xs: &[i32], emit: &mut dyn FnMut(Span)) -> bool {
    for pair in xs.chunks_exact(2) {
        let span = Span { y, x0: pair[0], x1: pair[1] };
        if !span.is_empty() {
            emit(span);
        }
    }
    xs.len() % 2 == 1
}

fn warn_odd_rows(odd_rows: usize) {
    if odd_rows > 0 {
        log::warn!("{odd_rows} scanline(s) had an odd number of crossings; trailing crossing dropped");
    }
}

/// Scanline fill that tests every edge against every row.
#[derive(Debug, Default, Clone)]
pub struct NaiveFill {
    segments: Vec<Segment>,
    xs: Vec<i32>,
}

impl NaiveFill {
    /// Create an empty filler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PolygonFiller for NaiveFill {
    fn add_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        if let Some(seg) = Segment::new(x0, y0, x1, y1) {
            self.segments.push(seg);
        }
    }

    fn reset(&mut self) {
        self.segments.clear();
    }

    fn edge_count(&self) -> usize {
        self.segments.len()
    }

    fn sweep_rows(&mut self, rows: Range<i32>, emit: &mut dyn FnMut(Span)) {
        let y_min = self.segments.iter().map(|s| s.y0).min().unwrap_or(0);
        let y_max = self.segments.iter().map(|s| s.y1).max().unwrap_or(0);
        let mut odd_rows = 0;
        for y in y_min.max(rows.start)..y_max.min(rows.end) {
            self.xs.clear();
            for seg in &self.segments {
                if y >= seg.y0 && y < seg.y1 {
                    self.xs.push(seg.crossing(y));
                }
            }
            self.xs.sort_unstable();
            if emit_pairs(y, &self.xs, emit) {
                odd_rows += 1;
            }
        }
        warn_odd_rows(odd_rows);
    }
}

/// Activation of edge `index` on row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Event {
    y: i32,
    index: usize,
}

/// Scanline fill over a sorted event list and an active edge list.
///
/// Edges live in an index-addressed arena; the active list holds indices
/// and is compacted at the top of every row. The sweep runs on a scratch
/// copy of the arena, so filling twice gives the same result and
/// [`reset`](PolygonFiller::reset) reuses every allocation.
#[derive(Debug, Clone)]
pub struct ActiveEdgeFill {
    edges: Vec<Cursor>,
    events: Vec<Event>,
    events_sorted: bool,
    y_min: i32,
    y_max: i32,
    work: Vec<Cursor>,
    active: Vec<usize>,
    xs: Vec<i32>,
}

impl Default for ActiveEdgeFill {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveEdgeFill {
    /// Create an empty filler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            events: Vec::new(),
            events_sorted: true,
            y_min: i32::MAX,
            y_max: i32::MIN,
            work: Vec::new(),
            active: Vec::new(),
            xs: Vec::new(),
        }
    }
}

impl PolygonFiller for ActiveEdgeFill {
    fn add_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let Some(seg) = Segment::new(x0, y0, x1, y1) else {
            return;
        };
        self.y_min = self.y_min.min(seg.y0);
        self.y_max = self.y_max.max(seg.y1);
        self.events.push(Event { y: seg.y0, index: self.edges.len() });
        self.edges.push(Cursor::new(&seg));
        self.events_sorted = false;
    }

    fn reset(&mut self) {
        self.edges.clear();
        self.events.clear();
        self.events_sorted = true;
        self.y_min = i32::MAX;
        self.y_max = i32::MIN;
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn sweep_rows(&mut self, rows: Range<i32>, emit: &mut dyn FnMut(Span)) {
        if !self.events_sorted {
            self.events.sort_by_key(|e| e.y);
            self.events_sorted = true;
        }
        let Self { edges, events, y_min, y_max, work, active, xs, .. } = self;
        work.clear();
        work.extend_from_slice(edges);
        active.clear();

        // Edges that started above the window join already stepped to its top.
        let first = rows.start.max(*y_min);
        let mut next_event = 0;
        while let Some(event) = events.get(next_event).filter(|e| e.y < first) {
            let cursor = &mut work[event.index];
            cursor.skip(i64::from(first) - i64::from(event.y));
            if cursor.life > 0 {
                active.push(event.index);
            }
            next_event += 1;
        }

        let mut odd_rows = 0;
        for y in first..rows.end.min(*y_max) {
            active.retain(|&i| work[i].life > 0);

            while let Some(event) = events.get(next_event).filter(|e| e.y == y) {
                active.push(event.index);
                next_event += 1;
            }

            xs.clear();
            for &i in active.iter() {
                xs.push(work[i].x());
                work[i].advance();
            }
            xs.sort_unstable();
            if emit_pairs(y, xs.as_slice(), emit) {
                odd_rows += 1;
            }
        }
        log::trace!("active-edge sweep: {} edges, rows {first}..{}", edges.len(), rows.end.min(*y_max));
        warn_odd_rows(odd_rows);
    }
}
