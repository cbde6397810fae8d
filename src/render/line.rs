//! Line rasterization: Bresenham lines and filled thick lines.

use std::f64::consts::PI;

use crate::framebuffer::Framebuffer;
use crate::geometry::Point2;
use crate::output::Surface;
use crate::render::fill::{ActiveEdgeFill, PolygonFiller};

/// Draw a 1-pixel line between two pixels using Bresenham's algorithm.
///
/// Horizontal lines take the [`Framebuffer::draw_horizontal_line`] fast
/// path. Other lines are walked with an integer error accumulator from the
/// upper endpoint to the lower one, so swapping the endpoints touches
/// exactly the same pixels. The whole extent is registered as dirty before
/// drawing.
///
/// # Panics
///
/// Panics if either endpoint is outside the framebuffer. Every pixel of a
/// Bresenham line lies in the box spanned by its endpoints, so checking the
/// endpoints covers the whole line.
#[track_caller]
pub fn draw_line<S: Surface>(fb: &mut Framebuffer<S>, x1: i32, y1: i32, x2: i32, y2: i32, gray: u8) {
    if y1 == y2 {
        fb.draw_horizontal_line(x1, x2, y1, gray);
        return;
    }
    fb.check(x1, y1);
    fb.check(x2, y2);

    let (mut x, mut y, x_end, y_end) = if y1 < y2 { (x1, y1, x2, y2) } else { (x2, y2, x1, y1) };

    fb.begin();
    fb.dirty_rect(x, y, x_end, y_end);

    let dx = (x_end - x).abs();
    let dy = -(y_end - y).abs();
    let step_x: isize = if x < x_end { 1 } else { -1 };
    let step_row = fb.stride() as isize;
    let mut error = dx + dy;
    let mut idx = fb.index(x, y) as isize;

    let buf = fb.buffer_mut();
    loop {
        buf[idx as usize] = gray;
        if x == x_end && y == y_end {
            break;
        }
        let delta = 2 * error;
        if delta >= dy {
            if x == x_end {
                break;
            }
            error += dy;
            x += step_x as i32;
            idx += step_x;
        }
        if delta <= dx {
            if y == y_end {
                break;
            }
            error += dx;
            y += 1;
            idx += step_row;
        }
    }

    fb.end();
}

/// Builds and fills the outline of thick lines.
///
/// A thick line is a filled polygon: each end gets a half-hexagon cap made
/// of three 60° arc steps at half the thickness, and the two caps are joined
/// by the parallel side edges, giving 8 edges in all. The fill engine is
/// kept between calls so repeated strokes do not reallocate.
#[derive(Debug, Default)]
pub struct Stroker {
    fill: ActiveEdgeFill,
}

impl Stroker {
    /// Create a stroker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The 8 outline vertices of a thick line, in boundary order.
    ///
    /// The first four walk the cap around `(x1, y1)`, the last four walk the
    /// cap around `(x2, y2)` back towards the start.
    #[must_use]
    pub fn outline(x1: i32, y1: i32, x2: i32, y2: i32, width: f64) -> [(i32, i32); 8] {
        let start = Point2::new(f64::from(x1), f64::from(y1));
        let end = Point2::new(f64::from(x2), f64::from(y2));
        let radius = width * 0.5;
        let base = start.angle_to(end);
        let (quarter, sixth) = (PI / 2.0, PI / 3.0);

        let mut outline = [(0, 0); 8];
        for k in 0..4 {
            let step = f64::from(k) * sixth;
            outline[k as usize] = start.radial_move(radius, base + quarter + step).round();
            outline[7 - k as usize] = end.radial_move(radius, base + quarter - step).round();
        }
        outline
    }

    /// Fill a thick line of the given `width` between two pixels.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is outside the framebuffer. The cap
    /// overhang beyond the buffer edge is clipped.
    #[track_caller]
    pub fn draw<S: Surface>(
        &mut self,
        fb: &mut Framebuffer<S>,
        (x1, y1): (i32, i32),
        (x2, y2): (i32, i32),
        width: f64,
        gray: u8,
    ) {
        fb.check(x1, y1);
        fb.check(x2, y2);
        fb.begin();
        fb.dirty_rect(x1, y1, x2, y2);

        let outline = Self::outline(x1, y1, x2, y2, width);
        self.fill.reset();
        for (i, &(ax, ay)) in outline.iter().enumerate() {
            let (bx, by) = outline[(i + 1) % outline.len()];
            self.fill.add_line(ax, ay, bx, by);
        }
        self.fill.fill(fb, gray);

        fb.end();
    }
}
