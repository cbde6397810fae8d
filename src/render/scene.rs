//! Drawing-level helpers: push a [`Drawing`] through a transform into the
//! fill engine or the line rasterizers.

use crate::framebuffer::Framebuffer;
use crate::geometry::{Drawing, Line, Matrix2, Point2};
use crate::output::Surface;
use crate::render::fill::PolygonFiller;
use crate::render::line::{draw_line, Stroker};

/// Fill every polygon of `drawing` under the even-odd rule.
///
/// The filler is reset first and left holding the drawing's edges.
pub fn fill_drawing<S: Surface, F: PolygonFiller>(
    fb: &mut Framebuffer<S>,
    filler: &mut F,
    drawing: &Drawing,
    xfm: &Matrix2,
    gray: u8,
) {
    filler.reset();
    filler.add_drawing(drawing, xfm);
    log::trace!("fill drawing: {} edges", filler.edge_count());
    filler.fill(fb, gray);
}

/// Draw every edge of `drawing` as a 1-pixel line.
///
/// Edges are clipped to the buffer after transformation; edges entirely
/// outside are skipped.
pub fn outline_drawing<S: Surface>(fb: &mut Framebuffer<S>, drawing: &Drawing, xfm: &Matrix2, gray: u8) {
    let mut session = fb.session();
    for line in drawing.lines() {
        if let Some(((x1, y1), (x2, y2))) = device_segment(&*session, line, xfm) {
            draw_line(&mut *session, x1, y1, x2, y2, gray);
        }
    }
}

/// Draw every edge of `drawing` as a thick line of the given width.
pub fn stroke_drawing<S: Surface>(
    fb: &mut Framebuffer<S>,
    stroker: &mut Stroker,
    drawing: &Drawing,
    xfm: &Matrix2,
    width: f64,
    gray: u8,
) {
    let mut session = fb.session();
    for line in drawing.lines() {
        if let Some((a, b)) = device_segment(&*session, line, xfm) {
            stroker.draw(&mut *session, a, b, width, gray);
        }
    }
}

/// Transform a segment, clip it to the pixel centers of `fb` and round.
fn device_segment<S: Surface>(
    fb: &Framebuffer<S>,
    line: Line,
    xfm: &Matrix2,
) -> Option<((i32, i32), (i32, i32))> {
    let max_x = f64::from(fb.width() - 1);
    let max_y = f64::from(fb.height() - 1);
    clip(Line::new(line.a * *xfm, line.b * *xfm), max_x, max_y).map(|clipped| clipped.round())
}

/// Liang-Barsky clip of `line` against `[0, max_x] x [0, max_y]`.
fn clip(line: Line, max_x: f64, max_y: f64) -> Option<Line> {
    let d = line.b - line.a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let tests = [
        (-d.x, line.a.x),
        (d.x, max_x - line.a.x),
        (-d.y, line.a.y),
        (d.y, max_y - line.a.y),
    ];
    for (p, q) in tests {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    let at = |t: f64| Point2::new((line.a.x + t * d.x).clamp(0.0, max_x), (line.a.y + t * d.y).clamp(0.0, max_y));
    Some(Line::new(at(t0), at(t1)))
}
