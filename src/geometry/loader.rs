//! Plain-text geometry formats.
//!
//! Two whitespace-separated decimal formats are accepted, both with a
//! uniform scale applied on load:
//!
//! - **Lines**: one segment per line, `x1 y1 x2 y2`.
//! - **Polygons**: a polygon count, then for each polygon a vertex count
//!   followed by that many `x y` lines.
//!
//! Blank lines are ignored in both.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::point::{Line, Point2};
use super::polygon::{Drawing, Polygon};
use crate::error::{Error, Result};

/// Parse the line-segment format.
///
/// ```
/// use grayraster::geometry::parse_lines;
///
/// let lines = parse_lines("0 0 1 2\n\n3 4 5 6\n", 10.0).unwrap();
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].b.y, 60.0);
/// ```
pub fn parse_lines(text: &str, scale: f64) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (line_no, row) in numbered_rows(text) {
        let [x1, y1, x2, y2] = parse_numbers::<4>(line_no, row, scale)?;
        lines.push(Line::from_coords(x1, y1, x2, y2));
    }
    log::debug!("parsed {} line segments (scale {scale})", lines.len());
    Ok(lines)
}

/// Parse the polygon-set format.
pub fn parse_polygons(text: &str, scale: f64) -> Result<Vec<Polygon>> {
    let mut rows = numbered_rows(text);
    let (line_no, header) = rows.next().ok_or_else(|| Error::parse(1, "missing polygon count"))?;
    let count = parse_count(line_no, header)?;

    let mut polygons = Vec::new();
    for index in 0..count {
        let (line_no, row) = rows
            .next()
            .ok_or_else(|| Error::parse(line_no, format!("missing vertex count for polygon {index}")))?;
        let vertices = parse_count(line_no, row)?;

        let mut points = Vec::new();
        for _ in 0..vertices {
            let (line_no, row) = rows
                .next()
                .ok_or_else(|| Error::parse(line_no, format!("polygon {index} is truncated")))?;
            let [x, y] = parse_numbers::<2>(line_no, row, scale)?;
            points.push(Point2::new(x, y));
        }
        let polygon = Polygon::new(points).map_err(|e| Error::parse(line_no, e.to_string()))?;
        polygons.push(polygon);
    }

    if let Some((line_no, _)) = rows.next() {
        return Err(Error::parse(line_no, "trailing data after last polygon"));
    }
    log::debug!("parsed {} polygons (scale {scale})", polygons.len());
    Ok(polygons)
}

/// Read the line-segment format from a reader.
pub fn read_lines<R: BufRead>(reader: R, scale: f64) -> Result<Vec<Line>> {
    parse_lines(&read_all(reader)?, scale)
}

/// Read the polygon-set format from a reader.
pub fn read_polygons<R: BufRead>(reader: R, scale: f64) -> Result<Vec<Polygon>> {
    parse_polygons(&read_all(reader)?, scale)
}

/// Load a file in the line-segment format as a [`Drawing`] of loose lines.
pub fn load_line_drawing<P: AsRef<Path>>(path: P, scale: f64) -> Result<Drawing> {
    let reader = BufReader::new(File::open(path)?);
    Ok(Drawing::from_lines(read_lines(reader, scale)?))
}

/// Load a file in the polygon-set format as a [`Drawing`].
pub fn load_polygon_drawing<P: AsRef<Path>>(path: P, scale: f64) -> Result<Drawing> {
    let reader = BufReader::new(File::open(path)?);
    Ok(Drawing::from_polygons(read_polygons(reader, scale)?))
}

fn read_all<R: BufRead>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// Non-blank rows with their 1-based line numbers.
fn numbered_rows(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, row)| (i + 1, row.trim()))
        .filter(|(_, row)| !row.is_empty())
}

fn parse_numbers<const N: usize>(line_no: usize, row: &str, scale: f64) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    let mut words = row.split_whitespace();
    for slot in &mut out {
        let word = words
            .next()
            .ok_or_else(|| Error::parse(line_no, format!("expected {N} numbers")))?;
        let value: f64 = word
            .parse()
            .map_err(|_| Error::parse(line_no, format!("invalid number {word:?}")))?;
        *slot = value * scale;
    }
    if words.next().is_some() {
        return Err(Error::parse(line_no, format!("expected {N} numbers")));
    }
    Ok(out)
}

fn parse_count(line_no: usize, row: &str) -> Result<usize> {
    row.parse().map_err(|_| Error::parse(line_no, format!("invalid count {row:?}")))
}
