//! Packed 1 bit per pixel glyph raster.
//!
//! The packed representation is one contiguous bit stream: row after row,
//! `width` bits per row, most significant bit first, without any padding at
//! row boundaries. A 12 pixel wide glyph therefore shares bytes between rows.
//! This is the layout the hex field of a glyph line encodes.
use std::fmt::Display;

use crate::{GlyphError, Result};

/// Every glyph bitmap has this many rows.
pub const GLYPH_HEIGHT: usize = 16;

/// Width of the blank bitmap used for new and missing glyphs.
pub const DEFAULT_GLYPH_WIDTH: usize = 8;

/// A pixel position, origin top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from(value: (i32, i32)) -> Self {
        Point { x: value.0, y: value.1 }
    }
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Rect {
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::blank()
    }
}

impl Bitmap {
    /// Creates a bitmap with all pixels off.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; packed_len(width, height)],
        })
    }

    /// The blank 8x16 bitmap.
    pub fn blank() -> Self {
        Self {
            width: DEFAULT_GLYPH_WIDTH,
            height: GLYPH_HEIGHT,
            data: vec![0; packed_len(DEFAULT_GLYPH_WIDTH, GLYPH_HEIGHT)],
        }
    }

    /// Builds a bitmap from its packed bit stream.
    ///
    /// `bytes` must hold exactly `width * height / 8` bytes.
    pub fn from_packed_bytes(bytes: &[u8], width: usize, height: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        if bytes.len() != packed_len(width, height) {
            return Err(GlyphError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data: bytes.to_vec(),
        })
    }

    pub fn to_packed_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn packed_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let (byte, mask) = self.bit_position(x, y)?;
        Ok(self.data[byte] & mask != 0)
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        let (byte, mask) = self.bit_position(x, y)?;
        if value {
            self.data[byte] |= mask;
        } else {
            self.data[byte] &= !mask;
        }
        Ok(())
    }

    /// Sets every pixel on the line between `from` and `to` (both inclusive).
    /// The line is clipped to the bitmap first, so any `i32` coordinates work.
    pub fn draw_line(&mut self, from: impl Into<Point>, to: impl Into<Point>, value: bool) {
        let Some((from, to)) = clip_line(from.into(), to.into(), self.width, self.height) else {
            return;
        };
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (from.x, from.y);
        loop {
            self.put(x, y, value);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Turns all pixels off.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Bounding box of all set pixels, `None` for an empty bitmap.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.pixel(x, y) {
                    continue;
                }
                result = Some(match result {
                    None => Rect {
                        left: x,
                        top: y,
                        right: x,
                        bottom: y,
                    },
                    Some(r) => Rect {
                        left: r.left.min(x),
                        top: r.top.min(y),
                        right: r.right.max(x),
                        bottom: r.bottom.max(y),
                    },
                });
            }
        }
        result
    }

    fn put(&mut self, x: i32, y: i32, value: bool) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Ok((byte, mask)) = self.bit_position(x, y) {
            if value {
                self.data[byte] |= mask;
            } else {
                self.data[byte] &= !mask;
            }
        }
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        let bit = y * self.width + x;
        self.data[bit / 8] & (0x80 >> (bit % 8)) != 0
    }

    fn bit_position(&self, x: usize, y: usize) -> Result<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return Err(GlyphError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let bit = y * self.width + x;
        Ok((bit / 8, 0x80 >> (bit % 8)))
    }
}

impl Display for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", if self.pixel(x, y) { '#' } else { '-' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Liang-Barsky clipping of the segment against `0..width` x `0..height`.
/// Returns `None` if no part of the segment is inside.
fn clip_line(from: Point, to: Point, width: usize, height: usize) -> Option<(Point, Point)> {
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let max_x = (width - 1) as f64;
    let max_y = (height - 1) as f64;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if p.abs() < f64::EPSILON {
            // parallel to this edge
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| Point::new((x0 + t * dx).round().clamp(0.0, max_x) as i32, (y0 + t * dy).round().clamp(0.0, max_y) as i32);
    Some((at(t0), at(t1)))
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || width % 4 != 0 || height != GLYPH_HEIGHT {
        return Err(GlyphError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Bytes needed for the packed bit stream. `width` is a multiple of 4 and
/// `height` is 16 so the stream always ends on a byte boundary.
fn packed_len(width: usize, height: usize) -> usize {
    (width * height).div_ceil(8)
}
