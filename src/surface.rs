//! Drawing surfaces the tree renderer paints onto.
//!
//! The renderer only needs two primitives: a rectangle fill and a stroked
//! line. `Recorder` keeps the calls for inspection, `PixelSurface` rasterizes
//! them into an RGBA image that the braille presenter samples.

use image::{Rgba, RgbaImage};

/// Opaque 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const BACKGROUND: Rgb = Rgb(0xEE, 0xEE, 0xEE);

    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 255])
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(c: Rgb) -> Self {
        crossterm::style::Color::Rgb { r: c.0, g: c.1, b: c.2 }
    }
}

/// Something the renderer can draw on
pub trait Surface {
    /// Pixel dimensions (width, height)
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb);

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgb);
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { x: f64, y: f64, w: f64, h: f64, color: Rgb },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgb },
}

/// Surface that remembers every call instead of drawing
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ops: Vec::new() }
    }

    /// Only the line segments, in draw order
    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

impl Surface for Recorder {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.ops.push(DrawOp::Fill { x, y, w, h, color });
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgb) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2, width, color });
    }
}

/// RGBA raster surface backed by an `image::RgbaImage`
pub struct PixelSurface {
    image: RgbaImage,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    /// Reallocate if the requested size differs from the current one
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.width() != width || self.image.height() != height {
            self.image = RgbaImage::new(width, height);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && x < self.image.width() as i64 && y < self.image.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        let (iw, ih) = self.size();
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + w).ceil().max(0.0) as u32).min(iw);
        let y1 = ((y + h).ceil().max(0.0) as u32).min(ih);
        let px = color.to_rgba();
        for row in y0..y1 {
            for col in x0..x1 {
                self.image.put_pixel(col, row, px);
            }
        }
    }

    /// Bresenham walk with a square brush; sub-pixel widths still cover one pixel
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgb) {
        if !(x1.is_finite() && y1.is_finite() && x2.is_finite() && y2.is_finite()) {
            return;
        }
        let px = color.to_rgba();
        let brush = width.round().max(1.0) as i64;
        let lo = -(brush - 1) / 2;
        let hi = brush / 2;

        let (mut x, mut y) = (x1.round() as i64, y1.round() as i64);
        let (ex, ey) = (x2.round() as i64, y2.round() as i64);
        let dx = (ex - x).abs();
        let dy = -(ey - y).abs();
        let sx = if x < ex { 1 } else { -1 };
        let sy = if y < ey { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            for oy in lo..=hi {
                for ox in lo..=hi {
                    self.plot(x + ox, y + oy, px);
                }
            }

            if x == ex && y == ey {
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
}
