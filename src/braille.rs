//! Braille downsampling of a raster surface.
//!
//! Each terminal cell holds a 2x4 braille dot matrix. A dot is lit when any
//! pixel in its block differs from the background color.

use crate::config::CellMetrics;
use crate::surface::Rgb;
use image::RgbaImage;

/// Bit for each dot position, indexed `[row][col]`
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Braille glyph for a dot mask, `None` when no dot is set
pub fn glyph(mask: u8) -> Option<char> {
    if mask == 0 {
        return None;
    }
    char::from_u32(0x2800 + mask as u32)
}

/// Dot masks for a grid of terminal cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrailleGrid {
    pub cols: u16,
    pub rows: u16,
    masks: Vec<u8>,
}

impl BrailleGrid {
    pub fn empty() -> Self {
        Self { cols: 0, rows: 0, masks: Vec::new() }
    }

    #[cfg(test)]
    pub fn mask(&self, col: u16, row: u16) -> u8 {
        if col >= self.cols || row >= self.rows {
            return 0;
        }
        self.masks[row as usize * self.cols as usize + col as usize]
    }

    /// Iterate lit cells as (col, row, glyph)
    pub fn glyphs(&self) -> impl Iterator<Item = (u16, u16, char)> + '_ {
        self.masks.iter().enumerate().filter_map(move |(i, &m)| {
            let col = (i % self.cols as usize) as u16;
            let row = (i / self.cols as usize) as u16;
            glyph(m).map(|ch| (col, row, ch))
        })
    }
}

/// Sample `image` into `cols` x `rows` braille cells
pub fn downsample(image: &RgbaImage, cols: u16, rows: u16, cells: CellMetrics, background: Rgb) -> BrailleGrid {
    let dot_w = (cells.width_px / 2).max(1);
    let dot_h = (cells.height_px / 4).max(1);
    let bg = [background.0, background.1, background.2];
    let (iw, ih) = image.dimensions();

    let mut masks = vec![0u8; cols as usize * rows as usize];
    for row in 0..rows as u32 {
        for col in 0..cols as u32 {
            let mut mask = 0u8;
            for (dr, bits) in DOT_BITS.iter().enumerate() {
                for (dc, bit) in bits.iter().enumerate() {
                    let x0 = col * cells.width_px + dc as u32 * dot_w;
                    let y0 = row * cells.height_px + dr as u32 * dot_h;
                    let lit = (y0..(y0 + dot_h).min(ih)).any(|y| {
                        (x0..(x0 + dot_w).min(iw)).any(|x| {
                            let p = image.get_pixel(x, y).0;
                            p[..3] != bg
                        })
                    });
                    if lit {
                        mask |= bit;
                    }
                }
            }
            masks[row as usize * cols as usize + col as usize] = mask;
        }
    }

    BrailleGrid { cols, rows, masks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PixelSurface, Surface};

    fn blank(cols: u16, rows: u16) -> PixelSurface {
        let cells = CellMetrics::default();
        let mut s = PixelSurface::new(cols as u32 * cells.width_px, rows as u32 * cells.height_px);
        let (w, h) = s.size();
        s.fill_rect(0.0, 0.0, w as f64, h as f64, Rgb::BACKGROUND);
        s
    }

    #[test]
    fn glyph_range() {
        assert_eq!(glyph(0), None);
        assert_eq!(glyph(0x01), Some('\u{2801}'));
        assert_eq!(glyph(0xFF), Some('\u{28FF}'));
    }

    #[test]
    fn background_only_lights_nothing() {
        let s = blank(3, 2);
        let grid = downsample(s.image(), 3, 2, CellMetrics::default(), Rgb::BACKGROUND);
        assert_eq!(grid.glyphs().count(), 0);
    }

    #[test]
    fn single_pixel_maps_to_its_dot() {
        let mut s = blank(2, 1);
        // second cell, right column, bottom row of dots
        s.fill_rect(8.0 + 5.0, 13.0, 1.0, 1.0, Rgb::BLACK);
        let grid = downsample(s.image(), 2, 1, CellMetrics::default(), Rgb::BACKGROUND);
        assert_eq!(grid.mask(0, 0), 0);
        assert_eq!(grid.mask(1, 0), 0x80);
        assert_eq!(grid.glyphs().collect::<Vec<_>>(), vec![(1, 0, '\u{2880}')]);
    }

    #[test]
    fn vertical_line_fills_left_column() {
        let mut s = blank(1, 1);
        s.stroke_line(1.0, 0.0, 1.0, 15.0, 1.0, Rgb::BLACK);
        let grid = downsample(s.image(), 1, 1, CellMetrics::default(), Rgb::BACKGROUND);
        assert_eq!(grid.mask(0, 0), 0x01 | 0x02 | 0x04 | 0x40);
    }

    #[test]
    fn out_of_bounds_mask_is_empty() {
        let s = blank(1, 1);
        let grid = downsample(s.image(), 1, 1, CellMetrics::default(), Rgb::BACKGROUND);
        assert_eq!(grid.mask(5, 5), 0);
    }
}
