//! Opaque RGB bitmaps

use std::ops::Range;

use image::{imageops, Rgb, RgbImage};

/// An opaque RGB raster, rows top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbImage,
}

impl Bitmap {
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(color)),
        }
    }

    pub fn white(width: u32, height: u32) -> Self {
        Self::filled(width, height, [255, 255, 255])
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Raw RGB bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Copy of the rows in `rows`, clamped to the bitmap
    pub fn crop_rows(&self, rows: Range<u32>) -> Bitmap {
        let start = rows.start.min(self.height());
        let end = rows.end.clamp(start, self.height());
        Bitmap {
            image: imageops::crop_imm(&self.image, 0, start, self.width(), end - start).to_image(),
        }
    }

    /// Blend `color` over the pixel at (x, y) with the given coverage.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: [u8; 3], coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let a = coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for (d, s) in dst.0.iter_mut().zip(color) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
    }

    /// Fill the pixel rectangle `[x0, x1) x [y0, y1)`, clipped to the bitmap
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
        let x0 = x0.max(0) as u32;
        let y0 = y0.max(0) as u32;
        let x1 = x1.clamp(0, self.width() as i64) as u32;
        let y1 = y1.clamp(0, self.height() as i64) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, Rgb(color));
            }
        }
    }

    /// Outline a rectangle with a line `thickness` pixels wide, drawn inside it
    pub fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, thickness: i64, color: [u8; 3]) {
        let t = thickness.max(1);
        self.fill_rect(x0, y0, x1, y0 + t, color);
        self.fill_rect(x0, y1 - t, x1, y1, color);
        self.fill_rect(x0, y0, x0 + t, y1, color);
        self.fill_rect(x1 - t, y0, x1, y1, color);
    }

    /// Number of pixels that are not pure white
    pub fn ink_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0 != [255, 255, 255]).count()
    }
}
