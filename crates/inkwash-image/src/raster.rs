// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RGBA raster: the uniform in-memory pixel grid every filter operates on.

use image::{Rgba, RgbaImage};
use inkwash_core::error::{InkwashError, Result};

/// A width x height grid of 8-bit RGBA pixels.
///
/// The backing buffer always holds exactly `width * height * 4` bytes, laid
/// out row-major with channels in R, G, B, A order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pixels: RgbaImage,
}

impl Raster {
    // -- Construction ---------------------------------------------------------

    /// Build a raster from a raw RGBA byte buffer.
    ///
    /// Fails with `InvalidRaster` unless `data.len() == width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                InkwashError::InvalidRaster(format!("{width}x{height} overflows the address space"))
            })?;
        if data.len() != expected {
            return Err(InkwashError::InvalidRaster(format!(
                "{width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            InkwashError::InvalidRaster(format!("{width}x{height} buffer rejected"))
        })?;
        Ok(Self { pixels })
    }

    /// A raster with every pixel set to `rgba`.
    pub fn from_pixel(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// A fully transparent black raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Number of pixels (not bytes).
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Channels of the pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(rgba));
    }

    /// The flat RGBA byte buffer.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Whether any pixel is less than fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.pixels().any(|p| p.0[3] < u8::MAX)
    }
}

impl From<RgbaImage> for Raster {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_requires_exact_length() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_ok());

        let short = Raster::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(short, InkwashError::InvalidRaster(_)));

        // Oversized buffers are rejected too, even though `image` would accept them.
        let long = Raster::from_rgba(2, 2, vec![0; 20]).unwrap_err();
        assert!(matches!(long, InkwashError::InvalidRaster(_)));
    }

    #[test]
    fn pixel_layout_is_row_major_rgba() {
        let mut data = vec![0u8; 3 * 2 * 4];
        // Pixel (2, 1) starts at (1 * 3 + 2) * 4 = 20.
        data[20..24].copy_from_slice(&[1, 2, 3, 4]);
        let raster = Raster::from_rgba(3, 2, data).unwrap();
        assert_eq!(raster.pixel(2, 1), [1, 2, 3, 4]);
        assert_eq!(raster.pixel_count(), 6);
    }

    #[test]
    fn detects_transparency() {
        let mut raster = Raster::from_pixel(4, 4, [10, 20, 30, 255]);
        assert!(!raster.has_transparency());
        raster.put_pixel(3, 3, [10, 20, 30, 254]);
        assert!(raster.has_transparency());
    }
}
