// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoder / exporter: PNG (lossless, alpha kept) and JPEG (lossy, flattened
// onto white), plus download naming and `data:` URI previews.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use inkwash_core::error::{InkwashError, Result};
use inkwash_core::{ExportFormat, ExportSpec, ProcessMode};
use tracing::{debug, info, instrument};

use crate::raster::Raster;

/// Serialise `raster` into the container described by `spec`.
#[instrument(skip(raster), fields(width = raster.width(), height = raster.height(), format = ?spec.format))]
pub fn encode(raster: &Raster, spec: &ExportSpec) -> Result<Vec<u8>> {
    let bytes = match spec.format {
        ExportFormat::Png => encode_png(raster)?,
        ExportFormat::Jpeg => encode_jpeg(raster, jpeg_quality(spec.quality))?,
    };
    info!(bytes = bytes.len(), "Image encoded");
    Ok(bytes)
}

/// Lossless PNG, alpha preserved.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|err| InkwashError::Encode(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// JPEG at `quality` (1-100) after compositing onto opaque white.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<Vec<u8>> {
    let rgb = flatten_onto_white(raster);
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    rgb.write_with_encoder(encoder)
        .map_err(|err| InkwashError::Encode(format!("JPEG encoding failed: {}", err)))?;
    debug!(quality, "JPEG written");
    Ok(buffer)
}

/// Map a `0.0..=1.0` quality factor onto the encoder's 1-100 scale.
pub fn jpeg_quality(factor: f32) -> u8 {
    let factor = if factor.is_nan() { 1.0 } else { factor.clamp(0.0, 1.0) };
    (factor * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Alpha-blend every pixel over white and drop the alpha channel.
///
/// `c' = (c * a + 255 * (255 - a)) / 255`, rounded, so a half-transparent
/// pixel lands halfway to white and a fully transparent one is pure white.
pub fn flatten_onto_white(raster: &Raster) -> RgbImage {
    let mut rgb = Vec::with_capacity(raster.pixel_count() * 3);
    for px in raster.as_raw().chunks_exact(4) {
        let a = px[3] as u32;
        let paper = 255 * (255 - a);
        for &c in &px[..3] {
            rgb.push(((c as u32 * a + paper + 127) / 255) as u8);
        }
    }
    // Length is width * height * 3 by construction.
    RgbImage::from_raw(raster.width(), raster.height(), rgb)
        .unwrap_or_else(|| RgbImage::new(raster.width(), raster.height()))
}

/// `{base}_{mode}.{ext}`, e.g. `holiday_coloring.png`.
pub fn export_file_name(base_name: &str, mode: ProcessMode, format: ExportFormat) -> String {
    let base = base_name.trim();
    let base = if base.is_empty() { "image" } else { base };
    format!("{}_{}.{}", base, mode.slug(), format.extension())
}

/// A PNG `data:` URI for previewing `raster` without touching disk.
pub fn data_uri(raster: &Raster) -> Result<String> {
    let png = encode_png(raster)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn patterned() -> Raster {
        let data = (0..9u32 * 7 * 4).map(|i| (i * 31 % 256) as u8).collect();
        Raster::from_rgba(9, 7, data).unwrap()
    }

    #[test]
    fn png_round_trip_is_exact() {
        let raster = patterned();
        let bytes = encode(&raster, &ExportSpec::png("x")).unwrap();
        assert_eq!(decode(&bytes).unwrap(), raster);
    }

    #[test]
    fn flatten_blends_toward_white() {
        let mut raster = Raster::from_pixel(3, 1, [0, 0, 0, 0]);
        raster.put_pixel(1, 0, [10, 100, 200, 255]);
        raster.put_pixel(2, 0, [0, 0, 0, 128]);
        let rgb = flatten_onto_white(&raster);

        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(1, 0).0, [10, 100, 200]);
        for c in rgb.get_pixel(2, 0).0 {
            assert!((126..=128).contains(&c), "half-transparent black gave {c}");
        }
    }

    #[test]
    fn jpeg_of_transparent_pixels_decodes_white() {
        let raster = Raster::from_pixel(16, 16, [30, 60, 90, 0]);
        let bytes = encode(&raster, &ExportSpec::jpeg("x", 0.95)).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (16, 16));
        let px = back.pixel(8, 8);
        assert!(px[..3].iter().all(|&c| c >= 250), "got {px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn quality_factor_maps_to_percent() {
        assert_eq!(jpeg_quality(0.95), 95);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(3.0), 100);
    }

    #[test]
    fn file_name_uses_mode_slug() {
        assert_eq!(
            export_file_name("holiday", ProcessMode::LineArt, ExportFormat::Png),
            "holiday_coloring.png"
        );
        assert_eq!(
            export_file_name("", ProcessMode::Invert, ExportFormat::Jpeg),
            "image_invert.jpg"
        );
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let uri = data_uri(&Raster::from_pixel(1, 1, [0, 0, 0, 255])).unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
