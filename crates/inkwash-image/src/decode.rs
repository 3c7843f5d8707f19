// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer decoder: container sniffing and native decoding to RGBA.
//
// JPEG, PNG, and WebP decode directly. HEIC/HEIF is recognised here but must
// be transcoded by the platform bridge before `decode` will accept it.

use image::ImageFormat;
use inkwash_core::SourceHint;
use inkwash_core::error::{InkwashError, Result};
use tracing::{debug, info, instrument};

use crate::raster::Raster;

/// ISO-BMFF major brands that identify a HEIF-family still image.
const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// Image containers Inkwash knows how to ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceContainer {
    Jpeg,
    Png,
    WebP,
    /// Needs a transcode step before decoding.
    Heic,
    Unknown,
}

impl SourceContainer {
    /// Classify an input from its bytes plus whatever the host knows about it.
    ///
    /// HEIC is recognised by MIME type, by file extension, or by its `ftyp`
    /// brand. Native containers are recognised from their magic bytes only, so
    /// a mislabelled PNG still decodes.
    pub fn sniff(bytes: &[u8], hint: &SourceHint) -> Self {
        if hint_says_heic(hint) || has_heif_brand(bytes) {
            return Self::Heic;
        }
        match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => Self::Jpeg,
            Ok(ImageFormat::Png) => Self::Png,
            Ok(ImageFormat::WebP) => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Whether the `image` crate can decode this container directly.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::WebP)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Heic => "image/heic",
            Self::Unknown => "application/octet-stream",
        }
    }

    fn image_format(&self) -> Option<ImageFormat> {
        match self {
            Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::Png => Some(ImageFormat::Png),
            Self::WebP => Some(ImageFormat::WebP),
            Self::Heic | Self::Unknown => None,
        }
    }
}

fn hint_says_heic(hint: &SourceHint) -> bool {
    let mime = hint
        .mime_type
        .as_deref()
        .map(|m| m.trim().to_ascii_lowercase());
    if matches!(mime.as_deref(), Some("image/heic" | "image/heif")) {
        return true;
    }
    matches!(hint.extension().as_deref(), Some("heic" | "heif"))
}

/// `....ftypXXXX` where `XXXX` is one of the HEIF brands.
fn has_heif_brand(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    HEIF_BRANDS.iter().any(|brand| &bytes[8..12] == brand.as_slice())
}

/// Decode natively supported image bytes into a raster.
///
/// The raster has exactly the intrinsic dimensions of the source; nothing is
/// resampled. HEIC input is rejected with a `Transcode` error because it has
/// to go through the transcoder first.
#[instrument(skip(bytes), fields(data_len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Raster> {
    if bytes.is_empty() {
        return Err(InkwashError::Decode("input is empty".into()));
    }

    let container = SourceContainer::sniff(bytes, &SourceHint::default());
    let format = match container.image_format() {
        Some(format) => format,
        None if container == SourceContainer::Heic => {
            return Err(InkwashError::Transcode(
                "HEIC must be converted before decoding".into(),
            ));
        }
        None => {
            return Err(InkwashError::UnsupportedFormat(
                "not a JPEG, PNG, or WebP image".into(),
            ));
        }
    };
    debug!(container = ?container, "container sniffed");

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|err| InkwashError::Decode(format!("failed to decode image: {}", err)))?;
    let raster = Raster::from(img.to_rgba8());

    info!(
        width = raster.width(),
        height = raster.height(),
        container = container.mime_type(),
        "Image decoded"
    );
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;
    use image::codecs::png::PngEncoder;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 40) as u8, (y * 40) as u8, 200, 180])
        });
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .unwrap();
        buf
    }

    fn heic_header() -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 24];
        bytes.extend_from_slice(b"ftypheic");
        bytes.extend_from_slice(&[0; 12]);
        bytes
    }

    #[test]
    fn decode_preserves_intrinsic_dimensions() {
        let raster = decode(&png_bytes(5, 3)).unwrap();
        assert_eq!(raster.dimensions(), (5, 3));
        assert_eq!(raster.pixel(2, 1), [80, 40, 200, 180]);
    }

    #[test]
    fn empty_input_is_decode_error() {
        assert!(matches!(decode(&[]), Err(InkwashError::Decode(_))));
    }

    #[test]
    fn garbage_is_unsupported() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, InkwashError::UnsupportedFormat(_)));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let mut bytes = png_bytes(8, 8);
        bytes.truncate(40);
        assert!(matches!(decode(&bytes), Err(InkwashError::Decode(_))));
    }

    #[test]
    fn heic_bytes_are_refused_without_transcode() {
        let err = decode(&heic_header()).unwrap_err();
        assert!(matches!(err, InkwashError::Transcode(_)));
    }

    #[test]
    fn sniff_detects_heic_by_mime_extension_or_brand() {
        let png = png_bytes(1, 1);
        let by_mime = SourceHint {
            mime_type: Some("image/HEIC".into()),
            file_name: None,
        };
        assert_eq!(SourceContainer::sniff(&png, &by_mime), SourceContainer::Heic);
        assert_eq!(
            SourceContainer::sniff(&png, &SourceHint::from_file_name("IMG_0042.heif")),
            SourceContainer::Heic
        );
        assert_eq!(
            SourceContainer::sniff(&heic_header(), &SourceHint::default()),
            SourceContainer::Heic
        );
    }

    #[test]
    fn sniff_trusts_magic_over_extension_for_native_formats() {
        let png = png_bytes(1, 1);
        let hint = SourceHint::from_file_name("photo.jpg");
        assert_eq!(SourceContainer::sniff(&png, &hint), SourceContainer::Png);
        assert!(SourceContainer::Png.is_native());
        assert!(!SourceContainer::Heic.is_native());
    }

    #[test]
    fn avif_is_not_mistaken_for_heic() {
        let mut bytes = vec![0, 0, 0, 24];
        bytes.extend_from_slice(b"ftypavif");
        bytes.extend_from_slice(&[0; 12]);
        assert_eq!(
            SourceContainer::sniff(&bytes, &SourceHint::default()),
            SourceContainer::Unknown
        );
    }
}
