// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter kernels: grayscale, Sobel line art, and colour inversion.
//
// Every filter is a pure function of (raster, parameters): it reads the input
// and returns a new raster, so re-running a request against the same source
// always yields the same pixels.

pub mod grayscale;
pub mod invert;
pub mod line_art;

use inkwash_core::{ProcessMode, ProcessingRequest};
use tracing::{debug, instrument};

use crate::raster::Raster;

pub use grayscale::grayscale;
pub use invert::invert;
pub use line_art::line_art;

/// ITU-R BT.601 luma weights.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Perceptual luminance of an RGB triple, rounded to the nearest integer.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    l.round().clamp(0.0, 255.0) as u8
}

/// Run the filter selected by `request.mode` against `source`.
///
/// `source` is never modified; the result is a fresh raster of the same size.
#[instrument(skip(source), fields(width = source.width(), height = source.height()))]
pub fn apply_filter(source: &Raster, request: &ProcessingRequest) -> Raster {
    let out = match request.mode {
        ProcessMode::Grayscale => grayscale(source, request.keep_transparency),
        ProcessMode::LineArt => line_art(source, request.threshold),
        ProcessMode::Invert => invert(source),
    };
    debug!(mode = %request.mode, "filter applied");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_matches_bt601_weights() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
    }

    #[test]
    fn apply_filter_leaves_source_untouched() {
        let source = Raster::from_pixel(6, 6, [12, 200, 90, 128]);
        let before = source.clone();
        for mode in ProcessMode::ALL {
            let _ = apply_filter(&source, &ProcessingRequest::new(mode));
        }
        assert_eq!(source, before);
    }

    #[test]
    fn same_request_twice_is_bit_identical() {
        let source = Raster::from_rgba(
            5,
            4,
            (0..5 * 4 * 4).map(|i| (i * 37 % 256) as u8).collect(),
        )
        .unwrap();
        for mode in ProcessMode::ALL {
            let request = ProcessingRequest {
                mode,
                threshold: 60,
                keep_transparency: false,
            };
            assert_eq!(apply_filter(&source, &request), apply_filter(&source, &request));
        }
    }

    #[test]
    fn output_keeps_source_dimensions() {
        let source = Raster::from_pixel(7, 3, [1, 2, 3, 4]);
        for mode in ProcessMode::ALL {
            let out = apply_filter(&source, &ProcessingRequest::new(mode));
            assert_eq!(out.dimensions(), (7, 3));
            assert_eq!(out.as_raw().len(), 7 * 3 * 4);
        }
    }
}
