// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale filter: BT.601 luma, optional alpha flattening.

use super::luma;
use crate::raster::Raster;

/// Replace every pixel's colour with its luma.
///
/// With `keep_transparency == false` every pixel comes out fully opaque, which
/// is what a JPEG-bound export wants. Otherwise alpha is copied as-is.
pub fn grayscale(source: &Raster, keep_transparency: bool) -> Raster {
    let mut out = source.clone();
    for px in out.as_raw_mut().chunks_exact_mut(4) {
        let l = luma(px[0], px[1], px[2]);
        px[0] = l;
        px[1] = l;
        px[2] = l;
        if !keep_transparency && px[3] < u8::MAX {
            px[3] = u8::MAX;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Raster {
        let data = (0..8u32 * 8 * 4)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();
        Raster::from_rgba(8, 8, data).unwrap()
    }

    #[test]
    fn red_square_becomes_76_gray() {
        let out = grayscale(&Raster::from_pixel(4, 4, [255, 0, 0, 255]), false);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), [76, 76, 76, 255]);
            }
        }
    }

    #[test]
    fn channels_are_equal_and_match_weighted_luma() {
        let source = sample();
        let out = grayscale(&source, true);
        for (src, dst) in source.as_raw().chunks_exact(4).zip(out.as_raw().chunks_exact(4)) {
            assert_eq!(dst[0], dst[1]);
            assert_eq!(dst[1], dst[2]);
            let expected = 0.299 * src[0] as f32 + 0.587 * src[1] as f32 + 0.114 * src[2] as f32;
            assert!((dst[0] as f32 - expected).abs() <= 1.0, "{} vs {}", dst[0], expected);
        }
    }

    #[test]
    fn keep_transparency_copies_alpha() {
        let source = sample();
        let out = grayscale(&source, true);
        for (src, dst) in source.as_raw().chunks_exact(4).zip(out.as_raw().chunks_exact(4)) {
            assert_eq!(src[3], dst[3]);
        }
    }

    #[test]
    fn dropping_transparency_forces_opaque() {
        let out = grayscale(&Raster::from_pixel(3, 3, [10, 20, 30, 0]), false);
        assert!(!out.has_transparency());
        assert_eq!(out.pixel(1, 1)[3], 255);
    }
}
