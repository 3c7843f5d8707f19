// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Invert filter: colour negative. Alpha is never touched.

use crate::raster::Raster;

/// `c' = 255 - c` for R, G, and B. Applying it twice is the identity.
pub fn invert(source: &Raster) -> Raster {
    let mut out = source.clone();
    for px in out.as_raw_mut().chunks_exact_mut(4) {
        px[0] = u8::MAX - px[0];
        px[1] = u8::MAX - px[1];
        px[2] = u8::MAX - px[2];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_pixel_becomes_black() {
        let out = invert(&Raster::from_pixel(1, 1, [255, 255, 255, 255]));
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn double_invert_is_identity_over_all_values() {
        // 256 x 1 raster covering every channel value, with varied alpha.
        let data = (0..=255u8).flat_map(|v| [v, 255 - v, v / 2, v]).collect();
        let source = Raster::from_rgba(256, 1, data).unwrap();
        assert_eq!(invert(&invert(&source)), source);
    }

    #[test]
    fn alpha_is_preserved() {
        let out = invert(&Raster::from_pixel(2, 2, [10, 20, 30, 77]));
        assert_eq!(out.pixel(1, 0), [245, 235, 225, 77]);
    }
}
