// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-art filter: Sobel edge detection binarised into a coloring page.
//
// Two passes over the image:
//
// 1. Collapse RGB into a single-channel luma map (computed once, so the 3x3
//    inner loop reads 9 bytes instead of recomputing 9 weighted sums).
// 2. For each interior pixel, correlate the 3x3 neighbourhood with the Sobel
//    Gx / Gy kernels and compare the gradient magnitude with the threshold.
//    Edges are drawn black, everything else white, always fully opaque.
//
// The one-pixel frame (x = 0, x = w-1, y = 0, y = h-1) has no full
// neighbourhood and is left as transparent black (0, 0, 0, 0).

use super::luma;
use crate::raster::Raster;

/// Horizontal gradient kernel, row-major.
pub const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
/// Vertical gradient kernel, row-major.
pub const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

const EDGE: [u8; 4] = [0, 0, 0, 255];
const PAPER: [u8; 4] = [255, 255, 255, 255];

/// Produce black-on-white line art from `source`.
///
/// A pixel is an edge when `sqrt(gx^2 + gy^2) > threshold`; lowering the
/// threshold can only add edges, never remove them.
pub fn line_art(source: &Raster, threshold: u8) -> Raster {
    let (width, height) = source.dimensions();
    let mut out = Raster::transparent(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    let luma_map = luminance_map(source);
    let w = width as usize;
    let h = height as usize;
    let threshold = threshold as f32;
    let dst = out.as_raw_mut();

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let (gx, gy) = sobel_at(&luma_map, w, x, y);
            let magnitude = ((gx * gx + gy * gy) as f32).sqrt();
            let colour = if magnitude > threshold { EDGE } else { PAPER };
            let idx = (y * w + x) * 4;
            dst[idx..idx + 4].copy_from_slice(&colour);
        }
    }

    out
}

/// One luma byte per pixel, row-major.
fn luminance_map(source: &Raster) -> Vec<u8> {
    source
        .as_raw()
        .chunks_exact(4)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

/// Gx and Gy at interior position `(x, y)` of a `width`-wide luma map.
#[inline]
fn sobel_at(luma_map: &[u8], width: usize, x: usize, y: usize) -> (i32, i32) {
    let mut gx = 0i32;
    let mut gy = 0i32;
    for ky in 0..3 {
        let row = (y + ky - 1) * width;
        for kx in 0..3 {
            let sample = luma_map[row + x + kx - 1] as i32;
            let k = ky * 3 + kx;
            gx += sample * SOBEL_X[k];
            gy += sample * SOBEL_Y[k];
        }
    }
    (gx, gy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    /// Left half black, right half white, with a soft gradient band in between.
    fn step_image(width: u32, height: u32) -> Raster {
        let mut raster = Raster::from_pixel(width, height, [255, 255, 255, 255]);
        for y in 0..height {
            for x in 0..width {
                let v = (x * 255 / (width - 1)) as u8;
                let noisy = v.wrapping_add(((x * 7 + y * 13) % 5) as u8);
                raster.put_pixel(x, y, [noisy, v, 255 - noisy, 200]);
            }
        }
        raster
    }

    fn black_count(raster: &Raster) -> usize {
        raster
            .as_raw()
            .chunks_exact(4)
            .filter(|px| px[..] == EDGE[..])
            .count()
    }

    #[test]
    fn flat_image_has_no_edges() {
        for threshold in [0, 1, 100, 255] {
            let out = line_art(&Raster::from_pixel(10, 10, [90, 140, 30, 255]), threshold);
            for y in 1..9 {
                for x in 1..9 {
                    assert_eq!(out.pixel(x, y), [255, 255, 255, 255]);
                }
            }
        }
    }

    #[test]
    fn interior_output_is_binary_and_opaque() {
        let out = line_art(&step_image(16, 12), 40);
        for y in 1..11 {
            for x in 1..15 {
                let px = out.pixel(x, y);
                assert!(px == EDGE || px == PAPER, "pixel ({x},{y}) = {px:?}");
            }
        }
    }

    #[test]
    fn border_is_transparent_black() {
        let out = line_art(&step_image(8, 6), 10);
        for x in 0..8 {
            assert_eq!(out.pixel(x, 0), [0, 0, 0, 0]);
            assert_eq!(out.pixel(x, 5), [0, 0, 0, 0]);
        }
        for y in 0..6 {
            assert_eq!(out.pixel(0, y), [0, 0, 0, 0]);
            assert_eq!(out.pixel(7, y), [0, 0, 0, 0]);
        }
    }

    #[test]
    fn sharp_vertical_edge_is_detected() {
        let mut source = Raster::from_pixel(6, 5, [255, 255, 255, 255]);
        for y in 0..5 {
            for x in 0..3 {
                source.put_pixel(x, y, [0, 0, 0, 255]);
            }
        }
        let out = line_art(&source, 128);
        // Columns 2 and 3 straddle the step; gradient there is 4 * 255.
        assert_eq!(out.pixel(2, 2), EDGE);
        assert_eq!(out.pixel(3, 2), EDGE);
        assert_eq!(out.pixel(1, 2), PAPER);
        assert_eq!(out.pixel(4, 2), PAPER);
    }

    #[test]
    fn magnitude_equal_to_threshold_stays_white() {
        // Rows 0..3 have luma 0, rows 3..6 luma 1: the rows either side of
        // the step see gy = 4 and gx = 0.
        let mut source = Raster::from_pixel(5, 6, [0, 0, 0, 255]);
        for y in 3..6 {
            for x in 0..5 {
                source.put_pixel(x, y, [1, 1, 1, 255]);
            }
        }
        assert_eq!(sobel_at(&luminance_map(&source), 5, 2, 2), (0, 4));

        let at_threshold = line_art(&source, 4);
        assert_eq!(at_threshold.pixel(2, 2), PAPER);
        assert_eq!(at_threshold.pixel(2, 3), PAPER);

        let below = line_art(&source, 3);
        assert_eq!(below.pixel(2, 2), EDGE);
        assert_eq!(below.pixel(2, 3), EDGE);
    }

    #[test]
    fn lower_threshold_never_removes_edges() {
        let source = step_image(32, 24);
        let mut previous = 0;
        for threshold in (0..=255u8).rev().step_by(5) {
            let count = black_count(&line_art(&source, threshold));
            assert!(count >= previous, "threshold {threshold}: {count} < {previous}");
            previous = count;
        }
    }

    #[test]
    fn tiny_images_are_all_border() {
        for (w, h) in [(1, 1), (2, 5), (5, 2)] {
            let out = line_art(&Raster::from_pixel(w, h, [9, 9, 9, 255]), 0);
            assert_eq!(out, Raster::transparent(w, h));
        }
    }

    #[test]
    fn magnitudes_agree_with_imageproc_sobel() {
        let source = step_image(12, 9);
        let (w, h) = source.dimensions();
        let gray = GrayImage::from_raw(w, h, luminance_map(&source)).unwrap();
        let ref_x = imageproc::gradients::horizontal_sobel(&gray);
        let ref_y = imageproc::gradients::vertical_sobel(&gray);
        let map = luminance_map(&source);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let (gx, gy) = sobel_at(&map, w as usize, x as usize, y as usize);
                let rx = ref_x.get_pixel(x, y)[0] as i32;
                let ry = ref_y.get_pixel(x, y)[0] as i32;
                // Kernel orientation conventions may differ by sign only.
                assert_eq!(gx.abs(), rx.abs(), "gx at ({x},{y})");
                assert_eq!(gy.abs(), ry.abs(), "gy at ({x},{y})");
            }
        }
    }
}
