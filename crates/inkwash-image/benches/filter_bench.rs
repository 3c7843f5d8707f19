// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the filter kernels and encoders in inkwash-image.
// Uses a 512x512 synthetic photo-like raster (smooth gradients plus a few
// hard-edged shapes) so the Sobel pass sees a realistic edge density.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use inkwash_core::{ExportSpec, ProcessMode, ProcessingRequest};
use inkwash_image::{Raster, apply_filter, encode};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn synthetic_photo(size: u32) -> Raster {
    let mut raster = Raster::transparent(size, size);
    for y in 0..size {
        for x in 0..size {
            let r = (x * 255 / size) as u8;
            let g = (y * 255 / size) as u8;
            let b = ((x + y) * 127 / size) as u8;
            let inside_box = (size / 4..size / 2).contains(&x) && (size / 3..size / 2).contains(&y);
            let px = if inside_box { [20, 20, 160, 255] } else { [r, g, b, 255] };
            raster.put_pixel(x, y, px);
        }
    }
    raster
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_filters(c: &mut Criterion) {
    let source = synthetic_photo(512);

    for mode in ProcessMode::ALL {
        let request = ProcessingRequest::new(mode);
        c.bench_function(&format!("{} (512x512)", mode.slug()), |b| {
            b.iter(|| black_box(apply_filter(black_box(&source), &request)));
        });
    }
}

fn bench_encoders(c: &mut Criterion) {
    let source = synthetic_photo(512);
    let png = ExportSpec::png("bench");
    let jpeg = ExportSpec::jpeg("bench", 0.95);

    c.bench_function("encode png (512x512)", |b| {
        b.iter(|| black_box(encode(black_box(&source), &png)));
    });
    c.bench_function("encode jpeg q95 (512x512)", |b| {
        b.iter(|| black_box(encode(black_box(&source), &jpeg)));
    });
}

criterion_group!(benches, bench_filters, bench_encoders);
criterion_main!(benches);
