// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkwash-image: Pixel processing for Inkwash.
//
// Provides the RGBA raster type, container sniffing and decoding (JPEG, PNG,
// WebP), the three filter kernels (grayscale, Sobel line art, invert), and
// PNG/JPEG export with white flattening for lossy output.

pub mod decode;
pub mod export;
pub mod filter;
pub mod raster;

// Re-export the primary items so callers can use `inkwash_image::Raster` etc.
pub use decode::{SourceContainer, decode};
pub use export::{data_uri, encode, export_file_name};
pub use filter::apply_filter;
pub use raster::Raster;
