// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Inkwash: Native platform bridge abstractions.
//!
//! Defines the traits the processing session uses for capabilities that live
//! outside the pure-Rust pipeline (HEIC transcoding, saving downloads) and
//! returns the implementation for the current platform.

pub mod desktop;
pub mod traits;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use inkwash_core::AppConfig;

pub use traits::{NativeHeicTranscode, NativeSaveFile, PlatformBridge};

/// Build the bridge implementation for the target operating system.
///
/// `download_dir` is where saved images land.
pub fn platform_bridge(config: &AppConfig, download_dir: PathBuf) -> Arc<dyn PlatformBridge> {
    Arc::new(
        desktop::DesktopBridge::new(config.heif_convert_command.clone(), download_dir)
            .with_timeout(Duration::from_secs(config.heic_timeout_secs)),
    )
}
