// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// The pixel pipeline itself is pure Rust. The two things it cannot do alone
// are decoding HEIC (no pure-Rust HEVC decoder) and handing a finished file
// to the platform's save/download mechanism.

use inkwash_core::error::Result;

/// Unified bridge that groups all native capabilities.
///
/// Shared across tasks, so implementations must be `Send + Sync`.
pub trait PlatformBridge: NativeHeicTranscode + NativeSaveFile + Send + Sync {
    /// Human-readable platform name (e.g. "Linux desktop").
    fn platform_name(&self) -> &str;
}

/// Convert HEIC/HEIF into a container the decoder understands.
pub trait NativeHeicTranscode {
    /// Transcode the HEIC bytes into PNG or JPEG bytes.
    ///
    /// Returns `PlatformUnavailable` when this platform has no converter.
    /// This call may block; run it off the async executor. Implementations
    /// that spawn a converter stop it after their configured timeout.
    fn transcode_heic(&self, heic: &[u8]) -> Result<Vec<u8>>;
}

/// Hand an exported image to the platform's save/download primitive.
pub trait NativeSaveFile {
    /// Save `bytes` under `file_name`. Returns where the file ended up
    /// (a path on desktop).
    fn save_file(&self, file_name: &str, bytes: &[u8], mime_type: &str) -> Result<String>;
}
