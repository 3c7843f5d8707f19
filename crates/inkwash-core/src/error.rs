// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Inkwash.

use thiserror::Error;

/// Top-level error type for all Inkwash operations.
#[derive(Debug, Error)]
pub enum InkwashError {
    // -- Decode errors --
    #[error("input is {size} bytes, larger than the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image decoding failed: {0}")]
    Decode(String),

    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    // -- Transcode errors --
    #[error("HEIC conversion failed: {0}")]
    Transcode(String),

    #[error("HEIC conversion timed out after {seconds}s")]
    TranscodeTimeout { seconds: u64 },

    // -- Processing / export --
    #[error("filter failed: {0}")]
    Filter(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("no image loaded")]
    NoSource,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Coarse grouping of errors, matching the stage of the pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Decode,
    Transcode,
    Filter,
    Encode,
    Platform,
    Other,
}

impl InkwashError {
    /// Which pipeline stage produced this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputTooLarge { .. }
            | Self::UnsupportedFormat(_)
            | Self::Decode(_)
            | Self::InvalidRaster(_) => ErrorCategory::Decode,
            Self::Transcode(_) | Self::TranscodeTimeout { .. } => ErrorCategory::Transcode,
            Self::Filter(_) => ErrorCategory::Filter,
            Self::Encode(_) => ErrorCategory::Encode,
            Self::Bridge(_) | Self::PlatformUnavailable => ErrorCategory::Platform,
            Self::NoSource | Self::Io(_) | Self::Serialization(_) => ErrorCategory::Other,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InkwashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_pipeline_stage() {
        let too_big = InkwashError::InputTooLarge { size: 11, limit: 10 };
        assert_eq!(too_big.category(), ErrorCategory::Decode);
        assert_eq!(
            InkwashError::TranscodeTimeout { seconds: 30 }.category(),
            ErrorCategory::Transcode
        );
        assert_eq!(InkwashError::Encode("x".into()).category(), ErrorCategory::Encode);
        assert_eq!(InkwashError::PlatformUnavailable.category(), ErrorCategory::Platform);
    }

    #[test]
    fn too_large_message_names_both_sizes() {
        let msg = InkwashError::InputTooLarge { size: 20, limit: 10 }.to_string();
        assert!(msg.contains("20"));
        assert!(msg.contains("10"));
    }
}
