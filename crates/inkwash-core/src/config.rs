// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{DEFAULT_JPEG_QUALITY, DEFAULT_THRESHOLD, ExportFormat, ProcessMode};

/// Largest file accepted for decoding (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inputs larger than this are rejected before decoding.
    pub max_input_bytes: u64,
    /// Mode a new editing session starts in.
    pub default_mode: ProcessMode,
    /// Initial line-art edge threshold (0-255, lower = more lines).
    pub default_threshold: u8,
    /// Container preselected for downloads.
    pub default_export_format: ExportFormat,
    /// Lossy quality factor for JPEG downloads (0.0-1.0).
    pub jpeg_quality: f32,
    /// Upper bound on a single HEIC conversion.
    pub heic_timeout_secs: u64,
    /// External HEIC converter used on desktop (libheif's `heif-convert`).
    pub heif_convert_command: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            default_mode: ProcessMode::Grayscale,
            default_threshold: DEFAULT_THRESHOLD,
            default_export_format: ExportFormat::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            heic_timeout_secs: 30,
            heif_convert_command: "heif-convert".into(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.as_ref().display(), "config loaded");
        Ok(config.validated())
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Clamp values that would make the pipeline misbehave.
    pub fn validated(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.jpeg_quality) {
            warn!(quality = self.jpeg_quality, "jpeg_quality out of range, using default");
            self.jpeg_quality = DEFAULT_JPEG_QUALITY;
        }
        if self.max_input_bytes == 0 {
            self.max_input_bytes = DEFAULT_MAX_INPUT_BYTES;
        }
        if self.heic_timeout_secs == 0 {
            self.heic_timeout_secs = 1;
        }
        if self.heif_convert_command.trim().is_empty() {
            self.heif_convert_command = Self::default().heif_convert_command;
        }
        self
    }
}
