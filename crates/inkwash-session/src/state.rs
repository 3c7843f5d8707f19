// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session lifecycle states and the user-adjustable settings.

use inkwash_core::{AppConfig, ExportFormat, ProcessMode, ProcessingRequest};

/// Where an editing session is in its lifecycle.
///
/// ```text
/// Empty --load--> Loaded --process--> Processing --ok--> Processed
///                                         |
///                                         +--err--> Failed
/// any --reset--> Empty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No source image.
    #[default]
    Empty,
    /// A source is held, nothing has been filtered yet.
    Loaded,
    /// A filter run is in flight.
    Processing,
    /// The newest run finished and its result is displayed.
    Processed,
    /// The newest load or run failed; any earlier source is still held.
    Failed,
}

impl SessionState {
    pub fn has_source(&self) -> bool {
        matches!(self, Self::Loaded | Self::Processing | Self::Processed | Self::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "No image",
            Self::Loaded => "Ready",
            Self::Processing => "Processing...",
            Self::Processed => "Done",
            Self::Failed => "Failed",
        }
    }
}

/// The knobs the user can turn between runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub mode: ProcessMode,
    pub threshold: u8,
    pub keep_transparency: bool,
    pub export_format: ExportFormat,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            mode: config.default_mode,
            threshold: config.default_threshold,
            keep_transparency: config.default_export_format.supports_alpha(),
            export_format: config.default_export_format,
        }
    }

    /// The filter invocation these settings describe.
    pub fn request(&self) -> ProcessingRequest {
        ProcessingRequest {
            mode: self.mode,
            threshold: self.threshold,
            keep_transparency: self.keep_transparency,
        }
    }

    /// Adopt the filter parameters of `request`, leaving the export format.
    pub fn apply(&mut self, request: ProcessingRequest) {
        self.mode = request.mode;
        self.threshold = request.threshold;
        self.keep_transparency = request.keep_transparency;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_default_disables_transparency() {
        let config = AppConfig {
            default_export_format: ExportFormat::Jpeg,
            ..AppConfig::default()
        };
        let settings = Settings::from_config(&config);
        assert!(!settings.keep_transparency);
        assert!(Settings::default().keep_transparency);
    }

    #[test]
    fn apply_keeps_export_format() {
        let mut settings = Settings {
            export_format: ExportFormat::Jpeg,
            ..Settings::default()
        };
        settings.apply(ProcessingRequest::line_art(42));
        assert_eq!(settings.mode, ProcessMode::LineArt);
        assert_eq!(settings.threshold, 42);
        assert_eq!(settings.export_format, ExportFormat::Jpeg);
        assert_eq!(settings.request(), ProcessingRequest::line_art(42));
    }

    #[test]
    fn only_empty_has_no_source() {
        assert!(!SessionState::Empty.has_source());
        assert!(SessionState::Failed.has_source());
        assert!(SessionState::Processing.has_source());
    }
}
