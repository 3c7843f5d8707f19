// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Inkwash image processor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three visual variants Inkwash can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessMode {
    /// BT.601 luma grayscale.
    Grayscale,
    /// Sobel edge detection, binarised to black lines on white.
    LineArt,
    /// Colour negative.
    Invert,
}

impl ProcessMode {
    pub const ALL: [ProcessMode; 3] = [Self::Grayscale, Self::LineArt, Self::Invert];

    /// Short name used in exported file names and logs.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::LineArt => "coloring",
            Self::Invert => "invert",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" => Some(Self::Grayscale),
            "coloring" | "line-art" | "lineart" => Some(Self::LineArt),
            "invert" => Some(Self::Invert),
            _ => None,
        }
    }

    /// Label shown in the editor.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grayscale => "Black & white",
            Self::LineArt => "Coloring page",
            Self::Invert => "Invert colors",
        }
    }
}

impl std::fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Edge sensitivity used when no threshold is configured.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// A single filter invocation.
///
/// `threshold` only affects [`ProcessMode::LineArt`]; `keep_transparency`
/// only affects [`ProcessMode::Grayscale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub mode: ProcessMode,
    pub threshold: u8,
    pub keep_transparency: bool,
}

impl ProcessingRequest {
    pub fn new(mode: ProcessMode) -> Self {
        Self {
            mode,
            threshold: DEFAULT_THRESHOLD,
            keep_transparency: true,
        }
    }

    pub fn grayscale(keep_transparency: bool) -> Self {
        Self {
            keep_transparency,
            ..Self::new(ProcessMode::Grayscale)
        }
    }

    pub fn line_art(threshold: u8) -> Self {
        Self {
            threshold,
            ..Self::new(ProcessMode::LineArt)
        }
    }

    pub fn invert() -> Self {
        Self::new(ProcessMode::Invert)
    }
}

/// Output containers offered for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Lossless, alpha-capable.
    Png,
    /// Lossy, no alpha channel.
    Jpeg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Whether the container can carry an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Self::Png)
    }
}

/// Default lossy quality when none is configured.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.95;

/// How a processed image should be serialised for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpec {
    pub format: ExportFormat,
    /// Lossy quality factor in `0.0..=1.0`. Ignored for PNG.
    pub quality: f32,
    /// Source file name without its extension.
    pub base_name: String,
}

impl ExportSpec {
    pub fn png(base_name: impl Into<String>) -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 1.0,
            base_name: base_name.into(),
        }
    }

    pub fn jpeg(base_name: impl Into<String>, quality: f32) -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: quality.clamp(0.0, 1.0),
            base_name: base_name.into(),
        }
    }
}

/// Metadata the host knows about an incoming file, used for container sniffing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceHint {
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

impl SourceHint {
    pub fn from_file_name(name: impl Into<String>) -> Self {
        Self {
            mime_type: None,
            file_name: Some(name.into()),
        }
    }

    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// File name with its final extension removed; `image` when unknown.
    pub fn base_name(&self) -> String {
        let name = match self.file_name.as_deref() {
            Some(name) => name.rsplit(['/', '\\']).next().unwrap_or(name),
            None => return "image".into(),
        };
        let stem = match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        };
        if stem.is_empty() {
            "image".into()
        } else {
            stem.to_string()
        }
    }
}
