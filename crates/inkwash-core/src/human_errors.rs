// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the editor.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the host presents it.

use crate::error::InkwashError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is (timeouts, busy converters).
    Transient,
    /// The user has to pick a different file or setting.
    ActionRequired,
    /// Nothing the user can do from inside the editor.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same action may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `InkwashError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &InkwashError) -> HumanError {
    match err {
        InkwashError::InputTooLarge { limit, .. } => HumanError {
            message: "This image is too large.".into(),
            suggestion: format!(
                "Please choose an image smaller than {} MB.",
                limit / (1024 * 1024)
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkwashError::UnsupportedFormat(_) => HumanError {
            message: "We can't open this kind of file.".into(),
            suggestion: "Please choose a JPG, PNG, WebP, or HEIC image.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkwashError::Decode(_) | InkwashError::InvalidRaster(_) => HumanError {
            message: "This image seems to be damaged.".into(),
            suggestion: "Try opening it in another app and saving it again, or pick a different image.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkwashError::Transcode(_) => HumanError {
            message: "We couldn't convert this HEIC photo.".into(),
            suggestion: "Export the photo as JPG from your Photos app and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkwashError::TranscodeTimeout { .. } => HumanError {
            message: "Converting the HEIC photo took too long.".into(),
            suggestion: "Try again. If it keeps happening, export the photo as JPG first.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkwashError::Filter(detail) => HumanError {
            message: "Something went wrong while processing the image.".into(),
            suggestion: format!("Try again, or reload the image. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        InkwashError::Encode(_) => HumanError {
            message: "We couldn't create the download.".into(),
            suggestion: "Try the other format (PNG or JPG).".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkwashError::NoSource => HumanError {
            message: "No image is loaded yet.".into(),
            suggestion: "Drop an image or click to choose one.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkwashError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "We couldn't find that file.".into(),
                suggestion: "It may have been moved or deleted. Please choose it again.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "We're not allowed to use that file or folder.".into(),
                suggestion: "Choose a different location, such as your Downloads folder.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "Reading or writing the file failed.".into(),
                suggestion: "Check that the disk isn't full and try again.".into(),
                retriable: true,
                severity: Severity::Transient,
            },
        },

        InkwashError::Serialization(_) => HumanError {
            message: "Your saved settings couldn't be read.".into(),
            suggestion: "Default settings are being used instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkwashError::Bridge(_) => HumanError {
            message: "Your device couldn't complete that action.".into(),
            suggestion: "Try again. If it keeps failing, restart the app.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkwashError::PlatformUnavailable => HumanError {
            message: "This isn't available on your device.".into(),
            suggestion: "For HEIC photos, convert them to JPG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversize_suggestion_names_limit_in_megabytes() {
        let err = InkwashError::InputTooLarge {
            size: 12 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("10 MB"));
    }

    #[test]
    fn transcode_timeout_is_transient() {
        let human = humanize_error(&InkwashError::TranscodeTimeout { seconds: 30 });
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn unsupported_format_lists_accepted_types() {
        let human = humanize_error(&InkwashError::UnsupportedFormat("image/gif".into()));
        assert!(human.suggestion.contains("HEIC"));
        assert!(!human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = InkwashError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
