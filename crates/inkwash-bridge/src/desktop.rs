// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge.
//
// HEIC goes through libheif's `heif-convert` command-line tool when it is on
// the PATH; without it, transcoding reports `PlatformUnavailable`. A converter
// still running at the deadline is killed. Saving
// writes into a downloads directory and never overwrites an existing file.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use inkwash_core::error::{InkwashError, Result};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::traits::*;

/// Bridge for Linux, macOS, and Windows desktops.
pub struct DesktopBridge {
    /// Program invoked as `<cmd> <input.heic> <output.png>`.
    heif_convert: String,
    /// Directory exported images are written into.
    download_dir: PathBuf,
    /// How long `heif-convert` may run before it is killed.
    timeout: Duration,
}

impl DesktopBridge {
    pub fn new(heif_convert: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            heif_convert: heif_convert.into(),
            download_dir: download_dir.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        std::env::consts::OS
    }
}

impl NativeHeicTranscode for DesktopBridge {
    #[instrument(skip(self, heic), fields(data_len = heic.len(), tool = %self.heif_convert))]
    fn transcode_heic(&self, heic: &[u8]) -> Result<Vec<u8>> {
        let scratch = std::env::temp_dir();
        let id = Uuid::new_v4();
        let input = scratch.join(format!("inkwash-{id}.heic"));
        let output = scratch.join(format!("inkwash-{id}.png"));

        std::fs::write(&input, heic)?;
        let result = run_heif_convert(&self.heif_convert, &input, &output, self.timeout);

        let _ = std::fs::remove_file(&input);
        let converted = result.and_then(|()| Ok(std::fs::read(&output)?));
        let _ = std::fs::remove_file(&output);

        let bytes = converted?;
        info!(png_len = bytes.len(), "HEIC transcoded");
        Ok(bytes)
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(25);

fn run_heif_convert(program: &str, input: &Path, output: &Path, timeout: Duration) -> Result<()> {
    let mut child = match Command::new(program)
        .arg(input)
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(program, "HEIC converter not installed");
            return Err(InkwashError::PlatformUnavailable);
        }
        Err(e) => return Err(InkwashError::Transcode(format!("could not run {program}: {e}"))),
    };

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            warn!(program, timeout_secs = timeout.as_secs(), "HEIC converter killed at deadline");
            return Err(InkwashError::TranscodeTimeout {
                seconds: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        return Err(InkwashError::Transcode(format!(
            "{program} exited with {status}: {}",
            stderr.trim()
        )));
    }
    debug!("heif-convert finished");
    Ok(())
}

impl NativeSaveFile for DesktopBridge {
    #[instrument(skip(self, bytes), fields(data_len = bytes.len()))]
    fn save_file(&self, file_name: &str, bytes: &[u8], _mime_type: &str) -> Result<String> {
        std::fs::create_dir_all(&self.download_dir)?;
        let path = unique_path(&self.download_dir, sanitize_file_name(file_name));
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), "file saved");
        Ok(path.display().to_string())
    }
}

/// Strip path separators so a file name can't escape the download directory.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').trim();
    if cleaned.is_empty() {
        "image".into()
    } else {
        cleaned.to_string()
    }
}

/// `dir/name`, or `dir/stem (n).ext` for the first free `n`.
fn unique_path(dir: &Path, name: String) -> PathBuf {
    let candidate = dir.join(&name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
        None => (name.clone(), String::new()),
    };
    (1u32..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new("heif-convert", dir.path());

        let first = bridge.save_file("cat_invert.png", b"one", "image/png").unwrap();
        let second = bridge.save_file("cat_invert.png", b"two", "image/png").unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("cat_invert (1).png"));
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let bridge = DesktopBridge::new("heif-convert", &nested);
        bridge.save_file("x.jpg", b"jpeg", "image/jpeg").unwrap();
        assert!(nested.join("x.jpg").exists());
    }

    #[test]
    fn file_names_cannot_escape_directory() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("..."), "image");
        assert_eq!(sanitize_file_name("ok_name.png"), "ok_name.png");
    }

    #[test]
    fn missing_converter_is_platform_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new("inkwash-no-such-heif-tool", dir.path());
        let err = bridge.transcode_heic(b"not really heic").unwrap_err();
        assert!(matches!(err, InkwashError::PlatformUnavailable));
    }

    // `sh <input> <output>` runs the payload as a script with the output
    // path in `$1`.
    #[cfg(unix)]
    #[test]
    fn converter_output_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new("sh", dir.path());
        let script = b"printf converted > \"$1\"\n";
        assert_eq!(bridge.transcode_heic(script).unwrap(), b"converted");
    }

    #[cfg(unix)]
    #[test]
    fn failing_converter_is_transcode_error() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new("sh", dir.path());
        let err = bridge.transcode_heic(b"echo broken >&2; exit 3\n").unwrap_err();
        match err {
            InkwashError::Transcode(detail) => assert!(detail.contains("broken")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn hung_converter_is_killed_at_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new("sh", dir.path()).with_timeout(Duration::from_secs(1));

        let started = Instant::now();
        let err = bridge.transcode_heic(b"sleep 30\n").unwrap_err();

        assert!(matches!(err, InkwashError::TranscodeTimeout { seconds: 1 }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
