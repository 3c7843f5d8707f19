// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data and download directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = data_home().join("inkwash");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Where "Download" drops exported images.
///
/// `XDG_DOWNLOAD_DIR`, then `~/Downloads`, then an `exports` folder inside
/// the data directory.
pub fn download_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_DOWNLOAD_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    if let Some(home) = home_dir() {
        return home.join("Downloads");
    }
    data_dir().join("exports")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn data_home() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home_dir() {
        return home.join(".local").join("share");
    }
    std::env::temp_dir()
}
