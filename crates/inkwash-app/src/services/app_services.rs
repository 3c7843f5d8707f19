// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: owns the editing session and the persisted config,
// and provides async-friendly methods for the Dioxus UI to call.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use inkwash_bridge::platform_bridge;
use inkwash_core::error::Result;
use inkwash_core::{AppConfig, SourceHint};
use inkwash_image::export_file_name;
use inkwash_session::{EditorSession, ProcessingResult, RunOutcome};
use tracing::{info, instrument, warn};

use super::data_dir;

const CONFIG_FILE: &str = "config.json";

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable so the struct can be moved into
/// closures and async blocks.
#[derive(Clone)]
pub struct AppServices {
    session: EditorSession,
    data_dir: PathBuf,
    download_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise services from the user's data directory. Call once at
    /// app startup.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        std::fs::create_dir_all(&dir)?;
        let config = load_config(&dir);
        Ok(Self::build(dir, data_dir::download_dir(), config))
    }

    /// Services with default settings in a scratch directory, for when the
    /// data directory is unusable.
    pub fn fallback() -> Self {
        let dir = std::env::temp_dir().join("inkwash");
        std::fs::create_dir_all(&dir).ok();
        Self::build(dir, data_dir::download_dir(), AppConfig::default())
    }

    fn build(data_dir: PathBuf, download_dir: PathBuf, config: AppConfig) -> Self {
        let bridge = platform_bridge(&config, download_dir.clone());
        info!(
            data_dir = %data_dir.display(),
            download_dir = %download_dir.display(),
            "initialising app services"
        );
        Self {
            session: EditorSession::new(config.clone(), bridge),
            data_dir,
            download_dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    // -- Editing -------------------------------------------------------------

    /// Read an image from disk, load it, and run the current filter.
    #[instrument(skip(self))]
    pub async fn open_path(&self, path: PathBuf) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        let bytes = tokio::fs::read(&path).await?;
        let hint = path
            .file_name()
            .map(|name| SourceHint::from_file_name(name.to_string_lossy()))
            .unwrap_or_default();
        self.session.open(bytes, hint).await
    }

    /// File name a download of the current result would get.
    pub fn suggested_file_name(&self) -> Option<String> {
        let spec = self.session.export_spec()?;
        let result = self.session.result()?;
        Some(export_file_name(&spec.base_name, result.request.mode, spec.format))
    }

    /// Export the current result to a user-chosen path.
    pub async fn export_to(&self, path: &Path) -> Result<Option<String>> {
        let Some(spec) = self.session.export_spec() else {
            return Ok(None);
        };
        let Some(image) = self.session.export(&spec).await? else {
            return Ok(None);
        };
        tokio::fs::write(path, &image.bytes).await?;
        info!(path = %path.display(), bytes = image.bytes.len(), "image written");
        Ok(Some(path.display().to_string()))
    }

    /// Export the current result into the downloads directory.
    pub async fn download(&self) -> Result<Option<String>> {
        let Some(spec) = self.session.export_spec() else {
            return Ok(None);
        };
        self.session.save(&spec).await
    }

    // -- Config --------------------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Update and persist the config. Takes effect for the next session.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let config = config.clone().validated();
        config.save(self.data_dir.join(CONFIG_FILE))?;
        *self.config.lock().expect("config lock poisoned") = config;
        Ok(())
    }
}

fn load_config(data_dir: &Path) -> AppConfig {
    let path = data_dir.join(CONFIG_FILE);
    if !path.exists() {
        return AppConfig::default();
    }
    AppConfig::load(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable config");
        AppConfig::default()
    })
}
