// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editing session: holds one pristine source image, the current settings,
// and the newest filtered result.
//
// Every filter run starts from the untouched source, never from a previous
// result. Runs are numbered from a monotonic counter that loads and resets
// also advance; when a run finishes, its output is published only if no newer
// operation has been issued in the meantime. Older runs are allowed to finish
// on the blocking pool but their output is dropped.
//
// Loads carry a second counter that only loads and resets advance, so a
// settings change made while an image is still arriving never drops it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use inkwash_bridge::PlatformBridge;
use inkwash_core::error::{InkwashError, Result};
use inkwash_core::human_errors::{HumanError, humanize_error};
use inkwash_core::{
    AppConfig, ExportFormat, ExportSpec, ProcessMode, ProcessingRequest, SessionId, SourceHint,
};
use inkwash_image::{Raster, apply_filter, data_uri, encode, export_file_name};
use tracing::{debug, info, instrument, warn};

use crate::ingest::{LoadedSource, ingest};
use crate::state::{SessionState, Settings};

/// What became of an operation once it finished.
#[derive(Debug, Clone)]
pub enum RunOutcome<T> {
    /// The operation was the newest one and its effect is now visible.
    Applied(T),
    /// A newer operation was issued first and the output was dropped. Runs
    /// yield to any newer load, run, or reset; loads only to a newer load or
    /// a reset.
    Superseded,
    /// Nothing to do (no source loaded, or the settings did not change).
    Skipped,
}

impl<T> RunOutcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// A published filter output.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Position of the producing run in the session's operation order.
    pub sequence: u64,
    pub request: ProcessingRequest,
    pub raster: Raster,
    /// PNG `data:` URI for on-screen preview.
    pub preview_uri: String,
    pub completed_at: DateTime<Utc>,
}

/// Encoded bytes ready to hand to a download/save primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
struct Source {
    raster: Raster,
    base_name: String,
    preview_uri: String,
}

impl From<LoadedSource> for Source {
    fn from(loaded: LoadedSource) -> Self {
        Self {
            raster: loaded.raster,
            base_name: loaded.base_name,
            preview_uri: loaded.preview_uri,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    settings: Settings,
    source: Option<Arc<Source>>,
    result: Option<Arc<ProcessingResult>>,
    last_error: Option<HumanError>,
}

/// One user's editing session.
///
/// Cheap to clone; clones share the same state, so one handle can drive a
/// run while another resets or changes settings.
#[derive(Clone)]
pub struct EditorSession {
    id: SessionId,
    config: Arc<AppConfig>,
    bridge: Arc<dyn PlatformBridge>,
    inner: Arc<Mutex<Inner>>,
    /// Number of the most recently issued operation.
    sequence: Arc<AtomicU64>,
    /// Number of the most recently issued load.
    load_generation: Arc<AtomicU64>,
}

impl EditorSession {
    pub fn new(config: AppConfig, bridge: Arc<dyn PlatformBridge>) -> Self {
        let inner = Inner {
            settings: Settings::from_config(&config),
            ..Inner::default()
        };
        let id = SessionId::new();
        info!(session = %id, platform = bridge.platform_name(), "Editor session created");
        Self {
            id,
            config: Arc::new(config),
            bridge,
            inner: Arc::new(Mutex::new(inner)),
            sequence: Arc::new(AtomicU64::new(0)),
            load_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("session lock poisoned")
    }

    /// Allocate the next operation number. Callers hold the session lock.
    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, sequence: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == sequence
    }

    fn next_load(&self) -> u64 {
        self.load_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest_load(&self, generation: u64) -> bool {
        self.load_generation.load(Ordering::SeqCst) == generation
    }

    // -- Queries --------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Whether a filter run is in flight.
    pub fn is_processing(&self) -> bool {
        self.state() == SessionState::Processing
    }

    pub fn settings(&self) -> Settings {
        self.lock().settings
    }

    /// The newest published result, if any.
    pub fn result(&self) -> Option<Arc<ProcessingResult>> {
        self.lock().result.clone()
    }

    /// `data:` URI of the untouched source.
    pub fn source_preview(&self) -> Option<String> {
        self.lock().source.as_ref().map(|s| s.preview_uri.clone())
    }

    pub fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.lock().source.as_ref().map(|s| s.raster.dimensions())
    }

    /// Download name stem of the current source.
    pub fn base_name(&self) -> Option<String> {
        self.lock().source.as_ref().map(|s| s.base_name.clone())
    }

    pub fn last_error(&self) -> Option<HumanError> {
        self.lock().last_error.clone()
    }

    /// Export settings derived from the current format and source name.
    pub fn export_spec(&self) -> Option<ExportSpec> {
        let inner = self.lock();
        let base_name = inner.source.as_ref()?.base_name.clone();
        Some(match inner.settings.export_format {
            ExportFormat::Png => ExportSpec::png(base_name),
            ExportFormat::Jpeg => ExportSpec::jpeg(base_name, self.config.jpeg_quality),
        })
    }

    // -- Loading --------------------------------------------------------------

    /// Replace the source image.
    ///
    /// On success the previous source and result are dropped and the state
    /// becomes `Loaded`. On failure an earlier source is kept (its result is
    /// dropped) and the state becomes `Failed`; with no earlier source it
    /// returns to `Empty`.
    ///
    /// Only a newer load or a reset supersedes a load. Settings changed while
    /// the bytes are being ingested are kept, and any run they started on the
    /// previous source is superseded when the new source lands.
    #[instrument(skip(self, bytes), fields(session = %self.id, data_len = bytes.len()))]
    pub async fn load(&self, bytes: Vec<u8>, hint: SourceHint) -> Result<RunOutcome<()>> {
        let generation = {
            let mut inner = self.lock();
            if inner.state == SessionState::Processing {
                // The in-flight run is about to be superseded.
                inner.state = if inner.result.is_some() {
                    SessionState::Processed
                } else {
                    SessionState::Loaded
                };
            }
            self.next_sequence();
            self.next_load()
        };

        let loaded = ingest(bytes, hint, Arc::clone(&self.bridge), &self.config).await;

        let mut inner = self.lock();
        if !self.is_latest_load(generation) {
            debug!(generation, "load superseded");
            return Ok(RunOutcome::Superseded);
        }
        // Runs issued during ingest were against the outgoing source.
        self.next_sequence();

        match loaded {
            Ok(loaded) => {
                let (width, height) = loaded.raster.dimensions();
                inner.source = Some(Arc::new(Source::from(loaded)));
                inner.result = None;
                inner.last_error = None;
                inner.state = SessionState::Loaded;
                info!(width, height, "Source loaded");
                Ok(RunOutcome::Applied(()))
            }
            Err(err) => {
                warn!(error = %err, "Load failed");
                inner.result = None;
                inner.last_error = Some(humanize_error(&err));
                inner.state = if inner.source.is_some() {
                    SessionState::Failed
                } else {
                    SessionState::Empty
                };
                Err(err)
            }
        }
    }

    /// Load a source and immediately filter it with the current settings.
    pub async fn open(
        &self,
        bytes: Vec<u8>,
        hint: SourceHint,
    ) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        match self.load(bytes, hint).await? {
            RunOutcome::Applied(()) => self.process().await,
            RunOutcome::Superseded => Ok(RunOutcome::Superseded),
            RunOutcome::Skipped => Ok(RunOutcome::Skipped),
        }
    }

    // -- Processing -----------------------------------------------------------

    /// Filter the source with the current settings.
    pub async fn process(&self) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        let (source, request, sequence) = {
            let mut inner = self.lock();
            let source = inner.source.clone().ok_or(InkwashError::NoSource)?;
            let sequence = self.next_sequence();
            inner.state = SessionState::Processing;
            (source, inner.settings.request(), sequence)
        };
        self.run(source, request, sequence).await
    }

    /// Adopt `request` as the current filter settings and re-run.
    pub async fn submit(
        &self,
        request: ProcessingRequest,
    ) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        self.update(|settings| settings.apply(request)).await
    }

    pub async fn set_mode(&self, mode: ProcessMode) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        self.update(|settings| settings.mode = mode).await
    }

    pub async fn set_threshold(&self, threshold: u8) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        self.update(|settings| settings.threshold = threshold).await
    }

    pub async fn set_keep_transparency(
        &self,
        keep: bool,
    ) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        self.update(|settings| settings.keep_transparency = keep).await
    }

    /// Choose the download container. PNG keeps transparency, JPEG drops it.
    pub async fn set_export_format(
        &self,
        format: ExportFormat,
    ) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        self.update(|settings| {
            settings.export_format = format;
            settings.keep_transparency = format.supports_alpha();
        })
        .await
    }

    /// Apply `change` to the settings and re-run when the filter output
    /// would differ.
    async fn update(
        &self,
        change: impl FnOnce(&mut Settings),
    ) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        let (source, request, sequence) = {
            let mut inner = self.lock();
            let before = inner.settings.request();
            change(&mut inner.settings);
            let request = inner.settings.request();

            let Some(source) = inner.source.clone() else {
                return Ok(RunOutcome::Skipped);
            };
            let current = matches!(
                inner.state,
                SessionState::Processing | SessionState::Processed
            );
            if current && request == before {
                return Ok(RunOutcome::Skipped);
            }
            let sequence = self.next_sequence();
            inner.state = SessionState::Processing;
            (source, request, sequence)
        };
        self.run(source, request, sequence).await
    }

    #[instrument(skip(self, source), fields(session = %self.id, mode = %request.mode, threshold = request.threshold))]
    async fn run(
        &self,
        source: Arc<Source>,
        request: ProcessingRequest,
        sequence: u64,
    ) -> Result<RunOutcome<Arc<ProcessingResult>>> {
        debug!(sequence, "filter run started");
        let output = tokio::task::spawn_blocking(move || {
            let raster = apply_filter(&source.raster, &request);
            let preview_uri = data_uri(&raster)?;
            Ok::<_, InkwashError>((raster, preview_uri))
        })
        .await
        .map_err(|e| InkwashError::Filter(format!("filter worker failed: {e}")))
        .and_then(|output| output);

        let mut inner = self.lock();
        if !self.is_latest(sequence) {
            debug!(sequence, "stale result discarded");
            return Ok(RunOutcome::Superseded);
        }

        match output {
            Ok((raster, preview_uri)) => {
                let result = Arc::new(ProcessingResult {
                    sequence,
                    request,
                    raster,
                    preview_uri,
                    completed_at: Utc::now(),
                });
                inner.result = Some(Arc::clone(&result));
                inner.last_error = None;
                inner.state = SessionState::Processed;
                info!(sequence, "Result published");
                Ok(RunOutcome::Applied(result))
            }
            Err(err) => {
                warn!(sequence, error = %err, "Filter run failed");
                inner.result = None;
                inner.last_error = Some(humanize_error(&err));
                inner.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    /// Drop the source and result. Settings are kept. Any in-flight work
    /// is superseded.
    pub fn reset(&self) {
        let mut inner = self.lock();
        self.next_sequence();
        self.next_load();
        let settings = inner.settings;
        *inner = Inner {
            settings,
            ..Inner::default()
        };
        info!(session = %self.id, "Session reset");
    }

    // -- Export ---------------------------------------------------------------

    /// Encode the newest result per `spec`. `Ok(None)` when there is nothing
    /// to export.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn export(&self, spec: &ExportSpec) -> Result<Option<ExportedImage>> {
        let Some(result) = self.result() else {
            debug!("no result to export");
            return Ok(None);
        };

        let file_name = export_file_name(&spec.base_name, result.request.mode, spec.format);
        let encode_spec = spec.clone();
        let bytes = tokio::task::spawn_blocking(move || encode(&result.raster, &encode_spec))
            .await
            .map_err(|e| InkwashError::Encode(format!("encode worker failed: {e}")))??;

        info!(file_name = %file_name, bytes = bytes.len(), "Image exported");
        Ok(Some(ExportedImage {
            file_name,
            mime_type: spec.format.mime_type(),
            bytes,
        }))
    }

    /// Export and hand the file to the platform bridge. Returns where it was
    /// saved, or `Ok(None)` when there is nothing to export.
    pub async fn save(&self, spec: &ExportSpec) -> Result<Option<String>> {
        let Some(image) = self.export(spec).await? else {
            return Ok(None);
        };
        let bridge = Arc::clone(&self.bridge);
        let location = tokio::task::spawn_blocking(move || {
            bridge.save_file(&image.file_name, &image.bytes, image.mime_type)
        })
        .await
        .map_err(|e| InkwashError::Bridge(format!("save worker failed: {e}")))??;
        Ok(Some(location))
    }
}
