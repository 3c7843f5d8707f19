// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state: reactive signals for the Dioxus UI.
//
// The editing session is the source of truth; this is a snapshot of it that
// pages refresh after every session call so Dioxus can re-render.

use inkwash_core::AppConfig;
use inkwash_core::human_errors::HumanError;
use inkwash_session::{SessionState, Settings};

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application settings (edited on the settings page).
    pub config: AppConfig,
    /// Lifecycle state of the editing session.
    pub session_state: SessionState,
    /// Current mode, threshold, and export choices.
    pub settings: Settings,
    /// `data:` URI of the untouched source, for the "before" pane.
    pub source_preview: Option<String>,
    /// `data:` URI of the newest result, for the "after" pane.
    pub result_preview: Option<String>,
    /// Source size in pixels.
    pub dimensions: Option<(u32, u32)>,
    /// True while a file is being read and decoded.
    pub loading: bool,
    /// Most recent failure, phrased for the user.
    pub error: Option<HumanError>,
    /// Status message for user feedback.
    pub status_message: Option<String>,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        let mut state = Self {
            config: svc.config(),
            session_state: SessionState::Empty,
            settings: svc.session().settings(),
            source_preview: None,
            result_preview: None,
            dimensions: None,
            loading: false,
            error: None,
            status_message: None,
        };
        state.refresh(svc);
        state
    }

    /// Pull the latest session snapshot.
    pub fn refresh(&mut self, svc: &AppServices) {
        let session = svc.session();
        self.session_state = session.state();
        self.settings = session.settings();
        self.source_preview = session.source_preview();
        self.result_preview = session.result().map(|r| r.preview_uri.clone());
        self.dimensions = session.source_dimensions();
        self.error = session.last_error();
    }

    pub fn busy(&self) -> bool {
        self.loading || self.session_state == SessionState::Processing
    }
}
