// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inkwash Session: the processing orchestrator. Owns the pristine source
// raster and the current settings, re-runs the filter whenever either changes,
// and keeps only the newest result visible.

pub mod ingest;
pub mod session;
pub mod state;

pub use ingest::{LoadedSource, check_input_size, ingest};
pub use session::{EditorSession, ExportedImage, ProcessingResult, RunOutcome};
pub use state::{SessionState, Settings};
