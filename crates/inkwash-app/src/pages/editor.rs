// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor page: open an image, pick a filter, compare before/after, download.

use std::future::Future;
use std::sync::Arc;

use dioxus::prelude::*;

use inkwash_core::error::Result;
use inkwash_core::human_errors::humanize_error;
use inkwash_core::{ExportFormat, ProcessMode};
use inkwash_session::{ProcessingResult, RunOutcome, SessionState};

use crate::services::app_services::AppServices;
use crate::state::AppState;

const OPEN_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "heic", "heif"];

#[component]
pub fn Editor(mode: ProcessMode) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    // Entering a page preselects its mode.
    let svc_mode = svc.clone();
    use_hook(move || {
        run_session_op(svc_mode, state, move |svc| async move {
            svc.session().set_mode(mode).await
        });
    });

    let snapshot = state.read().clone();
    let settings = snapshot.settings;
    let has_result = snapshot.result_preview.is_some();

    rsx! {
        div {
            h1 { "{settings.mode.label()}" }

            // Open file
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                disabled: snapshot.loading,
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &OPEN_EXTENSIONS)
                            .pick_file()
                        else {
                            return;
                        };
                        tracing::info!(file = %path.display(), "image chosen");
                        {
                            let mut s = state.write();
                            s.loading = true;
                            s.status_message = None;
                        }
                        let svc = svc.clone();
                        spawn(async move {
                            let outcome = svc.open_path(path).await;
                            state.write().loading = false;
                            settle(state, &svc, outcome);
                        });
                    }
                },
                if snapshot.loading { "Opening..." } else if snapshot.source_preview.is_some() { "Choose another image" } else { "Open image" }
            }

            // Mode selector
            div { style: "display: flex; gap: 8px; margin: 12px 0;",
                for choice in ProcessMode::ALL {
                    {
                        let svc = svc.clone();
                        let selected = choice == settings.mode;
                        let (bg, fg) = if selected { ("#007aff", "white") } else { ("white", "#333") };
                        rsx! {
                            button {
                                style: "flex: 1; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: {bg}; color: {fg}; font-size: 14px;",
                                onclick: move |_| {
                                    run_session_op(svc.clone(), state, move |svc| async move {
                                        svc.session().set_mode(choice).await
                                    });
                                },
                                "{choice.label()}"
                            }
                        }
                    }
                }
            }

            // Threshold (line art only)
            if settings.mode == ProcessMode::LineArt {
                div { style: "display: flex; align-items: center; gap: 12px; padding: 8px 0;",
                    span { "Line detail" }
                    input {
                        r#type: "range",
                        min: "0",
                        max: "255",
                        style: "flex: 1;",
                        value: "{settings.threshold}",
                        oninput: {
                            let svc = svc.clone();
                            move |evt: FormEvent| {
                                if let Ok(threshold) = evt.value().parse::<u8>() {
                                    run_session_op(svc.clone(), state, move |svc| async move {
                                        svc.session().set_threshold(threshold).await
                                    });
                                }
                            }
                        },
                    }
                    span { style: "width: 32px; text-align: right; color: #666;", "{settings.threshold}" }
                }
                p { style: "color: #888; font-size: 13px; margin: 0;",
                    "Lower values draw more lines."
                }
            }

            // Transparency (grayscale only)
            if settings.mode == ProcessMode::Grayscale {
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Keep transparency" }
                    input {
                        r#type: "checkbox",
                        checked: settings.keep_transparency,
                        onchange: {
                            let svc = svc.clone();
                            move |evt: FormEvent| {
                                let keep = evt.checked();
                                run_session_op(svc.clone(), state, move |svc| async move {
                                    svc.session().set_keep_transparency(keep).await
                                });
                            }
                        },
                    }
                }
            }

            // Download format
            div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                span { "Download as" }
                select {
                    style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                    value: format_label(settings.export_format),
                    onchange: {
                        let svc = svc.clone();
                        move |evt: FormEvent| {
                            if let Some(format) = format_from_label(&evt.value()) {
                                run_session_op(svc.clone(), state, move |svc| async move {
                                    svc.session().set_export_format(format).await
                                });
                            }
                        }
                    },
                    option { value: "PNG", "PNG (keeps transparency)" }
                    option { value: "JPEG", "JPEG (smaller, white background)" }
                }
            }

            // Before / after
            if let Some(ref before) = snapshot.source_preview {
                div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 8px; margin: 16px 0;",
                    Preview { title: "Original", src: before.clone() }
                    if let Some(ref after) = snapshot.result_preview {
                        Preview { title: "Result", src: after.clone() }
                    } else {
                        div { style: "display: flex; align-items: center; justify-content: center; border: 1px dashed #ccc; border-radius: 4px; color: #888;",
                            if snapshot.session_state == SessionState::Failed { "No result" } else { "Processing..." }
                        }
                    }
                }
                if let Some((w, h)) = snapshot.dimensions {
                    p { style: "color: #888; font-size: 13px; text-align: center;", "{w} x {h} px" }
                }
            }

            if snapshot.busy() {
                p { style: "color: #007aff; text-align: center;", "Working..." }
            }

            // Actions
            if has_result {
                div { style: "display: flex; gap: 8px; margin-top: 16px;",
                    button {
                        style: "flex: 2; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white; font-size: 16px;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let svc = svc.clone();
                                spawn(async move {
                                    let saved = svc.download().await;
                                    report_export(state, saved);
                                });
                            }
                        },
                        "Download"
                    }
                    button {
                        style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #34c759; background: white; color: #34c759; font-size: 16px;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let mut dialog = rfd::FileDialog::new().set_directory(svc.download_dir());
                                if let Some(name) = svc.suggested_file_name() {
                                    dialog = dialog.set_file_name(name);
                                }
                                let Some(path) = dialog.save_file() else {
                                    return;
                                };
                                let svc = svc.clone();
                                spawn(async move {
                                    let saved = svc.export_to(&path).await;
                                    report_export(state, saved);
                                });
                            }
                        },
                        "Save as..."
                    }
                }
            }

            if snapshot.source_preview.is_some() {
                button {
                    style: "width: 100%; margin-top: 16px; padding: 8px 16px; border: none; background: none; color: #888; font-size: 14px; text-decoration: underline;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            svc.session().reset();
                            let mut s = state.write();
                            s.refresh(&svc);
                            s.status_message = None;
                        }
                    },
                    "Start over"
                }
            }

            // Errors and status
            if let Some(ref err) = snapshot.error {
                div { style: "margin-top: 12px; padding: 12px; border-radius: 8px; background: #fff3f0; color: #c0392b;",
                    strong { "{err.message}" }
                    p { style: "margin: 4px 0 0; font-size: 14px;", "{err.suggestion}" }
                }
            }
            if let Some(ref msg) = snapshot.status_message {
                p { style: "margin-top: 8px; color: #666; font-size: 14px; text-align: center;",
                    "{msg}"
                }
            }
        }
    }
}

#[component]
fn Preview(title: &'static str, src: String) -> Element {
    rsx! {
        figure { style: "margin: 0;",
            img {
                src: "{src}",
                style: "width: 100%; border: 1px solid #ccc; border-radius: 4px; background: repeating-conic-gradient(#eee 0% 25%, white 0% 50%) 50% / 16px 16px;",
            }
            figcaption { style: "text-align: center; color: #666; font-size: 13px;", "{title}" }
        }
    }
}

/// Run a session call off the event handler and refresh state when it ends.
fn run_session_op<F, Fut>(svc: AppServices, mut state: Signal<AppState>, op: F)
where
    F: FnOnce(AppServices) -> Fut + 'static,
    Fut: Future<Output = Result<RunOutcome<Arc<ProcessingResult>>>> + 'static,
{
    if state.read().source_preview.is_some() {
        state.write().session_state = SessionState::Processing;
    }
    spawn(async move {
        let outcome = op(svc.clone()).await;
        settle(state, &svc, outcome);
    });
}

fn settle<T>(mut state: Signal<AppState>, svc: &AppServices, outcome: Result<RunOutcome<T>>) {
    let mut s = state.write();
    s.refresh(svc);
    match outcome {
        Ok(RunOutcome::Superseded) => tracing::debug!("older run superseded"),
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "session operation failed");
            // Errors raised before the session saw the bytes (e.g. unreadable file).
            if s.error.is_none() {
                let human = humanize_error(&e);
                s.status_message = Some(format!("{} {}", human.message, human.suggestion));
            }
        }
    }
}

fn report_export(mut state: Signal<AppState>, saved: Result<Option<String>>) {
    let message = match saved {
        Ok(Some(location)) => {
            tracing::info!(location = %location, "download complete");
            format!("Saved to {location}")
        }
        Ok(None) => "Nothing to save yet.".into(),
        Err(e) => {
            tracing::error!(error = %e, "download failed");
            let human = humanize_error(&e);
            format!("{} {}", human.message, human.suggestion)
        }
    };
    state.write().status_message = Some(message);
}

fn format_label(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Png => "PNG",
        ExportFormat::Jpeg => "JPEG",
    }
}

fn format_from_label(label: &str) -> Option<ExportFormat> {
    match label {
        "PNG" => Some(ExportFormat::Png),
        "JPEG" => Some(ExportFormat::Jpeg),
        _ => None,
    }
}
