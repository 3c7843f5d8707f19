// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page: persistent app configuration.

use dioxus::prelude::*;

use inkwash_core::{ExportFormat, ProcessMode};

use crate::services::app_services::AppServices;
use crate::state::AppState;

const MIB: u64 = 1024 * 1024;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let config = state.read().config.clone();
    let quality_percent = (config.jpeg_quality * 100.0).round() as u32;
    let max_mb = config.max_input_bytes / MIB;
    let version = env!("CARGO_PKG_VERSION");

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "New images" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Start in" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: config.default_mode.slug(),
                        onchange: move |evt| {
                            if let Some(mode) = ProcessMode::from_slug(&evt.value()) {
                                state.write().config.default_mode = mode;
                            }
                        },
                        for mode in ProcessMode::ALL {
                            option { value: mode.slug(), "{mode.label()}" }
                        }
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Coloring page line detail" }
                    input {
                        r#type: "number",
                        min: "0",
                        max: "255",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.default_threshold}",
                        onchange: move |evt| {
                            if let Ok(threshold) = evt.value().parse::<u8>() {
                                state.write().config.default_threshold = threshold;
                            }
                        },
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Downloads" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Default format" }
                    select {
                        style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: config.default_export_format.extension(),
                        onchange: move |evt| {
                            let format = match evt.value().as_str() {
                                "png" => ExportFormat::Png,
                                _ => ExportFormat::Jpeg,
                            };
                            state.write().config.default_export_format = format;
                        },
                        option { value: "png", "PNG" }
                        option { value: "jpg", "JPEG" }
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "JPEG quality ({quality_percent}%)" }
                    input {
                        r#type: "range",
                        min: "1",
                        max: "100",
                        value: "{quality_percent}",
                        onchange: move |evt| {
                            if let Ok(percent) = evt.value().parse::<u32>() {
                                state.write().config.jpeg_quality = percent.clamp(1, 100) as f32 / 100.0;
                            }
                        },
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Opening files" }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Largest file (MB)" }
                    input {
                        r#type: "number",
                        min: "1",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{max_mb}",
                        onchange: move |evt| {
                            if let Ok(mb) = evt.value().parse::<u64>()
                                && mb > 0
                            {
                                state.write().config.max_input_bytes = mb * MIB;
                            }
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "HEIC conversion timeout (s)" }
                    input {
                        r#type: "number",
                        min: "1",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.heic_timeout_secs}",
                        onchange: move |evt| {
                            if let Ok(secs) = evt.value().parse::<u64>()
                                && secs > 0
                            {
                                state.write().config.heic_timeout_secs = secs;
                            }
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "HEIC converter" }
                    input {
                        r#type: "text",
                        style: "width: 160px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                        value: "{config.heif_convert_command}",
                        onchange: move |evt| {
                            state.write().config.heif_convert_command = evt.value();
                        },
                    }
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                state.write().config = svc.config();
                                save_msg.set(Some("Settings saved. They apply the next time Inkwash starts.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Inkwash v{version}"
                    br {}
                    "Grayscale, coloring pages and negatives, made on your device."
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}
