// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inkwash: on-device image editor
//
// Entry point. Initialises logging, the editing session, app state, and
// launches the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use inkwash_core::ProcessMode;
use pages::editor::Editor;
use pages::settings::Settings;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Inkwash starting");

    dioxus::launch(app);
}

/// Top-level route enum. Each editor entry point preselects a mode.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Grayscale {},
    #[route("/coloring")]
    Coloring {},
    #[route("/invert")]
    Invert {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| match AppServices::init() {
        Ok(s) => {
            tracing::info!("app services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "data directory unusable, using defaults");
            AppServices::fallback()
        }
    });

    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));

    rsx! {
        Router::<Route> {}
    }
}

#[component]
fn Grayscale() -> Element {
    rsx! { Editor { mode: ProcessMode::Grayscale } }
}

#[component]
fn Coloring() -> Element {
    rsx! { Editor { mode: ProcessMode::LineArt } }
}

#[component]
fn Invert() -> Element {
    rsx! { Editor { mode: ProcessMode::Invert } }
}

/// Persistent tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }

            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; padding: 8px 0; border-top: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Grayscale {}, label: "Grayscale", icon: "G" }
                TabButton { to: Route::Coloring {}, label: "Coloring page", icon: "C" }
                TabButton { to: Route::Invert {}, label: "Negative", icon: "N" }
                TabButton { to: Route::Settings {}, label: "Settings", icon: "S" }
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}
