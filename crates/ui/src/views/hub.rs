use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::catalog::{MODES, ModeInfo};

use crate::routes::Route;

#[component]
pub fn HubView() -> Element {
    rsx! {
        div { class: "page hub",
            h2 { "Choose a quiz" }
            div { class: "mode-grid",
                for info in MODES {
                    ModeCard { key: "{info.mode}", info }
                }
            }
        }
    }
}

#[component]
fn ModeCard(info: ModeInfo) -> Element {
    rsx! {
        Link { class: "mode-card mode-{info.mode}", to: Route::Quiz { mode: info.mode },
            span { class: "mode-badge", "{info.badge}" }
            h3 { "{info.title}" }
            p { "{info.description}" }
            span { class: "mode-cta", "Play now" }
        }
    }
}
