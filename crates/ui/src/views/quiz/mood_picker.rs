use dioxus::prelude::*;
use quiz_core::catalog::MOODS;
use quiz_core::model::Mood;

#[component]
pub fn MoodPicker(on_select: EventHandler<Mood>) -> Element {
    rsx! {
        div { class: "mood-picker",
            h2 { "How are you feeling?" }
            p { "Pick a mood and we will find tracks that match it." }
            div { class: "mood-grid",
                for info in MOODS {
                    button {
                        key: "{info.mood}",
                        class: "mood-card mood-{info.mood}",
                        onclick: move |_| on_select.call(info.mood),
                        span { class: "mood-label", "{info.label}" }
                        span { class: "mood-description", "{info.description}" }
                    }
                }
            }
        }
    }
}
