use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LandingView() -> Element {
    let ctx = use_context::<AppContext>();
    let signed_in = ctx.is_signed_in();

    rsx! {
        div { class: "page landing",
            section { class: "hero",
                h1 { "How well do you know your music?" }
                p { class: "lede",
                    "Listen to short previews, guess the genre or the artist, and climb the leaderboard."
                }
                div { class: "hero-actions",
                    Link { class: "btn btn-primary", to: Route::Hub {}, "Start Playing" }
                    Link { class: "btn", to: Route::Leaderboard {}, "View Leaderboard" }
                }
                if signed_in {
                    p { class: "session-status", "Signed in with Spotify." }
                } else {
                    p { class: "session-status",
                        "Playing as a guest. Run the `login` command to connect Spotify and keep your stats."
                    }
                }
            }
            section { class: "features",
                Feature { title: "Four ways to play", body: "Genre, artist, mood and a sixty second speed round." }
                Feature { title: "Hints when you are stuck", body: "Every question comes with one hint." }
                Feature { title: "Track your progress", body: "Accuracy by genre, streaks and score history." }
            }
        }
    }
}

#[component]
fn Feature(title: &'static str, body: &'static str) -> Element {
    rsx! {
        div { class: "feature",
            h3 { "{title}" }
            p { "{body}" }
        }
    }
}
