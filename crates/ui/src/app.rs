use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::AppContext;
use crate::routes::Route;

/// Window root. Previews never outlive it: the shared player is stopped when
/// the root unmounts.
#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    use_drop({
        let playback = ctx.playback();
        move || playback.stop()
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Music Quiz" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: move |errors: ErrorContext| {
                    log::error!("render failed: {errors:?}");
                    ctx.playback().stop();
                    rsx! {
                        div { class: "fatal",
                            h1 { "The quiz hit a snag" }
                            p { "Playback was stopped. Restart the app to keep playing." }
                            pre { "{errors:?}" }
                        }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
