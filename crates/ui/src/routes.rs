use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};
use quiz_core::model::QuizMode;

use crate::context::AppContext;
use crate::views::{DashboardView, HubView, LandingView, LeaderboardView, QuizView};
use crate::vm::ToastExpiry;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", LandingView)] Landing {},
        #[route("/hub", HubView)] Hub {},
        #[route("/quiz/:mode", QuizPage)] Quiz { mode: QuizMode },
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/leaderboard", LeaderboardView)] Leaderboard {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
            ToastHost {}
        }
    }
}

#[component]
fn Navbar() -> Element {
    rsx! {
        nav { class: "navbar",
            Link { class: "brand", to: Route::Landing {}, "Music Quiz" }
            ul {
                li { Link { to: Route::Hub {}, "Play" } }
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::Leaderboard {}, "Leaderboard" } }
            }
        }
    }
}

/// Keyed by mode so switching modes tears down the previous session.
#[component]
fn QuizPage(mode: QuizMode) -> Element {
    rsx! {
        QuizView { key: "{mode}", mode }
    }
}

#[component]
fn ToastHost() -> Element {
    let ctx = use_context::<AppContext>();
    let queue = ctx.toasts();
    let mut toasts = use_signal(|| queue.snapshot());

    use_future({
        let queue = queue.clone();
        move || {
            let queue = queue.clone();
            async move {
                let mut updates = queue.subscribe();
                let mut expiry = ToastExpiry::default();
                loop {
                    let current = updates.borrow_and_update().clone();
                    for id in expiry.newly_shown(&current) {
                        let queue = queue.clone();
                        spawn(async move {
                            tokio::time::sleep(TOAST_TTL).await;
                            queue.dismiss(id);
                        });
                    }
                    toasts.set(current);
                    if updates.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    rsx! {
        div { class: "toasts",
            for toast in toasts() {
                div { key: "{toast.id}", class: toast.class(),
                    span { "{toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: {
                            let queue = queue.clone();
                            move |_| queue.dismiss(toast.id)
                        },
                        "×"
                    }
                }
            }
        }
    }
}
