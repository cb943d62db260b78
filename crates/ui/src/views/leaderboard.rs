use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LeaderboardRowVm, map_leaderboard};

#[component]
pub fn LeaderboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let stats = ctx.stats_api();

    let mut resource = use_resource(move || {
        let stats = stats.clone();
        async move {
            let entries = stats.leaderboard().await.map_err(|err| {
                log::warn!("could not load leaderboard: {err}");
                ViewError::from(&err)
            })?;
            Ok(map_leaderboard(&entries))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page leaderboard",
            h2 { "Leaderboard" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No scores yet. Be the first to play!" }
                    } else {
                        table { class: "leaderboard-table",
                            thead {
                                tr {
                                    th { "Rank" }
                                    th { "Player" }
                                    th { "Score" }
                                    th { "Games" }
                                    th { "Accuracy" }
                                    th { "Best Streak" }
                                }
                            }
                            tbody {
                                for row in rows {
                                    LeaderboardRow { key: "{row.rank}-{row.name}", row }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "view-error",
                        p { "{err.message()}" }
                        button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                    }
                },
            }
        }
    }
}

#[component]
fn LeaderboardRow(row: LeaderboardRowVm) -> Element {
    let class = if row.is_podium {
        format!("podium rank-{}", row.rank)
    } else {
        String::new()
    };
    rsx! {
        tr { class: "{class}",
            td { class: "rank", "#{row.rank}" }
            td { class: "player",
                if let Some(avatar) = row.avatar.clone() {
                    img { class: "avatar", src: "{avatar}", alt: "" }
                }
                span { "{row.name}" }
            }
            td { "{row.total_score}" }
            td { "{row.total_games}" }
            td { "{row.accuracy_label}" }
            td { "{row.best_streak}" }
        }
    }
}
