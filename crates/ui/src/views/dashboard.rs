use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{DashboardVm, GenreRowVm, HistoryPointVm, RecentSessionVm, map_dashboard};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let stats = ctx.stats_api();

    let mut resource = use_resource(move || {
        let stats = stats.clone();
        async move {
            let user_stats = stats.user_stats().await.map_err(|err| {
                log::warn!("could not load stats: {err}");
                ViewError::from(&err)
            })?;
            Ok(map_dashboard(&user_stats))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page dashboard",
            h2 { "Your Dashboard" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(vm) => rsx! {
                    DashboardBody { vm }
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
fn DashboardBody(vm: DashboardVm) -> Element {
    if !vm.has_played() {
        return rsx! {
            div { class: "empty-state",
                p { "No games yet. Play a round to see your stats here." }
                Link { class: "btn btn-primary", to: Route::Hub {}, "Start Playing" }
            }
        };
    }

    rsx! {
        div { class: "stat-grid",
            StatCard { label: "Total Score", value: vm.total_score.to_string() }
            StatCard { label: "Games Played", value: vm.total_games.to_string() }
            StatCard { label: "Accuracy", value: vm.accuracy_label.clone(), detail: vm.correct_label.clone() }
            StatCard { label: "Current Streak", value: vm.streak.to_string(), detail: format!("Best: {}", vm.best_streak) }
            StatCard { label: "Best Genre", value: vm.best_genre.clone() }
            StatCard { label: "Needs Work", value: vm.worst_genre.clone() }
            StatCard { label: "Difficulty", value: vm.difficulty.to_string() }
        }
        if !vm.genres.is_empty() {
            section { class: "panel",
                h3 { "Accuracy by Genre" }
                for row in vm.genres.clone() {
                    GenreBar { key: "{row.genre}", row }
                }
            }
        }
        if !vm.history.is_empty() {
            section { class: "panel",
                h3 { "Score History" }
                div { class: "history-chart",
                    for point in vm.history.clone() {
                        HistoryBar { key: "{point.game_label}", point }
                    }
                }
            }
        }
        if !vm.recent.is_empty() {
            section { class: "panel",
                h3 { "Recent Games" }
                ul { class: "recent-list",
                    for (index, session) in vm.recent.clone().into_iter().enumerate() {
                        RecentRow { key: "{index}", session }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: String, detail: Option<String>) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-label", "{label}" }
            span { class: "stat-value", "{value}" }
            if let Some(detail) = detail {
                span { class: "stat-detail", "{detail}" }
            }
        }
    }
}

#[component]
fn GenreBar(row: GenreRowVm) -> Element {
    let width = row.percent_label.clone();
    rsx! {
        div { class: "genre-row",
            span { class: "genre-name", "{row.genre}" }
            div { class: "genre-bar",
                div { class: "genre-bar-fill tier-{row.tier}", style: "width: {width}" }
            }
            span { class: "genre-percent", "{row.percent_label} ({row.correct}/{row.total})" }
        }
    }
}

#[component]
fn HistoryBar(point: HistoryPointVm) -> Element {
    rsx! {
        div { class: "history-bar", title: "{point.date_label}",
            div { class: "history-bar-fill", style: "height: {point.bar_percent}%" }
            span { class: "history-score", "{point.score}" }
            span { class: "history-label", "{point.game_label}" }
        }
    }
}

#[component]
fn RecentRow(session: RecentSessionVm) -> Element {
    rsx! {
        li { class: "recent-row",
            span { class: "recent-mode", "{session.mode_label}" }
            span { class: "recent-score", "{session.score} pts" }
            span { class: "recent-questions", "{session.total_questions} questions" }
            span { class: "recent-date", "{session.date_label}" }
        }
    }
}
