use dioxus::prelude::*;
use quiz_core::model::{PlaybackState, Track};

use crate::views::quiz::AudioPlayer;
use crate::vm::{BotMessageVm, MessageVm, QuizVm};

/// Conversation log plus the answer controls for the open question.
#[component]
pub fn Transcript(
    vm: QuizVm,
    player: PlaybackState,
    on_answer: EventHandler<String>,
    on_hint: EventHandler<()>,
    on_play: EventHandler<Track>,
    on_pause: EventHandler<()>,
    on_replay: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "transcript",
            for (index, message) in vm.messages.iter().cloned().enumerate() {
                match message {
                    MessageVm::Bot(bot) => rsx! {
                        BotBubble {
                            key: "{index}",
                            bot,
                            player: player.clone(),
                            on_play,
                            on_pause,
                            on_replay,
                        }
                    },
                    MessageVm::User { content } => rsx! {
                        div { key: "{index}", class: "bubble bubble-user", "{content}" }
                    },
                }
            }
            if let Some(answer) = vm.pending_answer.clone() {
                div { class: "bubble bubble-user bubble-pending", "{answer}" }
                div { class: "bubble bubble-typing", "Checking your answer..." }
            }
            if !vm.options.is_empty() {
                div { class: "options",
                    for option in vm.options.clone() {
                        button {
                            key: "{option}",
                            class: "option",
                            onclick: {
                                let option = option.clone();
                                move |_| on_answer.call(option.clone())
                            },
                            "{option}"
                        }
                    }
                }
                if vm.can_hint {
                    button { class: "hint-button", onclick: move |_| on_hint.call(()), "Need a hint?" }
                }
            }
        }
    }
}

#[component]
fn BotBubble(
    bot: BotMessageVm,
    player: PlaybackState,
    on_play: EventHandler<Track>,
    on_pause: EventHandler<()>,
    on_replay: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: bot.bubble_class(),
            if let Some(badge) = bot.badge {
                span { class: badge.class(), "{badge.label()}" }
            }
            if let Some(points) = bot.points_label.clone() {
                span { class: "points", "{points}" }
            }
            p { class: "bubble-text", "{bot.content}" }
            if let Some(answer) = bot.correct_answer.clone() {
                p { class: "correct-answer", "Correct answer: {answer}" }
            }
            if let Some(fact) = bot.fun_fact.clone() {
                p { class: "fun-fact", "{fact}" }
            }
            if let Some(info) = bot.track_info.clone() {
                div { class: "track-info",
                    if let Some(art) = info.album_art.clone() {
                        img { class: "album-art", src: "{art}", alt: "Album art" }
                    }
                    div {
                        p { class: "track-name", "{info.name}" }
                        p { class: "track-artist", "{info.artist}" }
                        if let Some(genre) = info.genre.clone() {
                            p { class: "track-genre", "{genre}" }
                        }
                        if let Some(url) = info.spotify_url.clone() {
                            a { class: "spotify-link", href: "{url}", target: "_blank", "Open in Spotify" }
                        }
                    }
                }
            }
            if let Some(track) = bot.track.clone() {
                AudioPlayer { track, state: player, on_play, on_pause, on_replay }
            }
        }
    }
}
