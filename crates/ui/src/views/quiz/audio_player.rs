use dioxus::prelude::*;
use quiz_core::model::{PlaybackState, Track};

use crate::vm::format_playhead;

/// Inline preview player attached to a question bubble.
///
/// Stateless: the shared playback state comes in as a prop and every control
/// is forwarded to the coordinator by the parent.
#[component]
pub fn AudioPlayer(
    track: Track,
    state: PlaybackState,
    on_play: EventHandler<Track>,
    on_pause: EventHandler<()>,
    on_replay: EventHandler<()>,
) -> Element {
    if !track.has_preview() {
        return rsx! {
            div { class: "player player-missing",
                TrackLabel { track: track.clone() }
                p { class: "player-note", "No preview available for this track." }
                if let Some(url) = track.spotify_url.clone() {
                    a { class: "spotify-link", href: "{url}", target: "_blank", "Listen on Spotify" }
                }
            }
        };
    }

    let is_current = state.is_current(&track);
    let is_playing = state.is_playing_track(&track);
    let (progress, duration, ratio) = if is_current {
        (state.progress_secs, state.duration_secs, state.progress_ratio())
    } else {
        (0.0, 0.0, 0.0)
    };
    let width = format!("{:.1}%", ratio * 100.0);

    rsx! {
        div { class: if is_playing { "player player-active" } else { "player" },
            TrackLabel { track: track.clone() }
            div { class: "player-controls",
                button {
                    class: "player-toggle",
                    onclick: {
                        let track = track.clone();
                        move |_| {
                            if is_playing {
                                on_pause.call(());
                            } else {
                                on_play.call(track.clone());
                            }
                        }
                    },
                    if is_playing { "Pause" } else { "Play" }
                }
                if is_current {
                    button {
                        class: "player-replay",
                        onclick: move |_| on_replay.call(()),
                        "Replay"
                    }
                }
                div { class: "player-bar",
                    div { class: "player-bar-fill", style: "width: {width}" }
                }
                span { class: "player-time",
                    "{format_playhead(progress)} / {format_playhead(duration)}"
                }
            }
        }
    }
}

#[component]
fn TrackLabel(track: Track) -> Element {
    rsx! {
        div { class: "player-track",
            if let Some(art) = track.album_art.clone() {
                img { class: "album-art", src: "{art}", alt: "Album art" }
            }
            span { class: "track-name", "{track.name}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(app: fn() -> Element) -> String {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn missing_preview_links_to_spotify() {
        fn app() -> Element {
            let mut track = Track::new("Silent Track");
            track.spotify_url = Some("https://open.spotify.com/track/1".into());
            rsx! {
                AudioPlayer {
                    track,
                    state: PlaybackState::default(),
                    on_play: |_| {},
                    on_pause: |_| {},
                    on_replay: |_| {},
                }
            }
        }

        let html = render(app);
        assert!(html.contains("No preview available"), "{html}");
        assert!(html.contains("Listen on Spotify"), "{html}");
        assert!(!html.contains("player-toggle"), "{html}");
    }

    #[test]
    fn current_track_shows_pause_and_progress() {
        fn app() -> Element {
            let track = Track::new("Blue Train").with_preview("https://p/1.mp3");
            let state = PlaybackState {
                current_track: Some(track.clone()),
                is_playing: true,
                progress_secs: 15.0,
                duration_secs: 30.0,
            };
            rsx! {
                AudioPlayer {
                    track,
                    state,
                    on_play: |_| {},
                    on_pause: |_| {},
                    on_replay: |_| {},
                }
            }
        }

        let html = render(app);
        assert!(html.contains("Pause"), "{html}");
        assert!(html.contains("Replay"), "{html}");
        assert!(html.contains("width: 50.0%"), "{html}");
    }

    #[test]
    fn other_track_stays_idle() {
        fn app() -> Element {
            let playing = Track::new("Other").with_preview("https://p/2.mp3");
            let state = PlaybackState {
                current_track: Some(playing),
                is_playing: true,
                progress_secs: 12.0,
                duration_secs: 30.0,
            };
            rsx! {
                AudioPlayer {
                    track: Track::new("Blue Train").with_preview("https://p/1.mp3"),
                    state,
                    on_play: |_| {},
                    on_pause: |_| {},
                    on_replay: |_| {},
                }
            }
        }

        let html = render(app);
        assert!(html.contains("Play"), "{html}");
        assert!(!html.contains("Pause"), "{html}");
        assert!(!html.contains("Replay"), "{html}");
    }
}
