use quiz_core::model::{GenreAccuracy, LeaderboardEntry, QuizMode, Track, UserStats};
use services::AudioOutput;

use super::test_harness::{StubBackend, ViewKind, drive_dom, setup_app_harness, setup_view_harness};

fn played_stats() -> UserStats {
    let mut stats = UserStats {
        total_games: 3,
        total_score: 1500,
        total_correct: 20,
        total_questions: 30,
        accuracy: 66.7,
        best_genre: Some("jazz".into()),
        worst_genre: Some("metal".into()),
        streak: 1,
        best_streak: 4,
        ..UserStats::default()
    };
    stats
        .genre_accuracy
        .insert("jazz".into(), GenreAccuracy { correct: 8, total: 10 });
    stats
}

#[tokio::test(flavor = "current_thread")]
async fn landing_view_offers_guest_play() {
    let mut harness = setup_view_harness(ViewKind::Landing, StubBackend::default());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start Playing"), "missing cta in {html}");
    assert!(html.contains("Playing as a guest"), "missing guest note in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn hub_view_lists_every_mode() {
    let mut harness = setup_view_harness(ViewKind::Hub, StubBackend::default());
    harness.rebuild();
    let html = harness.render();
    for title in ["Genre Guess", "Artist Guess", "Mood Quiz", "Timed Challenge"] {
        assert!(html.contains(title), "missing {title} in {html}");
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_renders_stats() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, StubBackend::with_stats(played_stats()));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("66.7%"), "missing accuracy in {html}");
    assert!(html.contains("Jazz"), "missing best genre in {html}");
    assert!(html.contains("Accuracy by Genre"), "missing genre panel in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_asks_guests_to_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, StubBackend::default());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Sign in with Spotify"), "missing sign-in hint in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn leaderboard_view_renders_rows_in_rank_order() {
    let entries = vec![
        LeaderboardEntry {
            rank: 2,
            id: "u2".into(),
            display_name: Some("Robin".into()),
            avatar: None,
            total_score: 900,
            total_games: 5,
            accuracy: 61.0,
            best_streak: 3,
        },
        LeaderboardEntry {
            rank: 1,
            id: "u1".into(),
            display_name: None,
            avatar: None,
            total_score: 1200,
            total_games: 6,
            accuracy: 75.0,
            best_streak: 6,
        },
    ];
    let mut harness = setup_view_harness(ViewKind::Leaderboard, StubBackend::with_leaderboard(entries));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    let anonymous = html.find("Anonymous").expect("anonymous row");
    let robin = html.find("Robin").expect("named row");
    assert!(anonymous < robin, "rows out of order in {html}");
    assert!(html.contains("75.0%"), "missing accuracy in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mood_quiz_starts_with_the_picker() {
    let mut harness = setup_view_harness(ViewKind::Quiz(QuizMode::Mood), StubBackend::default());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("How are you feeling?"), "missing picker in {html}");
    assert!(html.contains("Energetic"), "missing mood in {html}");
    assert!(harness.backend.start_requests().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn genre_quiz_starts_on_mount() {
    let mut harness = setup_view_harness(ViewKind::Quiz(QuizMode::Genre), StubBackend::default());
    harness.rebuild();
    for _ in 0..3 {
        harness.drive_async().await;
    }
    let html = harness.render();

    let requests = harness.backend.start_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].mode, QuizMode::Genre);
    assert!(requests[0].mood.is_none());
    assert!(html.contains("Which genre is this track?"), "missing question in {html}");
    assert!(html.contains("Need a hint?"), "missing hint button in {html}");
    assert!(html.contains("Blue Train"), "missing player in {html}");
    assert!(harness.output.is_paused());
}

#[tokio::test(flavor = "current_thread")]
async fn closing_the_window_silences_previews() {
    let mut harness = setup_app_harness();
    harness.dom.rebuild_in_place();
    drive_dom(&mut harness.dom);
    let html = dioxus_ssr::render(&harness.dom);
    assert!(html.contains("Music Quiz"), "missing navbar in {html}");
    assert!(html.contains("Start Playing"), "missing landing in {html}");

    let track = Track::new("Blue Train").with_preview("https://p/blue-train.mp3");
    harness.playback.play(&track).await.unwrap();
    assert!(harness.playback.snapshot().is_playing);

    drop(harness.dom);

    let state = harness.playback.snapshot();
    assert!(!state.is_playing);
    assert!(state.current_track.is_none());
    assert!(harness.output.is_paused());
}
