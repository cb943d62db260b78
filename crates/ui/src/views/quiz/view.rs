use dioxus::prelude::*;
use dioxus_router::{Link, navigator};
use quiz_core::model::{Mood, QuizMode, Track};
use services::SessionPhase;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::quiz::{MoodPicker, Transcript};
use crate::vm::{QuizVm, map_quiz_snapshot};

#[component]
pub fn QuizView(mode: QuizMode) -> Element {
    let ctx = use_context::<AppContext>();
    let controller = use_hook(|| ctx.quiz_controller(mode));
    let playback = ctx.playback();

    let mut snapshot = use_signal(|| controller.snapshot());
    let mut player = use_signal(|| playback.snapshot());

    use_future({
        let controller = controller.clone();
        move || {
            let mut updates = controller.subscribe();
            async move {
                loop {
                    snapshot.set(updates.borrow_and_update().clone());
                    if updates.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
    });
    use_future({
        let playback = playback.clone();
        move || {
            let mut updates = playback.subscribe();
            async move {
                loop {
                    player.set(updates.borrow_and_update().clone());
                    if updates.changed().await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    use_hook({
        let controller = controller.clone();
        move || {
            if !mode.needs_mood() {
                spawn(async move {
                    let _ = controller.start_session(None).await;
                });
            }
        }
    });
    use_drop({
        let controller = controller.clone();
        move || controller.leave()
    });

    let vm = map_quiz_snapshot(&snapshot.read());

    let on_mood = {
        let controller = controller.clone();
        move |mood: Mood| {
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.start_session(Some(mood)).await;
            });
        }
    };
    let on_retry = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.start_session(None).await;
            });
        }
    };
    let on_restart = {
        let controller = controller.clone();
        move |_: ()| {
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.restart().await;
            });
        }
    };
    let on_quit = {
        let controller = controller.clone();
        move |_: ()| {
            controller.leave();
            navigator().push(Route::Hub {});
        }
    };
    let on_answer = {
        let controller = controller.clone();
        move |choice: String| {
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.submit_answer(&choice).await;
            });
        }
    };
    let on_hint = {
        let controller = controller.clone();
        move |_: ()| {
            controller.request_hint();
        }
    };
    let on_play = {
        let playback = playback.clone();
        move |track: Track| {
            let playback = playback.clone();
            spawn(async move {
                let _ = playback.play(&track).await;
            });
        }
    };
    let on_pause = {
        let playback = playback.clone();
        move |_: ()| playback.pause()
    };
    let on_replay = {
        let playback = playback.clone();
        move |_: ()| {
            let playback = playback.clone();
            spawn(async move {
                let _ = playback.replay().await;
            });
        }
    };

    rsx! {
        div { class: "page quiz",
            match vm.phase {
                SessionPhase::MoodSelect => rsx! {
                    MoodPicker { on_select: on_mood }
                    Link { class: "btn", to: Route::Hub {}, "Back to Hub" }
                },
                SessionPhase::Loading => rsx! {
                    div { class: "quiz-loading",
                        div { class: "spinner" }
                        p { "Finding the perfect tracks..." }
                    }
                },
                SessionPhase::Error => rsx! {
                    div { class: "quiz-error",
                        p { "Could not load quiz tracks." }
                        button { class: "btn btn-primary", onclick: on_retry, "Try Again" }
                        Link { class: "btn", to: Route::Hub {}, "Back to Hub" }
                    }
                },
                SessionPhase::Complete => rsx! {
                    CompletePanel { vm: vm.clone(), on_restart }
                },
                SessionPhase::Playing => rsx! {
                    QuizHeader { vm: vm.clone(), on_quit }
                    Transcript {
                        vm: vm.clone(),
                        player: player(),
                        on_answer,
                        on_hint,
                        on_play,
                        on_pause,
                        on_replay,
                    }
                },
            }
        }
    }
}

#[component]
fn QuizHeader(vm: QuizVm, on_quit: EventHandler<()>) -> Element {
    let width = format!("{}%", vm.progress_percent);
    rsx! {
        header { class: "quiz-header",
            button { class: "btn btn-quit", onclick: move |_| on_quit.call(()), "Quit" }
            h2 { "{vm.title}" }
            if let Some(mood) = vm.mood_label {
                span { class: "mood-chip", "{mood}" }
            }
            if let Some(countdown) = vm.countdown_label.clone() {
                span { class: if vm.countdown_urgent { "countdown countdown-urgent" } else { "countdown" },
                    "{countdown}"
                }
            }
            span { class: "score", "Score: {vm.score}" }
            span { class: "question-label", "Question {vm.question_label}" }
        }
        div { class: "progress",
            div { class: "progress-fill", style: "width: {width}" }
        }
    }
}

#[component]
fn CompletePanel(vm: QuizVm, on_restart: EventHandler<()>) -> Element {
    rsx! {
        div { class: "complete",
            h2 { "Quiz Complete!" }
            p { class: "final-score", "{vm.score}" }
            p { "points across {vm.answered_questions} answered questions" }
            div { class: "complete-actions",
                button { class: "btn btn-primary", onclick: move |_| on_restart.call(()), "Play Again" }
                Link { class: "btn", to: Route::Hub {}, "Back to Hub" }
                Link { class: "btn", to: Route::Dashboard {}, "View Dashboard" }
            }
        }
    }
}
