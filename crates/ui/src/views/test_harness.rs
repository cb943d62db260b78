use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{
    LeaderboardEntry, Question, QuizMode, QuizSession, SessionId, Track, UserStats,
};
use services::{
    AnswerRequest, AnswerResult, MemoryOutput, PlaybackCoordinator, QuizApi, QuizApiError,
    StartQuizRequest, StatsApi, StatusCode, TaskScheduler,
};

use crate::context::{UiApp, build_app_context};
use crate::views::{DashboardView, HubView, LandingView, LeaderboardView, QuizView};

/// Backend stand-in with canned responses for every endpoint.
#[derive(Default)]
pub struct StubBackend {
    pub stats: Mutex<Option<UserStats>>,
    pub leaderboard: Mutex<Vec<LeaderboardEntry>>,
    pub starts: Mutex<Vec<StartQuizRequest>>,
}

impl StubBackend {
    pub fn with_stats(stats: UserStats) -> Self {
        let backend = Self::default();
        *backend.stats.lock().unwrap() = Some(stats);
        backend
    }

    pub fn with_leaderboard(entries: Vec<LeaderboardEntry>) -> Self {
        let backend = Self::default();
        *backend.leaderboard.lock().unwrap() = entries;
        backend
    }

    pub fn start_requests(&self) -> Vec<StartQuizRequest> {
        self.starts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizApi for StubBackend {
    async fn start_quiz(&self, request: StartQuizRequest) -> Result<QuizSession, QuizApiError> {
        let mode = request.mode;
        self.starts.lock().unwrap().push(request);
        let question = Question::new(
            "Which genre is this track?",
            vec!["Rock".into(), "Jazz".into(), "Pop".into(), "Funk".into()],
        )
        .with_track(Track::new("Blue Train").with_preview("https://p/blue-train.mp3"));
        Ok(QuizSession::new(SessionId::new("sess-ui").unwrap(), mode, vec![question], 1).unwrap())
    }

    async fn submit_answer(&self, _request: AnswerRequest) -> Result<AnswerResult, QuizApiError> {
        Err(QuizApiError::Unavailable("not scripted".into()))
    }
}

#[async_trait]
impl StatsApi for StubBackend {
    async fn user_stats(&self) -> Result<UserStats, QuizApiError> {
        self.stats
            .lock()
            .unwrap()
            .clone()
            .ok_or(QuizApiError::HttpStatus(StatusCode::UNAUTHORIZED))
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, QuizApiError> {
        Ok(self.leaderboard.lock().unwrap().clone())
    }
}

struct TestApp {
    backend: Arc<StubBackend>,
    playback: PlaybackCoordinator,
    scheduler: TaskScheduler,
}

impl UiApp for TestApp {
    fn playback(&self) -> PlaybackCoordinator {
        self.playback.clone()
    }

    fn quiz_api(&self) -> Arc<dyn QuizApi> {
        self.backend.clone()
    }

    fn stats_api(&self) -> Arc<dyn StatsApi> {
        self.backend.clone()
    }

    fn scheduler(&self) -> TaskScheduler {
        self.scheduler.clone()
    }

    fn is_signed_in(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Hub,
    Quiz(QuizMode),
    Dashboard,
    Leaderboard,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Hub => rsx! { HubView {} },
        ViewKind::Quiz(mode) => rsx! { QuizView { mode } },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Leaderboard => rsx! { LeaderboardView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: Arc<StubBackend>,
    pub output: Arc<MemoryOutput>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: StubBackend) -> ViewHarness {
    let backend = Arc::new(backend);
    let output = Arc::new(MemoryOutput::new());
    let scheduler = TaskScheduler::current();
    let playback = PlaybackCoordinator::new(output.clone(), scheduler.clone());
    let app = Arc::new(TestApp {
        backend: Arc::clone(&backend),
        playback,
        scheduler,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        backend,
        output,
    }
}

/// The full window root with its router, for app-level checks.
pub struct AppHarness {
    pub dom: VirtualDom,
    pub playback: PlaybackCoordinator,
    pub output: Arc<MemoryOutput>,
}

pub fn setup_app_harness() -> AppHarness {
    let output = Arc::new(MemoryOutput::new());
    let scheduler = TaskScheduler::current();
    let playback = PlaybackCoordinator::new(output.clone(), scheduler.clone());
    let app: Arc<dyn UiApp> = Arc::new(TestApp {
        backend: Arc::new(StubBackend::default()),
        playback: playback.clone(),
        scheduler,
    });
    let dom = VirtualDom::new(crate::App).with_root_context(build_app_context(&app));
    AppHarness {
        dom,
        playback,
        output,
    }
}
