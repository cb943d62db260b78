use std::sync::Arc;

use quiz_core::model::QuizMode;
use services::{
    Notifier, PlaybackCoordinator, QuizApi, QuizSessionController, StatsApi, TaskScheduler,
};

use crate::vm::ToastQueue;

pub trait UiApp: Send + Sync {
    fn playback(&self) -> PlaybackCoordinator;
    fn quiz_api(&self) -> Arc<dyn QuizApi>;
    fn stats_api(&self) -> Arc<dyn StatsApi>;
    fn scheduler(&self) -> TaskScheduler;
    fn is_signed_in(&self) -> bool;
}

#[derive(Clone)]
pub struct AppContext {
    playback: PlaybackCoordinator,
    quiz_api: Arc<dyn QuizApi>,
    stats_api: Arc<dyn StatsApi>,
    scheduler: TaskScheduler,
    signed_in: bool,
    toasts: ToastQueue,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            playback: app.playback(),
            quiz_api: app.quiz_api(),
            stats_api: app.stats_api(),
            scheduler: app.scheduler(),
            signed_in: app.is_signed_in(),
            toasts: ToastQueue::new(),
        }
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackCoordinator {
        self.playback.clone()
    }

    #[must_use]
    pub fn stats_api(&self) -> Arc<dyn StatsApi> {
        Arc::clone(&self.stats_api)
    }

    #[must_use]
    pub fn toasts(&self) -> ToastQueue {
        self.toasts.clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// A controller for one visit to the quiz page. Failures surface as toasts.
    #[must_use]
    pub fn quiz_controller(&self, mode: QuizMode) -> QuizSessionController {
        let notifier: Arc<dyn Notifier> = Arc::new(self.toasts.clone());
        QuizSessionController::new(
            mode,
            Arc::clone(&self.quiz_api),
            self.playback.clone(),
            notifier,
            self.scheduler.clone(),
        )
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
