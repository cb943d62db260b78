use std::sync::Arc;

use quiz_core::model::QuizMode;

use crate::api::{AuthService, AuthToken, BackendClient, QuizApi};
use crate::config::ClientConfig;
use crate::error::AppServicesError;
use crate::notify::Notifier;
use crate::playback::{AudioOutput, PlaybackCoordinator};
use crate::quiz::QuizSessionController;
use crate::tasks::TaskScheduler;

/// Assembles app-facing services around one backend and one audio output.
#[derive(Clone)]
pub struct AppServices {
    config: ClientConfig,
    scheduler: TaskScheduler,
    backend: Arc<BackendClient>,
    auth: Arc<AuthService>,
    playback: PlaybackCoordinator,
}

impl AppServices {
    /// Build services for `config`, playing previews through `output`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if an HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        output: Arc<dyn AudioOutput>,
        scheduler: TaskScheduler,
    ) -> Result<Self, AppServicesError> {
        let token = AuthToken::new(config.token.clone());
        let backend = Arc::new(BackendClient::new(&config, token.clone())?);
        let auth = Arc::new(AuthService::new(&config, token)?);
        let playback = PlaybackCoordinator::new(output, scheduler.clone());
        log::debug!("services ready for {}", config.api_base());

        Ok(Self {
            config,
            scheduler,
            backend,
            auth,
            playback,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> Arc<BackendClient> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackCoordinator {
        self.playback.clone()
    }

    #[must_use]
    pub fn scheduler(&self) -> TaskScheduler {
        self.scheduler.clone()
    }

    /// A fresh controller for one quiz page, sharing the app's player.
    #[must_use]
    pub fn quiz_controller(
        &self,
        mode: QuizMode,
        notifier: Arc<dyn Notifier>,
    ) -> QuizSessionController {
        let api: Arc<dyn QuizApi> = self.backend.clone();
        QuizSessionController::new(
            mode,
            api,
            self.playback.clone(),
            notifier,
            self.scheduler.clone(),
        )
    }
}
