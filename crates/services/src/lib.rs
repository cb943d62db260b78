#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod config;
pub mod error;
pub mod notify;
pub mod playback;
pub mod quiz;
pub mod tasks;

pub use api::{
    AnswerRequest, AnswerResult, AuthService, AuthToken, BackendClient, QuizApi,
    StartQuizRequest, StatsApi,
};
pub use app_services::AppServices;
pub use config::ClientConfig;
pub use error::{AppServicesError, AuthError, PlaybackError, QuizApiError};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier};
pub use playback::{AudioOutput, EndedCallback, MemoryOutput, PlayOutcome, PlaybackCoordinator};
pub use quiz::{
    AnswerOutcome, QuizSessionController, QuizSnapshot, QuizTimings, SessionPhase,
    SessionRunState,
};
pub use reqwest::StatusCode;
pub use tasks::{TaskGuard, TaskScheduler};
