//! Quiz backend API: request/response types, the `QuizApi` seam and its HTTP client.

mod auth;
mod client;
mod wire;

use async_trait::async_trait;
use serde::Serialize;

use quiz_core::model::{
    Difficulty, LeaderboardEntry, Mood, QuizMode, QuizSession, SessionId, TrackInfo, UserStats,
};

use crate::error::QuizApiError;

pub use auth::{AuthService, AuthToken};
pub use client::BackendClient;

/// Body of `POST /quiz/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartQuizRequest {
    pub mode: QuizMode,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl StartQuizRequest {
    /// Sessions are always prepared at medium difficulty.
    #[must_use]
    pub fn new(mode: QuizMode, mood: Option<Mood>) -> Self {
        Self {
            mode,
            difficulty: Difficulty::Medium,
            mood,
        }
    }
}

/// Body of `POST /quiz/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRequest {
    pub session_id: SessionId,
    pub question_index: usize,
    pub answer: String,
}

/// Server verdict for one answer.
///
/// `total_score` is the authoritative running total; `points` is the delta
/// for this question only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub is_correct: bool,
    pub correct_answer: String,
    pub points: u32,
    pub total_score: u32,
    pub bot_response: String,
    pub fun_fact: Option<String>,
    pub is_last_question: bool,
    pub track_info: Option<TrackInfo>,
}

/// Backend operations the quiz controller depends on.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Create a session.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failures, non-success status or a
    /// session without questions.
    async fn start_quiz(&self, request: StartQuizRequest) -> Result<QuizSession, QuizApiError>;

    /// Grade one answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failures or non-success status.
    async fn submit_answer(&self, request: AnswerRequest) -> Result<AnswerResult, QuizApiError>;
}

/// Read-only statistics shown on the dashboard and leaderboard pages.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Aggregate statistics of the signed-in player.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failures or non-success status.
    async fn user_stats(&self) -> Result<UserStats, QuizApiError>;

    /// Ranked players, best first.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failures or non-success status.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, QuizApiError>;
}
