use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use quiz_core::model::{LeaderboardEntry, QuizSession, UserStats};

use super::auth::AuthToken;
use super::wire::{AnswerResponse, LeaderboardResponse, StartQuizResponse};
use super::{AnswerRequest, AnswerResult, QuizApi, StartQuizRequest, StatsApi};
use crate::config::ClientConfig;
use crate::error::QuizApiError;

/// HTTP client for the quiz backend.
///
/// Attaches the bearer token from the shared [`AuthToken`] to every request.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    api_base: String,
    token: AuthToken,
}

impl BackendClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, token: AuthToken) -> Result<Self, QuizApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_base: config.api_base(),
            token,
        })
    }

    #[must_use]
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, QuizApiError> {
        let request = match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(QuizApiError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizApi for BackendClient {
    async fn start_quiz(&self, request: StartQuizRequest) -> Result<QuizSession, QuizApiError> {
        log::debug!("starting {} quiz", request.mode);
        let body: StartQuizResponse = self
            .send_json(self.client.post(self.url("/quiz/start")).json(&request))
            .await?;
        Ok(body.into_session(request.mode)?)
    }

    async fn submit_answer(&self, request: AnswerRequest) -> Result<AnswerResult, QuizApiError> {
        let body: AnswerResponse = self
            .send_json(self.client.post(self.url("/quiz/answer")).json(&request))
            .await?;
        Ok(body.into())
    }
}

#[async_trait]
impl StatsApi for BackendClient {
    async fn user_stats(&self) -> Result<UserStats, QuizApiError> {
        self.send_json(self.client.get(self.url("/user/stats"))).await
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, QuizApiError> {
        let body: LeaderboardResponse = self
            .send_json(self.client.get(self.url("/leaderboard")))
            .await?;
        Ok(body.leaderboard)
    }
}
