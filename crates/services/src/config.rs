use std::env;
use std::time::Duration;

/// Connection settings for the quiz backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub token: Option<String>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: Self::DEFAULT_BACKEND_URL.into(),
            token: None,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_BACKEND_URL: &'static str = "http://localhost:8001";

    /// Read `QUIZ_BACKEND_URL`, `QUIZ_API_TOKEN` and `QUIZ_API_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let backend_url = env::var("QUIZ_BACKEND_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BACKEND_URL.into());
        let token = env::var("QUIZ_API_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let request_timeout = env::var("QUIZ_API_TIMEOUT_SECS")
            .ok()
            .and_then(|value| parse_timeout_secs(&value));
        Self {
            backend_url,
            token,
            request_timeout,
        }
    }

    #[must_use]
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|value| !value.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Base URL of the REST API (`{backend_url}/api`).
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }
}

/// Parses a positive number of seconds; zero and garbage mean "no timeout".
#[must_use]
pub fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
