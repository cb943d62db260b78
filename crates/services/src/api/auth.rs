use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Client;
use serde::Serialize;

use quiz_core::model::UserProfile;

use super::wire::{CallbackResponse, LoginUrlResponse};
use crate::config::ClientConfig;
use crate::error::AuthError;

/// Bearer token shared by every backend client of the process.
///
/// Held in memory only; persisting it is up to the host.
#[derive(Clone, Debug, Default)]
pub struct AuthToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl AuthToken {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(token)),
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[derive(Debug, Serialize)]
struct CallbackRequest<'a> {
    code: &'a str,
}

/// Spotify OAuth flow against the backend's auth endpoints.
#[derive(Clone)]
pub struct AuthService {
    client: Client,
    api_base: String,
    token: AuthToken,
}

impl AuthService {
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, token: AuthToken) -> Result<Self, AuthError> {
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

    /// URL of the Spotify consent page.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on transport failures or non-success status.
    pub async fn login_url(&self) -> Result<String, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/spotify-login", self.api_base))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::HttpStatus(response.status()));
        }
        let body: LoginUrlResponse = response.json().await?;
        Ok(body.auth_url)
    }

    /// Exchange the OAuth callback code for a session token and store it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyCode` for a blank code, or transport/status errors.
    pub async fn exchange_code(&self, code: &str) -> Result<UserProfile, AuthError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::EmptyCode);
        }
        let response = self
            .client
            .post(format!("{}/auth/spotify-callback", self.api_base))
            .json(&CallbackRequest { code })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::HttpStatus(response.status()));
        }
        let body: CallbackResponse = response.json().await?;
        self.token.set(body.token);
        log::info!("signed in as {}", body.user.name());
        Ok(body.user)
    }

    /// Profile of the signed-in player.
    ///
    /// A rejected token is cleared so the app falls back to the signed-out state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a token, or transport/status errors.
    pub async fn current_user(&self) -> Result<UserProfile, AuthError> {
        let token = self.token.get().ok_or(AuthError::NotSignedIn)?;
        let response = self
            .client
            .get(format!("{}/auth/me", self.api_base))
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            log::warn!("stored token was rejected; signing out");
            self.token.clear();
            return Err(AuthError::NotSignedIn);
        }
        if !status.is_success() {
            return Err(AuthError::HttpStatus(status));
        }
        Ok(response.json().await?)
    }

    pub fn logout(&self) {
        self.token.clear();
    }
}
