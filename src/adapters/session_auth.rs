//! Auth providers backed by tokens held in memory.
//!
//! - [`StaticAuth`] - a fixed token that cannot be refreshed
//! - [`SessionAuth`] - access + refresh token pair, refreshed through
//!   `POST <auth_base>/auth/refresh`

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::AuthContext;
use crate::error::AuthError;
use crate::traits::{AuthProvider, Headers, HttpClient};

/// A token supplied once, e.g. from the environment.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    context: AuthContext,
}

impl StaticAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            context: AuthContext::authenticated(token),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            context: AuthContext::anonymous(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    fn current(&self) -> AuthContext {
        self.context.clone()
    }

    async fn refresh(&self) -> Result<String, AuthError> {
        Err(AuthError::RefreshFailed {
            message: "no refresh token configured".to_string(),
        })
    }
}

/// Response from `POST /auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Present when the server rotates refresh tokens
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug)]
struct SessionState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    authenticated: bool,
}

/// Access/refresh token pair for one signed-in session.
///
/// Refreshes are serialized: a refresh that starts while another is in
/// flight waits for it and then uses the refresh token it left behind.
/// A failed refresh signs the session out.
pub struct SessionAuth {
    http: Arc<dyn HttpClient>,
    refresh_url: String,
    state: Mutex<SessionState>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl SessionAuth {
    pub fn new(
        http: Arc<dyn HttpClient>,
        auth_base_url: &str,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            refresh_url: format!("{}/auth/refresh", auth_base_url.trim_end_matches('/')),
            state: Mutex::new(SessionState {
                access_token: Some(access_token.into()),
                refresh_token: Some(refresh_token.into()),
                authenticated: true,
            }),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Forget both tokens.
    pub fn sign_out(&self) {
        let mut state = self.state();
        state.access_token = None;
        state.refresh_token = None;
        state.authenticated = false;
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, message: String) -> AuthError {
        tracing::warn!(url = %self.refresh_url, %message, "token refresh failed");
        self.state().authenticated = false;
        AuthError::RefreshFailed { message }
    }

    async fn exchange(&self, refresh_token: &str) -> Result<TokenResponse, String> {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let body = serde_json::json!({ "refresh_token": refresh_token }).to_string();

        let response = self
            .http
            .post(&self.refresh_url, &body, &headers)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("refresh rejected (HTTP {})", response.status));
        }

        response
            .json::<TokenResponse>()
            .map_err(|e| format!("failed to parse refresh response: {}", e))
    }
}

impl std::fmt::Debug for SessionAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuth")
            .field("refresh_url", &self.refresh_url)
            .field("authenticated", &self.state().authenticated)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    fn current(&self) -> AuthContext {
        let state = self.state();
        AuthContext {
            is_authenticated: state.authenticated,
            token: state.access_token.clone(),
        }
    }

    async fn refresh(&self) -> Result<String, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        let stored = self.state().refresh_token.clone();
        let refresh_token = match stored {
            Some(token) => token,
            None => return Err(self.fail("no refresh token".to_string())),
        };

        let tokens = self.exchange(&refresh_token).await.map_err(|m| self.fail(m))?;

        let mut state = self.state();
        state.access_token = Some(tokens.access_token.clone());
        if let Some(rotated) = tokens.refresh_token {
            state.refresh_token = Some(rotated);
        }
        state.authenticated = true;
        tracing::info!("access token refreshed");

        Ok(tokens.access_token)
    }
}
