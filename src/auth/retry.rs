//! Request primitive with a single refresh-and-replay on auth failure.
//!
//! Every attempt re-reads the auth state, so the replay after a refresh
//! always carries the new token. The retry bound is enforced by the
//! attempt state machine: a request is sent at most twice and the token is
//! refreshed at most once.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::auth::AuthHeaderBuilder;
use crate::error::{AuthError, ChatResult, NetworkError};
use crate::traits::{
    AuthProvider, Headers, HttpClient, HttpError, Method, Response, StreamingResponse,
};

/// Status the server uses to reject a credential.
pub const UNAUTHORIZED: u16 = 401;

/// True if `status` means the credential was rejected.
pub fn is_auth_failure(status: u16) -> bool {
    status == UNAUTHORIZED
}

/// Everything needed to issue (and reissue) a request, minus the headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }

    /// POST without a body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: None,
        }
    }

    /// POST with `payload` serialized as JSON.
    pub fn post_json<T: Serialize>(
        url: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            body: Some(serde_json::to_string(payload)?),
        })
    }
}

enum AttemptState {
    Initial,
    Retried,
    Failed(AuthError),
}

trait StatusCode {
    fn status_code(&self) -> u16;
}

impl StatusCode for Response {
    fn status_code(&self) -> u16 {
        self.status
    }
}

impl StatusCode for StreamingResponse {
    fn status_code(&self) -> u16 {
        self.status
    }
}

/// Run `fut` unless `cancel` fires first.
///
/// The future is dropped on cancellation, which aborts the in-flight
/// request and releases its connection.
pub(crate) async fn cancellable<F: Future>(
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<F::Output, NetworkError> {
    match cancel {
        None => Ok(fut.await),
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(NetworkError::Cancelled),
            output = fut => Ok(output),
        },
    }
}

/// Authenticated request primitive shared by every service operation.
#[derive(Clone)]
pub struct AuthRetryFetch {
    http: Arc<dyn HttpClient>,
    auth: Arc<dyn AuthProvider>,
    headers: AuthHeaderBuilder,
}

impl AuthRetryFetch {
    pub fn new(
        http: Arc<dyn HttpClient>,
        auth: Arc<dyn AuthProvider>,
        headers: AuthHeaderBuilder,
    ) -> Self {
        Self {
            http,
            auth,
            headers,
        }
    }

    /// Headers for the current auth state, failing fast when signed out.
    pub fn current_headers(&self) -> Result<Headers, AuthError> {
        self.headers.build(&self.auth.current())
    }

    /// Issue `spec` and buffer the response body.
    ///
    /// Non-2xx statuses other than an auth failure come back as ordinary
    /// responses.
    pub async fn request(
        &self,
        spec: &RequestSpec,
        cancel: Option<&CancellationToken>,
    ) -> ChatResult<Response> {
        self.execute(spec, cancel, |headers| {
            self.send_buffered(spec, headers).boxed()
        })
        .await
    }

    /// Issue `spec` and hand back the body unread.
    pub async fn request_stream(
        &self,
        spec: &RequestSpec,
        cancel: Option<&CancellationToken>,
    ) -> ChatResult<StreamingResponse> {
        self.execute(spec, cancel, |headers| {
            self.send_streaming(spec, headers).boxed()
        })
        .await
    }

    async fn execute<'a, T, F>(
        &'a self,
        spec: &'a RequestSpec,
        cancel: Option<&CancellationToken>,
        send: F,
    ) -> ChatResult<T>
    where
        T: StatusCode,
        F: Fn(Headers) -> BoxFuture<'a, Result<T, HttpError>>,
    {
        let mut state = AttemptState::Initial;

        loop {
            let retried = match state {
                AttemptState::Initial => false,
                AttemptState::Retried => true,
                AttemptState::Failed(err) => {
                    tracing::warn!(
                        method = %spec.method,
                        url = %spec.url,
                        error = %err,
                        "request rejected by auth"
                    );
                    return Err(err.into());
                }
            };

            let headers = self.current_headers()?;
            tracing::debug!(method = %spec.method, url = %spec.url, retried, "sending request");
            let response = cancellable(cancel, send(headers)).await??;

            if !is_auth_failure(response.status_code()) {
                return Ok(response);
            }
            drop(response);

            state = if retried {
                AttemptState::Failed(AuthError::RetryExhausted)
            } else {
                tracing::debug!(url = %spec.url, "unauthorized, refreshing token");
                match cancellable(cancel, self.auth.refresh()).await? {
                    Ok(_) => {
                        tracing::info!(url = %spec.url, "token refreshed, replaying request");
                        AttemptState::Retried
                    }
                    Err(err) => AttemptState::Failed(err),
                }
            };
        }
    }

    async fn send_buffered(&self, spec: &RequestSpec, headers: Headers) -> Result<Response, HttpError> {
        let body = spec.body.as_deref().unwrap_or("");
        match spec.method {
            Method::Get => self.http.get(&spec.url, &headers).await,
            Method::Post => self.http.post(&spec.url, body, &headers).await,
            Method::Delete => self.http.delete(&spec.url, &headers).await,
        }
    }

    async fn send_streaming(
        &self,
        spec: &RequestSpec,
        headers: Headers,
    ) -> Result<StreamingResponse, HttpError> {
        match spec.method {
            Method::Post => {
                let body = spec.body.as_deref().unwrap_or("");
                self.http.post_stream(&spec.url, body, &headers).await
            }
            other => Err(HttpError::Other(format!(
                "streaming {} requests are not supported",
                other
            ))),
        }
    }
}
