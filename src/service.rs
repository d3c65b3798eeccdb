//! Chat API client.
//!
//! [`ChatService`] turns conversation actions into authenticated requests
//! against the chat backend and maps the wire payloads onto the domain
//! model. Every request goes through [`AuthRetryFetch`], so a rejected
//! token is refreshed and the request replayed once.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::adapters::ReqwestHttpClient;
use crate::auth::{AuthHeaderBuilder, AuthRetryFetch, RequestSpec};
use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::wire::{
    is_blank_payload, CreateThreadResponse, ThreadDetailDto, ThreadSummaryDto,
};
use crate::models::{AddMessageRequest, FeedbackClass, FeedbackRequest, Thread, ThreadNameRequest};
use crate::stream::{decode, FragmentStream};
use crate::traits::{AuthProvider, ByteStream, HttpClient, Response};

const OP_CREATE: &str = "creating thread";
const OP_SEND: &str = "sending message";
const OP_GET: &str = "fetching thread";
const OP_LIST: &str = "fetching threads";
const OP_DELETE: &str = "deleting thread";
const OP_RENAME: &str = "renaming thread";
const OP_FEEDBACK: &str = "sending feedback";

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Client for the chat backend.
///
/// Holds no mutable state; clones share the underlying HTTP client and
/// auth provider.
#[derive(Clone)]
pub struct ChatService {
    fetch: AuthRetryFetch,
    config: ClientConfig,
}

impl ChatService {
    /// Create a service over an injected transport and auth provider.
    pub fn new(
        http: Arc<dyn HttpClient>,
        auth: Arc<dyn AuthProvider>,
        config: ClientConfig,
    ) -> Self {
        let headers = AuthHeaderBuilder::from_config(&config);
        Self {
            fetch: AuthRetryFetch::new(http, auth, headers),
            config,
        }
    }

    /// Create a service talking to `config.base_url` over reqwest.
    pub fn from_config(config: ClientConfig, auth: Arc<dyn AuthProvider>) -> ChatResult<Self> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self::new(Arc::new(http), auth, config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn thread_url(&self, thread_id: &str) -> String {
        self.config.endpoint(&format!("threads/{}", thread_id))
    }

    /// Create an empty thread on the server.
    ///
    /// POST /threads
    pub async fn create_thread(&self) -> ChatResult<Thread> {
        let spec = RequestSpec::post(self.config.endpoint("threads"));
        let response = self.fetch.request(&spec, None).await?;
        ensure_success(OP_CREATE, &response)?;

        let created: CreateThreadResponse = parse_json(OP_CREATE, &response)?;
        tracing::debug!(thread_id = %created.thread_id, "thread created");
        Ok(created.into_thread())
    }

    /// Send a user message and return the raw reply body.
    ///
    /// POST /threads/{id}
    ///
    /// `cancel` aborts the request (and the refresh/replay, if one is under
    /// way). The body is returned unread; a failure status drops it.
    pub async fn add_message(
        &self,
        thread_id: &str,
        message: &AddMessageRequest,
        cancel: CancellationToken,
    ) -> ChatResult<ByteStream> {
        let spec = RequestSpec::post_json(self.thread_url(thread_id), message)
            .map_err(|e| ChatError::malformed(OP_SEND, e.to_string()))?;

        let response = self.fetch.request_stream(&spec, Some(&cancel)).await?;
        if !response.is_success() {
            let status = response.status;
            drop(response);
            tracing::warn!(thread_id, status, "message rejected");
            return Err(ChatError::status(OP_SEND, status, "message was not accepted"));
        }

        Ok(response.into_body())
    }

    /// Send a user message and decode the reply as it arrives.
    ///
    /// The same `cancel` token aborts the request and ends the fragment
    /// stream.
    pub async fn stream_reply(
        &self,
        thread_id: &str,
        message: &AddMessageRequest,
        cancel: CancellationToken,
    ) -> ChatResult<FragmentStream> {
        let body = self.add_message(thread_id, message, cancel.clone()).await?;
        Ok(decode(body, cancel))
    }

    /// Load one thread with its messages.
    ///
    /// GET /threads/{id}
    pub async fn get_thread(&self, thread_id: &str) -> ChatResult<Thread> {
        let spec = RequestSpec::get(self.thread_url(thread_id));
        let response = self.fetch.request(&spec, None).await?;
        ensure_success(OP_GET, &response)?;

        let text = body_text(OP_GET, &response)?;
        if is_blank_payload(&text) {
            return Err(ChatError::NotFound {
                resource: format!("thread {}", thread_id),
            });
        }

        let detail: ThreadDetailDto = serde_json::from_str(&text)
            .map_err(|e| ChatError::malformed(OP_GET, e.to_string()))?;
        Ok(detail.into_thread(thread_id))
    }

    /// List every thread of the signed-in user.
    ///
    /// GET /threads
    pub async fn get_all_threads(&self) -> ChatResult<Vec<Thread>> {
        let spec = RequestSpec::get(self.config.endpoint("threads"));
        let response = self.fetch.request(&spec, None).await?;
        ensure_success(OP_LIST, &response)?;

        let summaries: Vec<ThreadSummaryDto> = parse_json(OP_LIST, &response)?;
        Ok(summaries
            .into_iter()
            .map(ThreadSummaryDto::into_thread)
            .collect())
    }

    /// DELETE /threads/{id}
    pub async fn delete_thread(&self, thread_id: &str) -> ChatResult<()> {
        let spec = RequestSpec::delete(self.thread_url(thread_id));
        let response = self.fetch.request(&spec, None).await?;
        ensure_success(OP_DELETE, &response)
    }

    /// POST /threads/{id}/name
    pub async fn set_thread_name(
        &self,
        thread_id: &str,
        request: &ThreadNameRequest,
    ) -> ChatResult<()> {
        let url = self.config.endpoint(&format!("threads/{}/name", thread_id));
        let spec = RequestSpec::post_json(url, request)
            .map_err(|e| ChatError::malformed(OP_RENAME, e.to_string()))?;
        let response = self.fetch.request(&spec, None).await?;
        ensure_success(OP_RENAME, &response)
    }

    /// Record feedback on an assistant message.
    ///
    /// POST /feedback
    ///
    /// Feedback is best effort: failures are logged and never reach the
    /// caller.
    pub async fn send_feedback(
        &self,
        thread_id: &str,
        message_id: &str,
        feedback_class: FeedbackClass,
        comment: &str,
    ) {
        let request = FeedbackRequest::new(thread_id, message_id, feedback_class, comment);
        match self.post_feedback(&request).await {
            Ok(body) => {
                tracing::debug!(thread_id, message_id, %feedback_class, response = %body, "feedback sent")
            }
            Err(err) => tracing::warn!(
                thread_id,
                message_id,
                code = err.error_code(),
                error = %err,
                "feedback not recorded"
            ),
        }
    }

    async fn post_feedback(&self, request: &FeedbackRequest) -> ChatResult<String> {
        let spec = RequestSpec::post_json(self.config.endpoint("feedback"), request)
            .map_err(|e| ChatError::malformed(OP_FEEDBACK, e.to_string()))?;
        let response = self.fetch.request(&spec, None).await?;
        ensure_success(OP_FEEDBACK, &response)?;
        body_text(OP_FEEDBACK, &response)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn ensure_success(operation: &'static str, response: &Response) -> ChatResult<()> {
    if response.is_success() {
        return Ok(());
    }
    let body = String::from_utf8_lossy(&response.body);
    let message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
    tracing::warn!(operation, status = response.status, "request failed");
    Err(ChatError::status(operation, response.status, message))
}

fn body_text(operation: &'static str, response: &Response) -> ChatResult<String> {
    response
        .text()
        .map_err(|e| ChatError::malformed(operation, e.to_string()))
}

fn parse_json<T: DeserializeOwned>(operation: &'static str, response: &Response) -> ChatResult<T> {
    response
        .json()
        .map_err(|e| ChatError::malformed(operation, e.to_string()))
}
