//! Mock HTTP client for testing.
//!
//! Responses are scripted per method and URL. Several responses queued for
//! the same request are handed out in order; the last one keeps being
//! returned once the queue is down to it.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::traits::{
    ByteStream, Headers, HttpClient, HttpError, Method, Response, StreamingResponse,
};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered response. Streaming requests receive it as a one-chunk body
    /// with the same status.
    Success(Response),
    /// Transport failure before any status
    Error(HttpError),
    /// 200 response streaming these chunks, then end-of-stream
    Stream(Vec<Bytes>),
    /// 200 response streaming these chunks, then never finishing
    StreamThenHang(Vec<Bytes>),
    /// 200 response streaming these chunks, then failing
    StreamThenError(Vec<Bytes>, HttpError),
}

impl MockResponse {
    /// Buffered response with a JSON body.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(value.to_string())))
    }

    /// Buffered response with an arbitrary body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

type RequestKey = (Method, String);

/// Mock HTTP client for testing.
///
/// ```ignore
/// use ansari_client::adapters::mock::{MockHttpClient, MockResponse};
/// use ansari_client::traits::Method;
///
/// let client = MockHttpClient::new();
/// client.push_response(Method::Get, "http://api/threads", MockResponse::status(401, ""));
/// client.push_response(Method::Get, "http://api/threads", MockResponse::status(200, "[]"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<RequestKey, VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    open_streams: Arc<AtomicUsize>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything scripted for this request with a single response.
    pub fn set_response(&self, method: Method, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert((method, url.to_string()), VecDeque::from([response]));
    }

    /// Queue another response for this request.
    pub fn push_response(&self, method: Method, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Set a default response for requests without a scripted one.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Streaming bodies handed out and not yet dropped.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    fn record_request(&self, method: Method, url: &str, headers: &Headers, body: Option<&str>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });
    }

    fn next_response(&self, method: Method, url: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();
        if let Some(queue) = responses.get_mut(&(method, url.to_string())) {
            if queue.len() > 1 {
                return queue.pop_front();
            }
            if let Some(last) = queue.front() {
                return Some(last.clone());
            }
        }
        drop(responses);

        self.default_response.lock().unwrap().clone()
    }

    fn buffered(&self, method: Method, url: &str) -> Result<Response, HttpError> {
        match self.next_response(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }

    fn track(&self, body: ByteStream) -> ByteStream {
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedStream {
            inner: body,
            open: Arc::clone(&self.open_streams),
        })
    }
}

/// Body wrapper that lets tests observe when a stream is released.
struct TrackedStream {
    inner: ByteStream,
    open: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl Stream<Item = Result<Bytes, HttpError>> + Send {
    futures::stream::iter(chunks.into_iter().map(Ok))
}

fn boxed<S>(stream: S) -> ByteStream
where
    S: Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
{
    Box::pin(stream)
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(Method::Get, url, headers, None);
        self.buffered(Method::Get, url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(Method::Post, url, headers, Some(body));
        self.buffered(Method::Post, url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(Method::Delete, url, headers, None);
        self.buffered(Method::Delete, url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError> {
        use futures_util::StreamExt;

        self.record_request(Method::Post, url, headers, Some(body));

        let (status, body): (u16, ByteStream) = match self.next_response(Method::Post, url) {
            Some(MockResponse::Success(response)) => {
                (response.status, boxed(chunk_stream(vec![response.body])))
            }
            Some(MockResponse::Error(err)) => return Err(err),
            Some(MockResponse::Stream(chunks)) => (200, boxed(chunk_stream(chunks))),
            Some(MockResponse::StreamThenHang(chunks)) => (
                200,
                boxed(chunk_stream(chunks).chain(futures::stream::pending())),
            ),
            Some(MockResponse::StreamThenError(chunks, err)) => (
                200,
                boxed(chunk_stream(chunks).chain(futures::stream::iter(vec![Err(err)]))),
            ),
            None => {
                return Err(HttpError::Other(format!(
                    "No mock response for POST {}",
                    url
                )))
            }
        };

        Ok(StreamingResponse::new(status, Headers::new(), self.track(body)))
    }
}
