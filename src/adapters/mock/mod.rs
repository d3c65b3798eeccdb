//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`MockAuthProvider`] - Auth state with a scripted refresh outcome

pub mod auth;
pub mod http;

pub use auth::MockAuthProvider;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
