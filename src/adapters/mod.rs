//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`StaticAuth`] - fixed bearer token
//! - [`SessionAuth`] - access/refresh token pair with server-side refresh
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockAuthProvider`] - Scripted auth state and refresh

pub mod mock;
pub mod reqwest_http;
pub mod session_auth;

pub use mock::{MockAuthProvider, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
pub use session_auth::{SessionAuth, StaticAuth};
