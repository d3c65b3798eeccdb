//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, DELETE, streaming POST)
//! - [`AuthProvider`] - Read and refresh access to the external auth state

pub mod auth;
pub mod http;

pub use auth::AuthProvider;
pub use http::{ByteStream, Headers, HttpClient, HttpError, Method, Response, StreamingResponse};
