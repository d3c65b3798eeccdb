//! Error handling for the chat client.
//!
//! | Error | Raised when | Propagated |
//! |-------|-------------|------------|
//! | [`AuthError`] | no token, refresh failed, or rejected after refresh | always |
//! | `ChatError::NotFound` | success status but blank payload | always |
//! | `ChatError::Application` | non-2xx status or malformed payload | always |
//! | [`NetworkError`] | transport failure or cancellation | always |
//! | [`StreamError`] | transport failure mid-reply | always |
//!
//! Feedback submission is the one operation that logs and swallows its errors.

mod auth;
mod category;
mod chat_error;
mod network;
mod stream;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use chat_error::{ChatError, ChatResult};
pub use network::NetworkError;
pub use stream::StreamError;
