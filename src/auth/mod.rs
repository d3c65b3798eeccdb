//! Authentication for API requests.
//!
//! - [`AuthContext`] - snapshot of the external auth state
//! - [`AuthHeaderBuilder`] - headers every request carries
//! - [`AuthRetryFetch`] - request primitive with one refresh-and-replay

pub mod context;
pub mod headers;
pub mod retry;

pub use context::AuthContext;
pub use headers::AuthHeaderBuilder;
pub use retry::{is_auth_failure, AuthRetryFetch, RequestSpec};
