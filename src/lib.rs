//! Ansari client - authenticated streaming chat client
//!
//! Thread lifecycle, message submission with a streamed reply, and
//! feedback against the chat backend, with a single token refresh and
//! replay when a request is rejected.
//!
//! ```ignore
//! use ansari_client::adapters::StaticAuth;
//! use ansari_client::config::ClientConfig;
//! use ansari_client::models::AddMessageRequest;
//! use ansari_client::service::ChatService;
//! use ansari_client::stream::collect_reply;
//!
//! let service = ChatService::from_config(ClientConfig::from_env(), Arc::new(StaticAuth::new(token)))?;
//! let thread = service.create_thread().await?;
//! let reply = service
//!     .stream_reply(&thread.id, &AddMessageRequest::user("Salam"), CancellationToken::new())
//!     .await?;
//! println!("{}", collect_reply(reply).await?);
//! ```

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod stream;
pub mod traits;

pub use error::{ChatError, ChatResult};
pub use service::ChatService;
