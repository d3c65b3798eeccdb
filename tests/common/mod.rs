//! Common test utilities for integration tests.
//!
//! Integration tests drive the real reqwest adapter against a `wiremock`
//! server; the auth subsystem is the scripted mock.

#![allow(dead_code)]

use ansari_client::adapters::mock::MockAuthProvider;
use ansari_client::config::ClientConfig;
use ansari_client::ChatService;
use std::sync::Arc;
use wiremock::MockServer;

/// Token the signed-in mock starts with.
pub const TOKEN: &str = "test-token";

/// Token a scripted refresh hands out.
pub const FRESH_TOKEN: &str = "fresh-token";

pub fn signed_in() -> MockAuthProvider {
    MockAuthProvider::authenticated(TOKEN)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Service pointed at `server` with the given auth state.
pub fn service_for(server: &MockServer, auth: &MockAuthProvider) -> ChatService {
    let config = ClientConfig::default().with_base_url(server.uri());
    ChatService::from_config(config, Arc::new(auth.clone())).expect("service should build")
}

/// Number of requests the server has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
