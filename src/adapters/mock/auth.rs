//! Scripted auth provider for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::AuthContext;
use crate::error::AuthError;
use crate::traits::AuthProvider;

/// In-memory auth state with a scripted refresh outcome.
///
/// A successful refresh installs the scripted token so the next
/// [`current`](AuthProvider::current) call sees it.
#[derive(Debug, Clone)]
pub struct MockAuthProvider {
    context: Arc<Mutex<AuthContext>>,
    refresh_result: Arc<Mutex<Result<String, AuthError>>>,
    refresh_calls: Arc<AtomicUsize>,
}

impl MockAuthProvider {
    /// Signed in with `token`; refresh fails until scripted otherwise.
    pub fn authenticated(token: &str) -> Self {
        Self::with_context(AuthContext::authenticated(token))
    }

    /// Signed out.
    pub fn anonymous() -> Self {
        Self::with_context(AuthContext::anonymous())
    }

    pub fn with_context(context: AuthContext) -> Self {
        Self {
            context: Arc::new(Mutex::new(context)),
            refresh_result: Arc::new(Mutex::new(Err(AuthError::RefreshFailed {
                message: "no refresh scripted".to_string(),
            }))),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make the next refreshes succeed with `token`.
    pub fn refresh_succeeds_with(self, token: &str) -> Self {
        *self.refresh_result.lock().unwrap() = Ok(token.to_string());
        self
    }

    /// Make the next refreshes fail with `message`.
    pub fn refresh_fails_with(self, message: &str) -> Self {
        *self.refresh_result.lock().unwrap() = Err(AuthError::RefreshFailed {
            message: message.to_string(),
        });
        self
    }

    /// Replace the current context, as the external subsystem would.
    pub fn set_context(&self, context: AuthContext) {
        *self.context.lock().unwrap() = context;
    }

    /// How many times `refresh` was called.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    fn current(&self) -> AuthContext {
        self.context.lock().unwrap().clone()
    }

    async fn refresh(&self) -> Result<String, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.refresh_result.lock().unwrap().clone();
        if let Ok(token) = &result {
            *self.context.lock().unwrap() = AuthContext::authenticated(token.clone());
        }
        result
    }
}
