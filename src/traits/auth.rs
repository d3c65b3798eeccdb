//! Auth provider trait abstraction.
//!
//! The credential belongs to an auth subsystem outside this crate. The chat
//! client only reads the current state and asks for a refresh when the
//! server rejects a token.

use async_trait::async_trait;

use crate::auth::AuthContext;
use crate::error::AuthError;

/// Read/refresh access to the process-wide auth state.
///
/// `current` is called before every request attempt, so implementations
/// must return the latest token rather than a snapshot taken at
/// construction time.
///
/// # Example
///
/// ```ignore
/// use ansari_client::traits::AuthProvider;
///
/// async fn token_after_refresh<P: AuthProvider>(provider: &P) -> Option<String> {
///     provider.refresh().await.ok()?;
///     provider.current().token
/// }
/// ```
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Snapshot of the current auth state.
    fn current(&self) -> AuthContext;

    /// Obtain a fresh access token.
    ///
    /// On success the new token must also be visible through
    /// [`current`](AuthProvider::current).
    async fn refresh(&self) -> Result<String, AuthError>;
}
