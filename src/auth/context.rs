//! Auth state as seen by the chat client.

/// Snapshot of the external auth subsystem's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Whether the subsystem considers the user signed in
    pub is_authenticated: bool,
    /// Current access token
    pub token: Option<String>,
}

impl AuthContext {
    /// Signed in with the given access token.
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            token: Some(token.into()),
        }
    }

    /// Signed out.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The token to send, if this context allows authenticated requests.
    ///
    /// An empty token counts as absent.
    pub fn bearer_token(&self) -> Option<&str> {
        if !self.is_authenticated {
            return None;
        }
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}
