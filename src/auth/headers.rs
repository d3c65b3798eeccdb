//! Authenticated request headers.

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::traits::Headers;

/// Builds the header set every API request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderBuilder {
    client_header: String,
    client_id: String,
}

impl AuthHeaderBuilder {
    pub fn new(client_header: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            client_header: client_header.into(),
            client_id: client_id.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.client_header.clone(), config.client_id.clone())
    }

    /// Headers for `ctx`, or `NotAuthenticated` when there is no usable token.
    pub fn build(&self, ctx: &AuthContext) -> Result<Headers, AuthError> {
        let token = ctx.bearer_token().ok_or(AuthError::NotAuthenticated)?;

        let mut headers = Headers::with_capacity(3);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert(self.client_header.clone(), self.client_id.clone());
        Ok(headers)
    }
}

impl Default for AuthHeaderBuilder {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers() {
        let headers = AuthHeaderBuilder::default()
            .build(&AuthContext::authenticated("tok-1"))
            .unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            headers.get("Authorization"),
            Some(&"Bearer tok-1".to_string())
        );
        assert_eq!(headers.get("X-Mobile-Ansari"), Some(&"ANSARI".to_string()));
    }

    #[test]
    fn test_custom_client_header() {
        let headers = AuthHeaderBuilder::new("X-Client", "tests")
            .build(&AuthContext::authenticated("t"))
            .unwrap();
        assert_eq!(headers.get("X-Client"), Some(&"tests".to_string()));
        assert!(!headers.contains_key("X-Mobile-Ansari"));
    }

    #[test]
    fn test_unauthenticated_fails() {
        let err = AuthHeaderBuilder::default()
            .build(&AuthContext::anonymous())
            .unwrap_err();
        assert_eq!(err, AuthError::NotAuthenticated);
    }

    #[test]
    fn test_missing_token_fails_even_if_flag_set() {
        let ctx = AuthContext {
            is_authenticated: true,
            token: None,
        };
        assert_eq!(
            AuthHeaderBuilder::default().build(&ctx),
            Err(AuthError::NotAuthenticated)
        );
    }
}
