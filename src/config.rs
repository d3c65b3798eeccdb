//! Client configuration.
//!
//! Use the builder methods to customize a default configuration, or
//! [`ClientConfig::from_env`] to pick values up from the deployment
//! environment.
//!
//! ```ignore
//! use ansari_client::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("https://api.example.com/api/v2")
//!     .with_connect_timeout(std::time::Duration::from_secs(10));
//! ```

use std::time::Duration;

/// Default API base URL, used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Header identifying this client to the API.
pub const DEFAULT_CLIENT_HEADER: &str = "X-Mobile-Ansari";

/// Value sent in the client-identification header.
pub const DEFAULT_CLIENT_ID: &str = "ANSARI";

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "ANSARI_API_URL";

/// Environment variable overriding the client-identification header name.
pub const ENV_CLIENT_HEADER: &str = "ANSARI_CLIENT_HEADER";

/// Environment variable overriding the client-identification header value.
pub const ENV_CLIENT_ID: &str = "ANSARI_CLIENT_ID";

/// Configuration for a [`ChatService`](crate::service::ChatService).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash
    pub base_url: String,
    /// Name of the client-identification header
    pub client_header: String,
    /// Value of the client-identification header
    pub client_id: String,
    /// Connect timeout for the HTTP client. Replies stream for as long as the
    /// assistant keeps writing, so there is no total request timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_header: DEFAULT_CLIENT_HEADER.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            connect_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(url.into());
        self
    }

    /// Set the client-identification header.
    pub fn with_client_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.client_header = name.into();
        self.client_id = value.into();
        self
    }

    /// Set the connect timeout (`None` disables it).
    pub fn with_connect_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.connect_timeout = timeout.into();
        self
    }

    /// Build the configuration from `ANSARI_API_URL`, `ANSARI_CLIENT_HEADER`
    /// and `ANSARI_CLIENT_ID`, falling back to defaults for unset or empty
    /// variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_env(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(header) = non_empty_env(ENV_CLIENT_HEADER) {
            config.client_header = header;
        }
        if let Some(id) = non_empty_env(ENV_CLIENT_ID) {
            config.client_id = id;
        }

        config
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
