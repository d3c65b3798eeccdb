use serde::{Deserialize, Serialize};

/// Outbound user message for `POST /threads/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddMessageRequest {
    /// Sender role, normally "user"
    pub role: String,
    /// Message text
    pub content: String,
}

impl AddMessageRequest {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// A message from the user
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Rename payload for `POST /threads/{id}/name`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadNameRequest {
    pub name: String,
}

impl ThreadNameRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
