use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single turn of a thread, as the server sends it.
///
/// `role` and `content` are surfaced for convenience; every other field
/// the server includes is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Sender role ("user", "assistant", ...)
    #[serde(default)]
    pub role: String,
    /// Message body; usually a string, but the server may send structured content
    #[serde(default)]
    pub content: Value,
    /// Any additional wire fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Value::String(content.into()),
            extra: Map::new(),
        }
    }

    /// Content as plain text, if the server sent a string.
    pub fn text(&self) -> Option<&str> {
        self.content.as_str()
    }
}
