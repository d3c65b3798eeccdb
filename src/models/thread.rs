use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

/// Name shown for a thread the server has not named yet
pub const PLACEHOLDER_NAME: &str = "New chat";

/// A conversation thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thread {
    /// Server id, always rendered as a string
    pub id: String,
    pub name: String,
    /// Turns in insertion order; empty, never absent
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Creation time for locally created threads, last update for listed
    /// ones; `None` when the server did not say
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Thread {
    /// A thread the server just created and knows nothing else about.
    pub fn new_local(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: PLACEHOLDER_NAME.to_string(),
            messages: Vec::new(),
            date: Some(Utc::now()),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn has_placeholder_name(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }
}
