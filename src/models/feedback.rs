use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of feedback a user leaves on an assistant message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackClass {
    ThumbsUp,
    ThumbsDown,
    Redo,
    Copy,
}

impl FeedbackClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackClass::ThumbsUp => "thumbsup",
            FeedbackClass::ThumbsDown => "thumbsdown",
            FeedbackClass::Redo => "redo",
            FeedbackClass::Copy => "copy",
        }
    }
}

impl fmt::Display for FeedbackClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no feedback class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFeedbackClassError(pub String);

impl fmt::Display for ParseFeedbackClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown feedback class '{}' (expected thumbsup, thumbsdown, redo or copy)",
            self.0
        )
    }
}

impl std::error::Error for ParseFeedbackClassError {}

impl FromStr for FeedbackClass {
    type Err = ParseFeedbackClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thumbsup" | "up" => Ok(FeedbackClass::ThumbsUp),
            "thumbsdown" | "down" => Ok(FeedbackClass::ThumbsDown),
            "redo" => Ok(FeedbackClass::Redo),
            "copy" => Ok(FeedbackClass::Copy),
            _ => Err(ParseFeedbackClassError(s.to_string())),
        }
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub thread_id: String,
    pub message_id: String,
    pub feedback_class: FeedbackClass,
    pub comment: String,
}

impl FeedbackRequest {
    pub fn new(
        thread_id: impl Into<String>,
        message_id: impl Into<String>,
        feedback_class: FeedbackClass,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            message_id: message_id.into(),
            feedback_class,
            comment: comment.into(),
        }
    }
}
