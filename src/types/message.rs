//! Message types
//!
//! Defines chat message structures and senders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user
    User,
    /// Reply from the AI assistant
    Assistant,
}

impl Sender {
    /// CSS class of the message bubble.
    pub fn as_class(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    /// Single-letter avatar shown next to the bubble.
    pub fn avatar(self) -> &'static str {
        match self {
            Sender::User => "U",
            Sender::Assistant => "F",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message
    pub sender: Sender,
    /// Raw, unformatted text
    pub text: String,
    /// When the message was recorded
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message stamped with the current time
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}
