// src/models.rs

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Represents one entry of the conversation transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
    pub temporary: bool,
    /// HTML rendering of `text` for hosts that inject markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Message {
            sender,
            text: text.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
            temporary: false,
            markup: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    /// A placeholder shown while a request is outstanding.
    pub fn pending(text: impl Into<String>) -> Self {
        Message {
            temporary: true,
            ..Self::bot(text)
        }
    }

    pub fn with_markup(mut self, markup: String) -> Self {
        self.markup = Some(markup);
        self
    }
}

/// A pre-defined trigger that fills and submits the input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub label: String,
    pub message: String,
}

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Logs details of each outbound API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}
