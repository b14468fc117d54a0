// src/errors.rs

use thiserror::Error;

/// Errors raised anywhere in the widget, the transport or the reference server.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Corpus error: {0}")]
    Corpus(String),
    #[error("Generation error: {0}")]
    Generation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl ChatError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        ChatError::Config(msg.into())
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        ChatError::Api(msg.into())
    }

    pub fn transport_error(msg: impl Into<String>) -> Self {
        ChatError::Transport(msg.into())
    }

    pub fn corpus_error(msg: impl Into<String>) -> Self {
        ChatError::Corpus(msg.into())
    }

    pub fn generation_error(msg: impl Into<String>) -> Self {
        ChatError::Generation(msg.into())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Transport(e.to_string())
    }
}
