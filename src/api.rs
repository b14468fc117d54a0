use crate::{
    errors::{ChatError, ChatResult},
    logging::log_api_call,
    models::{ApiCallLog, ChatRequest},
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Carries one user message to the chat endpoint and hands back the decoded
/// JSON body. Any failure to get a successful, parseable answer is an error.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> ChatResult<Value>;
}

/// `POST {endpoint}` with `{"message": ...}` over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> ChatResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::transport_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, message: &str) -> ChatResult<Value> {
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| ChatError::transport_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: self.endpoint.clone(),
            request_summary: format!("chat message ({} chars)", message.chars().count()),
            response_status: status.as_u16(),
            response_time_ms: start_time.elapsed().as_millis(),
        });

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::api_error(format!(
                "Server returned error: {} - {}",
                status, error_text
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ChatError::api_error(format!("Failed to parse server response: {}", e)))
    }
}

/// Pulls the reply text out of a response body. Missing, non-string and
/// blank values all count as "no reply".
pub fn extract_reply(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|reply| !reply.trim().is_empty())
        .map(str::to_string)
}
