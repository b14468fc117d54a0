//! Reference `/chat` endpoint.
//!
//! Turns `{"message": ...}` into a model reply rendered as restricted HTML
//! and returns it under the configured reply field.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::{CHAT_PATH, HEALTH_CHECK_BODY, HEALTH_CHECK_PATH};
use crate::errors::{ChatError, ChatResult};
use crate::models::ChatRequest;
use crate::utils::markdown_to_html;

/// Produces the raw (markdown) reply for a user prompt.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> ChatResult<String>;
}

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    generator: Arc<dyn ReplyGenerator>,
    reply_field: Arc<str>,
}

impl ServerState {
    pub fn new(generator: Arc<dyn ReplyGenerator>, reply_field: &str) -> Self {
        Self {
            generator,
            reply_field: Arc::from(reply_field),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Handler errors with their HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Reply generation failed: {0}")]
    Upstream(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ServerError::Upstream(detail) => {
                log::error!("Reply generation failed: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    "The assistant is unavailable right now".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Builds the router: `/`, `/health-check` and `POST /chat`.
pub fn chat_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route(HEALTH_CHECK_PATH, get(health_check))
        .route(CHAT_PATH, post(chat))
        .with_state(state)
}

/// Binds `addr` and serves the router until the process stops.
pub async fn serve(addr: &str, state: ServerState) -> ChatResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Chat server listening on {}", listener.local_addr()?);
    axum::serve(listener, chat_router(state))
        .await
        .map_err(ChatError::from)
}

async fn home() -> &'static str {
    "chat-widget server: POST /chat with {\"message\": \"...\"}"
}

async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_CHECK_BODY)
}

async fn chat(
    State(state): State<ServerState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, ServerError> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ServerError::BadRequest("Message must not be empty".to_string()));
    }

    log::debug!("Generating reply for {} chars", message.chars().count());
    let reply = state
        .generator
        .generate(message)
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;

    let mut body = Map::new();
    body.insert(
        state.reply_field.to_string(),
        Value::String(markdown_to_html(&reply)),
    );
    Ok(Json(Value::Object(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct FixedGenerator(ChatResult<String>);

    #[async_trait]
    impl ReplyGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> ChatResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(ChatError::generation_error(e.to_string())),
            }
        }
    }

    fn app(result: ChatResult<String>) -> Router {
        chat_router(ServerState::new(
            Arc::new(FixedGenerator(result)),
            "response",
        ))
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_reports_up() {
        let req = Request::builder()
            .uri("/health-check")
            .body(Body::empty())
            .unwrap();
        let response = app(Ok(String::new())).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], HEALTH_CHECK_BODY.as_bytes());
    }

    #[tokio::test]
    async fn chat_returns_html_under_reply_field() {
        let response = app(Ok("We have **two** stores:\n* Hanoi\n* Saigon".to_string()))
            .oneshot(post_chat(r#"{"message":"Where are you?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["response"],
            "We have <b>two</b> stores:\n<ul>\n<li>Hanoi</li>\n<li>Saigon</li>\n</ul>"
        );
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let response = app(Ok("unused".to_string()))
            .oneshot(post_chat(r#"{"message":"   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let response = app(Ok("unused".to_string()))
            .oneshot(post_chat(r#"{"text":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generator_failure_maps_to_bad_gateway() {
        let response = app(Err(ChatError::generation_error("quota exceeded")))
            .oneshot(post_chat(r#"{"message":"hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body.get("response").is_none());
    }
}
