// src/gemini.rs

use crate::{
    config::Config,
    errors::{ChatError, ChatResult},
    logging::log_api_call,
    models::ApiCallLog,
    server::ReplyGenerator,
    utils::detect_mime_type,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs, path::Path, time::Instant};

/// A reference document sent along with every prompt.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Sampling parameters forwarded as `generationConfig`.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl From<&Config> for GenerationConfig {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Loads every supported file directly inside `corpus_dir`, sorted by name.
/// A missing directory yields an empty corpus.
pub fn load_corpus(corpus_dir: &Path) -> ChatResult<Vec<CorpusDocument>> {
    if !corpus_dir.is_dir() {
        log::warn!(
            "Corpus directory {} not found; answering without documents",
            corpus_dir.display()
        );
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(corpus_dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let name = path.to_string_lossy().to_string();
        let Some(mime_type) = detect_mime_type(&name) else {
            log::debug!("Skipping unsupported corpus file {}", name);
            continue;
        };
        let data = fs::read(&path)
            .map_err(|e| ChatError::corpus_error(format!("Failed to read {}: {}", name, e)))?;
        log::info!("Loaded corpus document {} ({} bytes)", name, data.len());
        documents.push(CorpusDocument {
            name,
            mime_type,
            data,
        });
    }

    Ok(documents)
}

/// Answers prompts with Gemini `generateContent`, grounding every request on
/// the loaded corpus.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    generation: GenerationConfig,
    corpus: Vec<CorpusDocument>,
}

impl GeminiClient {
    pub fn new(config: &Config, corpus: Vec<CorpusDocument>) -> ChatResult<Self> {
        if config.api_key.is_empty() {
            return Err(ChatError::config_error(
                "GEMINI_API_KEY is required to run the server",
            ));
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            generation: GenerationConfig::from(config),
            corpus,
        })
    }

    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_payload(&self, prompt: &str) -> Value {
        let mut parts: Vec<Value> = self
            .corpus
            .iter()
            .map(|doc| {
                json!({
                    "inline_data": {
                        "mime_type": doc.mime_type,
                        "data": STANDARD.encode(&doc.data),
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": prompt }));

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": self.generation.temperature,
                "topP": self.generation.top_p,
                "topK": self.generation.top_k,
                "maxOutputTokens": self.generation.max_output_tokens,
            }
        })
    }
}

#[async_trait]
impl ReplyGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> ChatResult<String> {
        let endpoint = self.endpoint();
        let start_time = Instant::now();

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_payload(prompt))
            .send()
            .await
            .map_err(|e| ChatError::api_error(format!("Request failed: {}", e)))?;

        let status = response.status();
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: endpoint.clone(),
            request_summary: format!("generateContent with {} documents", self.corpus.len()),
            response_status: status.as_u16(),
            response_time_ms: start_time.elapsed().as_millis(),
        });

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::api_error(format!(
                "API returned error: {} - {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChatError::api_error(format!("Failed to parse API response: {}", e)))?;

        extract_text(&body)
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(body: &Value) -> ChatResult<String> {
    if let Some(error) = body["error"].as_object() {
        return Err(ChatError::generation_error(format!(
            "{}: {}",
            error.get("status").and_then(Value::as_str).unwrap_or("UNKNOWN"),
            error.get("message").and_then(Value::as_str).unwrap_or("no message")
        )));
    }

    let text: String = body["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = body["candidates"][0]["finishReason"]
            .as_str()
            .unwrap_or("no candidates");
        return Err(ChatError::generation_error(format!(
            "Response contained no text ({})",
            reason
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_config(base_url: &str) -> Config {
        Config {
            api_key: "test-api-key".to_string(),
            gemini_base_url: base_url.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_load_corpus_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b_faq.txt"), "Opening hours: 9-17").unwrap();
        fs::write(dir.path().join("a_manual.pdf"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("logo.png"), b"png").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let docs = load_corpus(dir.path()).unwrap();
        let mimes: Vec<&str> = docs.iter().map(|d| d.mime_type).collect();
        assert_eq!(mimes, vec!["application/pdf", "text/plain"]);
        assert_eq!(docs[1].data, b"Opening hours: 9-17");
    }

    #[test]
    fn test_missing_corpus_is_empty() {
        let dir = tempdir().unwrap();
        let docs = load_corpus(&dir.path().join("absent")).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = Config::default();
        assert!(matches!(
            GeminiClient::new(&config, Vec::new()),
            Err(ChatError::Config(_))
        ));
    }

    #[test]
    fn test_payload_puts_documents_before_prompt() {
        let client = GeminiClient::new(
            &test_config("http://localhost"),
            vec![CorpusDocument {
                name: "faq.txt".to_string(),
                mime_type: "text/plain",
                data: b"hi".to_vec(),
            }],
        )
        .unwrap();

        let payload = client.build_payload("Where is the shop?");
        let parts = payload["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inline_data"]["mime_type"], "text/plain");
        assert_eq!(parts[0]["inline_data"]["data"], "aGk=");
        assert_eq!(parts[1]["text"], "Where is the shop?");
        assert_eq!(payload["generationConfig"]["topK"], 40);
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-lite:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "We open " }, { "text": "at 9." }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GeminiClient::new(&test_config(&mock_server.uri()), Vec::new()).unwrap();
        let reply = client.generate("When do you open?").await.unwrap();

        assert_eq!(reply, "We open at 9.");
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&mock_server)
            .await;

        let client = GeminiClient::new(&test_config(&mock_server.uri()), Vec::new()).unwrap();
        let err = client.generate("hi").await.unwrap_err();

        assert!(matches!(err, ChatError::Api(ref msg) if msg.contains("429")));
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let err = extract_text(&json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_text_reports_embedded_error() {
        let err = extract_text(&json!({
            "error": { "status": "INVALID_ARGUMENT", "message": "bad model" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("INVALID_ARGUMENT"));
    }
}
