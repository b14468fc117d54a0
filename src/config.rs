use crate::constants::*;
use crate::errors::{ChatError, ChatResult};
use crate::models::QuickReply;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Widget
    pub endpoint: String,
    pub reply_field: String,
    pub request_timeout_secs: Option<u64>,
    pub pending_text: String,
    pub fallback_text: String,
    pub connection_error_text: String,
    pub quick_replies: Vec<QuickReply>,

    // Server
    pub bind_addr: String,
    pub corpus_path: String,
    pub gemini_base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,

    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reply_field: DEFAULT_REPLY_FIELD.to_string(),
            request_timeout_secs: None,
            pending_text: PENDING_TEXT.to_string(),
            fallback_text: FALLBACK_TEXT.to_string(),
            connection_error_text: CONNECTION_ERROR_TEXT.to_string(),
            quick_replies: vec![
                QuickReply {
                    label: "Opening hours".to_string(),
                    message: "What are your opening hours?".to_string(),
                },
                QuickReply {
                    label: "Warranty".to_string(),
                    message: "How does the warranty work?".to_string(),
                },
                QuickReply {
                    label: "Shipping".to_string(),
                    message: "How long does shipping take?".to_string(),
                },
            ],
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            corpus_path: DEFAULT_CORPUS_PATH.to_string(),
            gemini_base_url: GEMINI_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            log_level: "info".to_string(),
        }
    }
}

/// Where the configuration came from. Callers log it once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    Loaded(PathBuf),
    /// No file existed; the defaults were written here.
    Created(PathBuf),
}

/// Loads the configuration from `~/.config/chat-widget/config.json`,
/// writing the defaults there on first run, then applies `.env` and
/// environment overrides.
pub fn initialize_config() -> ChatResult<(Config, ConfigOrigin)> {
    dotenv::dotenv().ok();
    let config_path = get_config_path()?;
    let (mut config, origin) = load_or_create(&config_path)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok((config, origin))
}

fn load_or_create(config_path: &Path) -> ChatResult<(Config, ConfigOrigin)> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path)
            .map_err(|e| ChatError::config_error(format!("Failed to read config file: {}", e)))?;

        let config = serde_json::from_str(&config_str)
            .map_err(|e| ChatError::config_error(format!("Failed to parse config: {}", e)))?;
        return Ok((config, ConfigOrigin::Loaded(config_path.to_path_buf())));
    }

    let config = Config::default();
    save_config(config_path, &config)?;
    Ok((config, ConfigOrigin::Created(config_path.to_path_buf())))
}

fn get_config_path() -> ChatResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ChatError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("chat-widget").join("config.json"))
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(key) = env::var("GEMINI_API_KEY") {
        config.api_key = key;
    }
    if let Ok(endpoint) = env::var("CHAT_ENDPOINT") {
        config.endpoint = endpoint;
    }
    if let Ok(addr) = env::var("CHAT_BIND_ADDR") {
        config.bind_addr = addr;
    }
}

pub fn validate_config(config: &Config) -> ChatResult<()> {
    if config.endpoint.trim().is_empty() {
        return Err(ChatError::config_error("Chat endpoint is required"));
    }
    reqwest::Url::parse(&config.endpoint)
        .map_err(|e| ChatError::config_error(format!("Invalid chat endpoint: {}", e)))?;

    if config.reply_field.trim().is_empty() {
        return Err(ChatError::config_error("Reply field name is required"));
    }

    if config.model.is_empty() {
        return Err(ChatError::config_error("Model name is required"));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ChatError::config_error("Temperature must be between 0.0 and 2.0"));
    }

    if !(0.0..=1.0).contains(&config.top_p) {
        return Err(ChatError::config_error("top_p must be between 0.0 and 1.0"));
    }

    if config.top_k == 0 {
        return Err(ChatError::config_error("top_k must be greater than 0"));
    }

    if config.max_output_tokens == 0 {
        return Err(ChatError::config_error("max_output_tokens must be greater than 0"));
    }

    Ok(())
}

/// Validates and writes `config` to `config_path`.
pub fn save_config(config_path: &Path, config: &Config) -> ChatResult<()> {
    validate_config(config)?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ChatError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| ChatError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(config_path, config_str)
        .map_err(|e| ChatError::config_error(format!("Failed to write config file: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_endpoint() {
        let mut config = Config::default();
        config.endpoint = "not a url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_empty_reply_field() {
        let mut config = Config::default();
        config.reply_field = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_temperature() {
        let mut config = Config::default();
        config.temperature = 2.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_top_p() {
        let mut config = Config::default();
        config.top_p = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let (config, origin) = load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(origin, ConfigOrigin::Created(path.clone()));
        assert_eq!(config.reply_field, DEFAULT_REPLY_FIELD);

        let (reloaded, origin) = load_or_create(&path).unwrap();
        assert_eq!(origin, ConfigOrigin::Loaded(path.clone()));
        assert_eq!(reloaded.endpoint, config.endpoint);
        assert_eq!(reloaded.quick_replies, config.quick_replies);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "reply_field": "bot_response" }"#).unwrap();

        let (config, _) = load_or_create(&path).unwrap();
        assert_eq!(config.reply_field, "bot_response");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_or_create(&path), Err(ChatError::Config(_))));
    }
}
