// Widget Constants
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/chat";
pub const DEFAULT_REPLY_FIELD: &str = "response";
pub const PENDING_TEXT: &str = "Answering...";
pub const FALLBACK_TEXT: &str = "Could not read a reply from the bot.";
pub const CONNECTION_ERROR_TEXT: &str = "Could not connect to the server.";

// Server Constants
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const CHAT_PATH: &str = "/chat";
pub const HEALTH_CHECK_PATH: &str = "/health-check";
pub const HEALTH_CHECK_BODY: &str = "Server is UP";
pub const DEFAULT_CORPUS_PATH: &str = "corpus";

// Gemini Constants
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

// Terminal Constants
pub const LOG_FILE: &str = "chat-widget.log";
