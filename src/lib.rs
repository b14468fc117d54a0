// src/lib.rs

pub mod api;
pub mod config;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod gemini;
pub mod key_handlers;
pub mod logging;
pub mod models;
pub mod server;
pub mod status_indicator;
pub mod transcript;
pub mod ui;
pub mod utils;
pub mod view;

pub use controller::{ChatController, SubmitOutcome, UiEvent};
pub use errors::{ChatError, ChatResult};
pub use view::{ChatView, MemoryView};
