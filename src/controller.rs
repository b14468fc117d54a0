// src/controller.rs

use crate::api::{extract_reply, ChatTransport};
use crate::config::Config;
use crate::models::Message;
use crate::utils::{format_reply, html_to_text};
use crate::view::ChatView;
use log::{debug, warn};
use tokio::sync::mpsc;

/// Events a front-end forwards to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The input text changed.
    Input,
    /// The form was submitted.
    Submit,
    /// A quick-reply trigger fired with its message.
    QuickReply(String),
    Shutdown,
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or a request was already in flight.
    Ignored,
    Replied,
    /// The server answered without a usable reply field.
    Fallback,
    ConnectionError,
}

/// Fixed strings shown in the transcript.
#[derive(Debug, Clone)]
pub struct WidgetTexts {
    pub pending: String,
    pub fallback: String,
    pub connection_error: String,
}

impl From<&Config> for WidgetTexts {
    fn from(config: &Config) -> Self {
        Self {
            pending: config.pending_text.clone(),
            fallback: config.fallback_text.clone(),
            connection_error: config.connection_error_text.clone(),
        }
    }
}

/// Owns the view and the transport for one session and applies every
/// input, submit and quick-reply event to them.
pub struct ChatController<V, T> {
    view: V,
    transport: T,
    reply_field: String,
    texts: WidgetTexts,
}

impl<V: ChatView, T: ChatTransport> ChatController<V, T> {
    pub fn new(view: V, transport: T, config: &Config) -> Self {
        let mut controller = Self {
            view,
            transport,
            reply_field: config.reply_field.clone(),
            texts: WidgetTexts::from(config),
        };
        controller.on_input();
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Enables the submit control iff the trimmed input is non-empty.
    pub fn on_input(&mut self) {
        let has_text = !self.view.input_value().trim().is_empty();
        self.view.set_submit_enabled(has_text);
    }

    /// Sends the current input and renders the outcome. The view is back to
    /// an enabled, focused input whenever this returns.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.view.is_input_enabled() {
            debug!("Submit ignored while a request is in flight");
            return SubmitOutcome::Ignored;
        }

        let user_message = self.view.input_value().trim().to_string();
        if user_message.is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.append(Message::user(user_message.as_str()));
        self.view.set_input_value("");
        self.on_input();
        self.view.set_input_enabled(false);
        self.append(Message::pending(self.texts.pending.as_str()));

        let outcome = match self.transport.send(&user_message).await {
            Ok(body) => match extract_reply(&body, &self.reply_field) {
                Some(reply) => {
                    self.clear_temporary();
                    let markup = format_reply(&reply);
                    self.append(Message::bot(html_to_text(&markup)).with_markup(markup));
                    SubmitOutcome::Replied
                }
                None => {
                    warn!("Response has no usable '{}' field", self.reply_field);
                    self.clear_temporary();
                    self.append(Message::bot(self.texts.fallback.as_str()));
                    SubmitOutcome::Fallback
                }
            },
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.clear_temporary();
                self.append(Message::bot(self.texts.connection_error.as_str()));
                SubmitOutcome::ConnectionError
            }
        };

        self.view.set_input_enabled(true);
        self.view.focus_input();
        outcome
    }

    /// Fills the input with a quick reply's message and submits it.
    pub async fn quick_reply(&mut self, message: &str) -> SubmitOutcome {
        if !self.view.is_input_enabled() {
            return SubmitOutcome::Ignored;
        }
        self.view.set_input_value(message);
        self.on_input();
        self.submit().await
    }

    /// Processes events one at a time until `Shutdown` or the sender closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> Self {
        while let Some(event) = events.recv().await {
            match event {
                UiEvent::Input => self.on_input(),
                UiEvent::Submit => {
                    let outcome = self.submit().await;
                    debug!("Submit finished: {:?}", outcome);
                }
                UiEvent::QuickReply(message) => {
                    let outcome = self.quick_reply(&message).await;
                    debug!("Quick reply finished: {:?}", outcome);
                }
                UiEvent::Shutdown => break,
            }
        }
        self
    }

    fn append(&mut self, message: Message) {
        self.view.append_message(message);
        self.view.scroll_to_bottom();
    }

    fn clear_temporary(&mut self) {
        for id in self.view.temporary_messages() {
            self.view.remove_message(id);
        }
    }
}
