// src/view.rs

use crate::models::Message;
use crate::transcript::{NodeId, Transcript};

/// The surface a chat controller drives: a transcript container, a text
/// input and a submit control.
pub trait ChatView: Send {
    fn append_message(&mut self, message: Message) -> NodeId;
    fn remove_message(&mut self, id: NodeId) -> bool;
    fn temporary_messages(&self) -> Vec<NodeId>;
    fn scroll_to_bottom(&mut self);

    fn input_value(&self) -> String;
    fn set_input_value(&mut self, value: &str);
    fn is_input_enabled(&self) -> bool;
    fn set_input_enabled(&mut self, enabled: bool);
    fn focus_input(&mut self);

    fn set_submit_enabled(&mut self, enabled: bool);
}

/// Headless view backed by plain fields.
#[derive(Debug)]
pub struct MemoryView {
    pub transcript: Transcript,
    pub input: String,
    pub input_enabled: bool,
    pub submit_enabled: bool,
    pub focused: bool,
    pub scrolls: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            input_enabled: true,
            submit_enabled: false,
            focused: false,
            scrolls: 0,
        }
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for MemoryView {
    fn append_message(&mut self, message: Message) -> NodeId {
        self.transcript.append(message)
    }

    fn remove_message(&mut self, id: NodeId) -> bool {
        self.transcript.remove(id)
    }

    fn temporary_messages(&self) -> Vec<NodeId> {
        self.transcript.temporary_ids()
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }

    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.input = value.to_string();
    }

    fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
        if !enabled {
            self.focused = false;
        }
    }

    fn focus_input(&mut self) {
        self.focused = true;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }
}
