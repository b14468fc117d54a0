// src/transcript.rs

use crate::models::{Message, Sender};

/// Opaque handle to an entry in the transcript, the analogue of a DOM node
/// reference. Handles are never reused within one transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// Ordered conversation container. Entries keep insertion order; temporary
/// entries are retracted, never edited in place.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<(NodeId, Message)>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, message));
        id
    }

    /// Removes the entry behind `id`. Returns false when it is already gone.
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.entries.iter().position(|(node, _)| *node == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn temporary_ids(&self) -> Vec<NodeId> {
        self.entries
            .iter()
            .filter(|(_, msg)| msg.temporary)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().map(|(_, msg)| msg)
    }

    pub fn from_sender(&self, sender: Sender) -> Vec<&Message> {
        self.messages().filter(|m| m.sender == sender).collect()
    }

    pub fn temporary_count(&self) -> usize {
        self.messages().filter(|m| m.temporary).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
