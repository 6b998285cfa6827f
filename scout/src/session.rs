//! Session transcript for multi-turn conversations.
//!
//! A [`Transcript`] is an append-only record of user and assistant turns.
//! It is converted to chat messages and replayed ahead of each new query,
//! so follow-up questions can reference earlier answers.

use crate::message::ChatMessage;
use serde::{Deserialize, Serialize};

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    /// A user turn.
    User,
    /// An assistant turn.
    Assistant,
}

/// A single conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who produced the turn.
    pub role: EntryRole,
    /// The turn text.
    pub content: String,
}

/// Append-only conversation history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            role: EntryRole::User,
            content: content.into(),
        });
    }

    /// Append an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            role: EntryRole::Assistant,
            content: content.into(),
        });
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert the transcript to chat messages for the model.
    #[must_use]
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        self.entries
            .iter()
            .map(|entry| match entry.role {
                EntryRole::User => ChatMessage::user(&entry.content),
                EntryRole::Assistant => ChatMessage::assistant(&entry.content),
            })
            .collect()
    }
}
