//! Conversation state shared by every front end
//!
//! The transcript is append-only: messages are never edited or removed for
//! the lifetime of a session. Views that need a "fresh" chat panel keep an
//! ordinal marker into the transcript instead of clearing it.

use serde::{Deserialize, Serialize};

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub ordinal: u64,
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Assistant => "AI",
        }
    }
}

/// Ordered history of every message in the session
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_ordinal: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return the stored copy
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &Message {
        let message = Message {
            speaker,
            text: text.into(),
            ordinal: self.next_ordinal,
        };
        self.next_ordinal += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages whose ordinal is at least `ordinal`
    pub fn since(&self, ordinal: u64) -> &[Message] {
        let start = self.messages.partition_point(|m| m.ordinal < ordinal);
        &self.messages[start..]
    }
}
