use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in the panel's chat log.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

/// Ordered, bounded chat log. The cap is twice the number of visible lines so
/// a repaint always has enough history to fill the message area.
#[derive(Debug)]
pub struct MessageLog {
    messages: Vec<Message>,
    max_visible: usize,
}

impl MessageLog {
    pub fn new(max_visible: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_visible,
        }
    }

    /// Appends a message, trimming the oldest entries past the cap.
    /// Empty or whitespace-only text is rejected.
    pub fn push(&mut self, text: &str, sender: Sender) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.messages.push(Message {
            text: text.to_string(),
            sender,
            created_at: Utc::now(),
        });
        let cap = self.cap();
        if self.messages.len() > cap {
            let overflow = self.messages.len() - cap;
            self.messages.drain(0..overflow);
        }
        true
    }

    pub fn cap(&self) -> usize {
        self.max_visible * 2
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// The most recent `n` messages in insertion order.
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}
