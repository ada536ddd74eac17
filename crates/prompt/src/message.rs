//! Chat message assembly.

use grounded_llm::{ChatMessage, ChatRole};
use unicode_normalization::UnicodeNormalization;

/// Builds the message list sent to the model.
///
/// The system message always stays first. New messages are inserted
/// directly after it, so the last inserted message ends up closest to the
/// system prompt. All content is NFC-normalized.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    messages: Vec<ChatMessage>,
}

impl MessageBuilder {
    /// Start a conversation with the given system content.
    pub fn new(system_content: &str) -> Self {
        Self {
            messages: vec![ChatMessage::system(normalize(system_content))],
        }
    }

    /// Insert a message right after the system message.
    pub fn insert_message(&mut self, role: ChatRole, content: &str) {
        self.insert_message_at(role, content, 1);
    }

    /// Insert a message at `index`, clamped to the end of the list.
    pub fn insert_message_at(&mut self, role: ChatRole, content: &str, index: usize) {
        let index = index.min(self.messages.len());
        self.messages
            .insert(index, ChatMessage::new(role, normalize(content)));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

fn normalize(content: &str) -> String {
    content.nfc().collect()
}
