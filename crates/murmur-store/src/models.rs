use chrono::Utc;

use murmur_types::models::{Conversation, Message};

/// Storage-side conversation record: the public summary plus the owned log.
/// Distinct from the murmur-types wire models so the log never leaks into
/// listings.
pub(crate) struct ConversationEntry {
    pub summary: Conversation,
    pub messages: Vec<Message>,
}

impl ConversationEntry {
    pub fn new(id: &str, seed: &[&str]) -> Self {
        let mut entry = Self {
            summary: Conversation {
                id: id.to_string(),
                participants: Vec::with_capacity(seed.len()),
                last_message: String::new(),
                timestamp: Utc::now(),
                name: None,
                photo: None,
            },
            messages: Vec::new(),
        };
        for user_id in seed {
            entry.join(user_id);
        }
        entry
    }

    /// Set-insert; returns false if the user was already a participant.
    pub fn join(&mut self, user_id: &str) -> bool {
        if self.summary.has_participant(user_id) {
            return false;
        }
        self.summary.participants.push(user_id.to_string());
        true
    }

    /// Set-remove; returns false if the user was not a participant.
    pub fn leave(&mut self, user_id: &str) -> bool {
        let before = self.summary.participants.len();
        self.summary.participants.retain(|p| p != user_id);
        self.summary.participants.len() != before
    }

    pub fn append(&mut self, message: Message) {
        self.summary.last_message = message.content.clone();
        self.summary.timestamp = message.timestamp;
        self.messages.push(message);
    }
}
