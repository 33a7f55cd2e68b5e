use chrono::Utc;
use tracing::debug;

use murmur_types::models::{
    Conversation, ConversationDetail, Message, MessageView, Reaction, STATUS_DELIVERED, User,
};

use crate::error::{Result, StoreError};
use crate::models::ConversationEntry;
use crate::{State, Store, ids};

impl Store {
    // -- Identity --

    /// Returns the identifier bound to `name`, minting and binding a fresh
    /// one the first time the name is seen.
    pub fn login(&self, name: &str) -> Result<String> {
        self.with_write(|state| {
            if let Some(identifier) = state.names.get(name) {
                return Ok(identifier.clone());
            }

            let identifier = ids::user_id();
            state.names.insert(name.to_string(), identifier.clone());
            state.users.insert(
                identifier.clone(),
                User {
                    identifier: identifier.clone(),
                    name: name.to_string(),
                    photo: None,
                },
            );
            debug!("Created user {} for name '{}'", identifier, name);
            Ok(identifier)
        })
    }

    /// Rebinds `identifier` to `new_name`. The old name is released in the
    /// same critical section, so the name map stays a bijection.
    pub fn rename(&self, identifier: &str, new_name: &str) -> Result<()> {
        self.with_write(|state| {
            if let Some(owner) = state.names.get(new_name) {
                if owner != identifier {
                    return Err(StoreError::Conflict(new_name.to_string()));
                }
            }

            let user = state
                .users
                .get_mut(identifier)
                .ok_or(StoreError::NotFound("user"))?;
            let old_name = std::mem::replace(&mut user.name, new_name.to_string());

            if state.names.get(&old_name).is_some_and(|owner| owner == identifier) {
                state.names.remove(&old_name);
            }
            state
                .names
                .insert(new_name.to_string(), identifier.to_string());

            debug!("User {} renamed '{}' -> '{}'", identifier, old_name, new_name);
            Ok(())
        })
    }

    pub fn set_user_photo(&self, identifier: &str, url: &str) -> Result<()> {
        self.with_write(|state| {
            let user = state
                .users
                .get_mut(identifier)
                .ok_or(StoreError::NotFound("user"))?;
            user.photo = Some(url.to_string());
            Ok(())
        })
    }

    pub fn user(&self, identifier: &str) -> Result<Option<User>> {
        self.with_read(|state| Ok(state.users.get(identifier).cloned()))
    }

    // -- Conversations --

    /// Creates the conversation with `seed` as participants if it does not
    /// exist. Without a seed an absent conversation is NotFound.
    pub fn ensure_conversation(&self, conversation_id: &str, seed: &[&str]) -> Result<Conversation> {
        self.with_write(|state| {
            if seed.is_empty() && !state.conversations.contains_key(conversation_id) {
                return Err(StoreError::NotFound("conversation"));
            }
            Ok(state.ensure_conversation(conversation_id, seed).summary.clone())
        })
    }

    /// Summaries of every conversation `user_id` participates in, oldest first.
    pub fn conversations_for(&self, user_id: &str) -> Result<Vec<Conversation>> {
        self.with_read(|state| {
            Ok(state
                .conversation_order
                .iter()
                .filter_map(|id| state.conversations.get(id))
                .filter(|entry| entry.summary.has_participant(user_id))
                .map(|entry| entry.summary.clone())
                .collect())
        })
    }

    /// Full conversation with its log. Absent and not-a-participant produce
    /// the same error.
    pub fn conversation(&self, conversation_id: &str, user_id: &str) -> Result<ConversationDetail> {
        self.with_read(|state| {
            let entry = state
                .conversations
                .get(conversation_id)
                .filter(|entry| entry.summary.has_participant(user_id))
                .ok_or(StoreError::NotFound("conversation"))?;

            let messages = entry
                .messages
                .iter()
                .map(|message| MessageView {
                    message: message.clone(),
                    reactions: state.reactions_of(&message.id),
                })
                .collect();

            Ok(ConversationDetail {
                conversation: entry.summary.clone(),
                messages,
            })
        })
    }

    pub fn add_participant(&self, conversation_id: &str, actor: &str, member: &str) -> Result<()> {
        self.with_write(|state| {
            if state.ensure_conversation(conversation_id, &[actor]).join(member) {
                debug!("User {} added to conversation {}", member, conversation_id);
            }
            Ok(())
        })
    }

    /// Never fails on absent conversation or membership. Returns whether the
    /// conversation exists.
    pub fn remove_participant(&self, conversation_id: &str, user_id: &str) -> Result<bool> {
        self.with_write(|state| {
            let Some(entry) = state.conversations.get_mut(conversation_id) else {
                return Ok(false);
            };
            if entry.leave(user_id) {
                debug!("User {} left conversation {}", user_id, conversation_id);
            }
            Ok(true)
        })
    }

    pub fn set_conversation_name(&self, conversation_id: &str, actor: &str, name: &str) -> Result<()> {
        self.with_write(|state| {
            state.ensure_conversation(conversation_id, &[actor]).summary.name = Some(name.to_string());
            Ok(())
        })
    }

    pub fn set_conversation_photo(&self, conversation_id: &str, actor: &str, url: &str) -> Result<()> {
        self.with_write(|state| {
            state.ensure_conversation(conversation_id, &[actor]).summary.photo = Some(url.to_string());
            Ok(())
        })
    }

    // -- Messages --

    pub fn send_message(
        &self,
        conversation_id: &str,
        sender: &str,
        content: &str,
        kind: &str,
    ) -> Result<Message> {
        self.with_write(|state| {
            Ok(state.append_message(conversation_id, sender, content.to_string(), kind.to_string()))
        })
    }

    /// Copies content and type of `message_id` into `destination` as a new
    /// message sent by `forwarder`. The source is left untouched.
    pub fn forward_message(&self, message_id: &str, destination: &str, forwarder: &str) -> Result<Message> {
        self.with_write(|state| {
            let source = state
                .find_message(message_id)
                .ok_or(StoreError::NotFound("message"))?;
            let (content, kind) = (source.content.clone(), source.kind.clone());
            Ok(state.append_message(destination, forwarder, content, kind))
        })
    }

    /// Any holder of a valid session may delete any message. The owning
    /// conversation's summary is left as it was.
    pub fn delete_message(&self, message_id: &str) -> Result<()> {
        self.with_write(|state| {
            let conversation_id = state
                .message_index
                .remove(message_id)
                .ok_or(StoreError::NotFound("message"))?;

            if let Some(entry) = state.conversations.get_mut(&conversation_id) {
                entry.messages.retain(|m| m.id != message_id);
            }
            state.reactions.remove(message_id);

            debug!("Deleted message {} from conversation {}", message_id, conversation_id);
            Ok(())
        })
    }

    #[cfg(test)]
    pub(crate) fn message(&self, message_id: &str) -> Result<Message> {
        self.with_read(|state| {
            state
                .find_message(message_id)
                .cloned()
                .ok_or(StoreError::NotFound("message"))
        })
    }

    // -- Reactions --

    /// Reactions are not deduplicated: the same user may add the same value
    /// any number of times.
    pub fn add_reaction(&self, message_id: &str, value: &str) -> Result<Reaction> {
        self.with_write(|state| {
            if !state.message_index.contains_key(message_id) {
                return Err(StoreError::NotFound("message"));
            }

            let reactions = state.reactions.entry(message_id.to_string()).or_default();
            let id = loop {
                let candidate = ids::reaction_id();
                if !reactions.iter().any(|r| r.id == candidate) {
                    break candidate;
                }
            };

            let reaction = Reaction {
                id,
                message_id: message_id.to_string(),
                reaction: value.to_string(),
            };
            reactions.push(reaction.clone());
            Ok(reaction)
        })
    }

    pub fn remove_reaction(&self, message_id: &str, reaction_id: &str) -> Result<()> {
        self.with_write(|state| {
            let reactions = state
                .reactions
                .get_mut(message_id)
                .ok_or(StoreError::NotFound("reaction"))?;
            let position = reactions
                .iter()
                .position(|r| r.id == reaction_id)
                .ok_or(StoreError::NotFound("reaction"))?;
            reactions.remove(position);
            Ok(())
        })
    }

    pub fn reactions(&self, message_id: &str) -> Result<Vec<Reaction>> {
        self.with_read(|state| {
            if !state.message_index.contains_key(message_id) {
                return Err(StoreError::NotFound("message"));
            }
            Ok(state.reactions_of(message_id))
        })
    }
}

impl State {
    fn ensure_conversation(&mut self, conversation_id: &str, seed: &[&str]) -> &mut ConversationEntry {
        let order = &mut self.conversation_order;
        self.conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| {
                debug!("Created conversation {} with participants {:?}", conversation_id, seed);
                order.push(conversation_id.to_string());
                ConversationEntry::new(conversation_id, seed)
            })
    }

    fn find_message(&self, message_id: &str) -> Option<&Message> {
        let conversation_id = self.message_index.get(message_id)?;
        self.conversations
            .get(conversation_id)?
            .messages
            .iter()
            .find(|m| m.id == message_id)
    }

    /// Reactions in insertion order; empty when none or the message is gone.
    fn reactions_of(&self, message_id: &str) -> Vec<Reaction> {
        self.reactions.get(message_id).cloned().unwrap_or_default()
    }

    fn fresh_message_id(&self) -> String {
        loop {
            let candidate = ids::message_id();
            if !self.message_index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Shared tail of send and forward: the author joins the conversation,
    /// the message is appended and indexed, and the summary follows it.
    fn append_message(
        &mut self,
        conversation_id: &str,
        sender: &str,
        content: String,
        kind: String,
    ) -> Message {
        let message = Message {
            id: self.fresh_message_id(),
            conversation_id: conversation_id.to_string(),
            sender: sender.to_string(),
            content,
            kind,
            status: STATUS_DELIVERED.to_string(),
            timestamp: Utc::now(),
        };

        let entry = self.ensure_conversation(conversation_id, &[sender]);
        entry.join(sender);
        entry.append(message.clone());
        self.message_index
            .insert(message.id.clone(), conversation_id.to_string());

        message
    }
}
