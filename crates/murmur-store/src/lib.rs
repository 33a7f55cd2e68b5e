pub mod error;
pub mod ids;
mod models;
pub mod registry;

use std::collections::HashMap;
use std::sync::RwLock;

use murmur_types::models::{Reaction, User};

pub use error::{Result, StoreError};

use models::ConversationEntry;

/// In-memory conversation store. Lives from process start to shutdown;
/// nothing is persisted.
#[derive(Default)]
pub struct Store {
    state: RwLock<State>,
}

#[derive(Default)]
pub(crate) struct State {
    /// identifier -> user
    pub(crate) users: HashMap<String, User>,
    /// display name -> identifier
    pub(crate) names: HashMap<String, String>,
    pub(crate) conversations: HashMap<String, ConversationEntry>,
    /// Conversation ids in creation order, for stable listings.
    pub(crate) conversation_order: Vec<String>,
    /// message id -> owning conversation id
    pub(crate) message_index: HashMap<String, String>,
    /// message id -> reactions in insertion order
    pub(crate) reactions: HashMap<String, Vec<Reaction>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&State) -> Result<T>,
    {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        f(&state)
    }

    /// Every mutation runs entirely under the write lock, so readers never
    /// observe a half-applied change.
    pub(crate) fn with_write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut State) -> Result<T>,
    {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut state)
    }
}
