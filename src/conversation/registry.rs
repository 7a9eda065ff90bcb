//! Registry of conversations decoded side by side.
//!
//! `ConversationRegistry` shards conversation state by [`ConversationId`].
//! Each conversation is mutated only while its map entry is held, so
//! transfers for different conversations may be submitted from different
//! threads while transfers for one conversation are serialised.

use dashmap::DashMap;
use derive_more::{Display, From, Into};

use super::{Conversation, ConversationEvent};
use crate::{config::DecoderConfig, control::MessageType, error::Result, transfer::RawTransfer};

/// Identifier assigned to a conversation by the caller, such as a device
/// address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("ConversationId({_0})")]
pub struct ConversationId(u64);

impl ConversationId {
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    #[must_use]
    pub const fn as_u64(&self) -> u64 { self.0 }
}

/// Concurrent map of conversations keyed by [`ConversationId`].
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    config: DecoderConfig,
    conversations: DashMap<ConversationId, Conversation>,
}

impl ConversationRegistry {
    /// Create a registry whose conversations use `config`.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            conversations: DashMap::new(),
        }
    }

    /// Decode `transfer` within conversation `id`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`Conversation::submit`] errors.
    pub fn submit(&self, id: ConversationId, transfer: &RawTransfer<'_>) -> Result<ConversationEvent> {
        let mut conversation = self.conversations.entry(id).or_insert_with(|| {
            tracing::debug!(conversation = %id, "conversation started");
            Conversation::new(self.config)
        });
        let event = conversation.submit(transfer)?;
        if let ConversationEvent::Control(decoded) = &event {
            if decoded.message.message_type() == MessageType::Open {
                tracing::debug!(
                    conversation = %id,
                    epoch = decoded.message.epoch().get(),
                    "connection opened"
                );
            }
        }
        Ok(event)
    }

    /// Run `f` against conversation `id`, if it exists.
    pub fn with<R>(&self, id: ConversationId, f: impl FnOnce(&Conversation) -> R) -> Option<R> {
        self.conversations.get(&id).map(|entry| f(entry.value()))
    }

    /// Discard conversation `id` and everything pending in it.
    pub fn discard(&self, id: ConversationId) -> bool {
        let removed = self.conversations.remove(&id).is_some();
        if removed {
            tracing::debug!(conversation = %id, "conversation discarded");
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, id: ConversationId) -> bool { self.conversations.contains_key(&id) }

    #[must_use]
    pub fn len(&self) -> usize { self.conversations.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.conversations.is_empty() }

    /// Identifiers of the live conversations, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<ConversationId> {
        self.conversations.iter().map(|entry| *entry.key()).collect()
    }
}
