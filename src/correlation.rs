//! Request/response correlation across connection epochs.
//!
//! `TransactionCorrelator` links a COMMAND_MSG to the COMMAND_DONE or
//! FUNCTION_ERROR_MSG that answers it. Transaction ids repeat after every
//! OPEN, so entries are keyed by [`TransactionKey`]. Entries stay resolved
//! after a completion so retransmitted completions still find their request;
//! they are dropped only when the conversation is cleared or the configured
//! ceiling evicts the oldest.

use std::collections::{HashMap, VecDeque};

use log::{debug, warn};

use crate::{
    config::CorrelatorConfig,
    control::{ConnectionEpoch, ControlMessage, MessageType},
};

/// Correlation key: a transaction id within one connection epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionKey {
    pub epoch: ConnectionEpoch,
    pub transaction_id: u32,
}

impl TransactionKey {
    #[must_use]
    pub const fn new(epoch: ConnectionEpoch, transaction_id: u32) -> Self {
        Self {
            epoch,
            transaction_id,
        }
    }
}

/// How a message takes part in request/response correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correlation {
    /// Opens a transaction.
    Request(TransactionKey),
    /// Answers a transaction.
    Completion(TransactionKey),
    /// Neither; notifications and connection management.
    Uncorrelated,
}

/// Messages that can be classified for correlation.
pub trait CorrelatableMessage {
    /// Role of this message in request/response correlation.
    fn correlation(&self) -> Correlation;
}

impl CorrelatableMessage for ControlMessage {
    fn correlation(&self) -> Correlation {
        let key = TransactionKey::new(self.epoch(), self.transaction_id());
        match self.message_type() {
            MessageType::Command => Correlation::Request(key),
            MessageType::CommandDone | MessageType::FunctionError => Correlation::Completion(key),
            _ => Correlation::Uncorrelated,
        }
    }
}

#[derive(Debug)]
struct PendingTransaction<R> {
    request: R,
    completion: Option<R>,
}

/// Table of outstanding and resolved transactions for one conversation.
///
/// `R` is whatever the caller uses to point back at a message, such as a
/// [`TransferId`](crate::TransferId).
///
/// # Examples
///
/// ```
/// use mbimframe::{
///     config::CorrelatorConfig,
///     control::ConnectionEpoch,
///     correlation::{TransactionCorrelator, TransactionKey},
/// };
///
/// let mut correlator = TransactionCorrelator::new(CorrelatorConfig::default());
/// let key = TransactionKey::new(ConnectionEpoch::new(1), 7);
/// assert_eq!(correlator.on_completion(key, "done"), None);
///
/// correlator.on_request(key, "request");
/// assert_eq!(correlator.on_completion(key, "done"), Some("request"));
/// ```
#[derive(Debug)]
pub struct TransactionCorrelator<R> {
    config: CorrelatorConfig,
    entries: HashMap<TransactionKey, PendingTransaction<R>>,
    order: VecDeque<TransactionKey>,
}

impl<R: Clone> TransactionCorrelator<R> {
    #[must_use]
    pub fn new(config: CorrelatorConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Record a request under `key`.
    ///
    /// Returns `false` if the key already holds a request; the first request
    /// is kept. When the table is full the oldest transaction is evicted.
    pub fn on_request(&mut self, key: TransactionKey, request: R) -> bool {
        if self.entries.contains_key(&key) {
            debug!(
                "transaction {} in epoch {} already has a request; keeping the first",
                key.transaction_id, key.epoch
            );
            return false;
        }
        if self.entries.len() >= self.config.max_pending_transactions.get() {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            PendingTransaction {
                request,
                completion: None,
            },
        );
        self.order.push_back(key);
        true
    }

    /// Resolve a completion against its request.
    ///
    /// Returns the stored request, or `None` if no request was seen for
    /// `key`. The first completion is remembered; later duplicates resolve
    /// to the same request without replacing it.
    pub fn on_completion(&mut self, key: TransactionKey, completion: R) -> Option<R> {
        let Some(entry) = self.entries.get_mut(&key) else {
            debug!(
                "completion for transaction {} in epoch {} has no recorded request",
                key.transaction_id, key.epoch
            );
            return None;
        };
        if entry.completion.is_some() {
            debug!(
                "duplicate completion for transaction {} in epoch {}",
                key.transaction_id, key.epoch
            );
        } else {
            entry.completion = Some(completion);
        }
        Some(entry.request.clone())
    }

    /// Request recorded under `key`.
    #[must_use]
    pub fn request(&self, key: &TransactionKey) -> Option<&R> {
        self.entries.get(key).map(|entry| &entry.request)
    }

    /// First completion recorded under `key`.
    #[must_use]
    pub fn completion(&self, key: &TransactionKey) -> Option<&R> {
        self.entries
            .get(key)
            .and_then(|entry| entry.completion.as_ref())
    }

    /// Number of transactions retained.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Forget every transaction.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evict_oldest(&mut self) {
        while let Some(oldest) = self.order.pop_front() {
            if self.entries.remove(&oldest).is_some() {
                warn!(
                    "transaction table full; evicted transaction {} from epoch {}",
                    oldest.transaction_id, oldest.epoch
                );
                return;
            }
        }
    }
}
