//! Stateful reassembly of fragmented control messages.
//!
//! [`Reassembler`] collects fragment payloads keyed by transaction id. It
//! tracks which fragment indices have been filled rather than counting
//! arrivals, so duplicates overwrite in place and fragments may arrive in
//! any order. Memory is bounded per message, per conversation, and by the
//! number of partial messages; the oldest partial message is evicted when
//! the count ceiling is reached.

use std::{
    collections::{BTreeMap, HashMap},
    num::NonZeroUsize,
};

use bytes::{Bytes, BytesMut};
use log::{debug, warn};

use super::{ControlHeader, FragmentHeader, FramerError, MessageType};
use crate::config::FramerConfig;

#[derive(Debug)]
struct PendingReassembly {
    message_type: MessageType,
    total: u32,
    fragments: BTreeMap<u32, Bytes>,
    buffered: usize,
    first_out_of_order: bool,
    started: u64,
}

impl PendingReassembly {
    fn new(message_type: MessageType, total: u32, started: u64) -> Self {
        Self {
            message_type,
            total,
            fragments: BTreeMap::new(),
            buffered: 0,
            first_out_of_order: false,
            started,
        }
    }

    fn is_complete(&self) -> bool {
        usize::try_from(self.total).is_ok_and(|total| total == self.fragments.len())
    }

    fn into_body(self) -> ReassembledBody {
        let mut body = BytesMut::with_capacity(self.buffered);
        for chunk in self.fragments.values() {
            body.extend_from_slice(chunk);
        }
        ReassembledBody {
            body: body.freeze(),
            fragments: self.total,
            reordered: self.first_out_of_order,
        }
    }
}

/// Body of a message whose fragment set is complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledBody {
    /// Fragment payloads concatenated in index order.
    pub body: Bytes,
    /// Number of fragments the message spanned.
    pub fragments: u32,
    /// Whether fragment 0 arrived after a later fragment.
    pub reordered: bool,
}

/// Fragment reassembly state for one conversation.
#[derive(Debug)]
pub struct Reassembler {
    config: FramerConfig,
    pending: HashMap<u32, PendingReassembly>,
    buffered: usize,
    next_sequence: u64,
}

impl Reassembler {
    #[must_use]
    pub fn new(config: FramerConfig) -> Self {
        Self {
            config,
            pending: HashMap::new(),
            buffered: 0,
            next_sequence: 0,
        }
    }

    /// Feed one fragment's payload.
    ///
    /// Returns `Ok(Some(_))` when the fragment fills the last missing index,
    /// `Ok(None)` while fragments are outstanding.
    ///
    /// # Errors
    ///
    /// Returns a [`FramerError`] when the fragment header is inconsistent
    /// with itself or with the pending set, or when accepting it would break
    /// a configured ceiling. The pending set is left as it was.
    pub fn push(
        &mut self,
        header: &ControlHeader,
        fragment: FragmentHeader,
        payload: &[u8],
    ) -> Result<Option<ReassembledBody>, FramerError> {
        let transaction_id = header.transaction_id;
        self.validate(transaction_id, fragment)?;
        let limit = self.config.max_message_size;

        if fragment.total_fragments == 1 {
            check_size_limit(limit, transaction_id, 0, payload.len())?;
            return Ok(Some(ReassembledBody {
                body: Bytes::copy_from_slice(payload),
                fragments: 1,
                reordered: false,
            }));
        }

        let current = fragment.current_fragment;
        let (replaced, accumulated) = match self.pending.get(&transaction_id) {
            Some(partial) => {
                if partial.total != fragment.total_fragments
                    || partial.message_type != header.message_type
                {
                    return Err(FramerError::InconsistentFragment {
                        transaction_id,
                        expected_type: partial.message_type,
                        found_type: header.message_type,
                        expected_total: partial.total,
                        found_total: fragment.total_fragments,
                    });
                }
                let replaced = partial.fragments.get(&current).map_or(0, Bytes::len);
                (replaced, Some(partial.buffered))
            }
            None => (0, None),
        };

        check_size_limit(
            limit,
            transaction_id,
            accumulated.unwrap_or(0) - replaced,
            payload.len(),
        )?;

        let evicted = if accumulated.is_none()
            && self.pending.len() >= self.config.max_pending_messages.get()
        {
            self.oldest_pending()
        } else {
            None
        };
        let freed = evicted.map_or(0, |(_, buffered)| buffered);

        let attempted = (self.buffered - replaced - freed).saturating_add(payload.len());
        if attempted > self.config.max_pending_bytes.get() {
            return Err(FramerError::PendingBudgetExceeded {
                transaction_id,
                attempted,
                limit: self.config.max_pending_bytes,
            });
        }
        if let Some((oldest, _)) = evicted {
            self.evict(oldest);
        }

        if accumulated.is_none() {
            let started = self.next_sequence;
            self.next_sequence += 1;
            self.pending.insert(
                transaction_id,
                PendingReassembly::new(header.message_type, fragment.total_fragments, started),
            );
        }
        let Some(partial) = self.pending.get_mut(&transaction_id) else {
            return Ok(None);
        };

        if current == 0 && !partial.fragments.is_empty() && !partial.fragments.contains_key(&0) {
            partial.first_out_of_order = true;
        }
        if partial
            .fragments
            .insert(current, Bytes::copy_from_slice(payload))
            .is_some()
        {
            debug!("duplicate fragment {current} of transaction {transaction_id} overwritten");
        }
        partial.buffered = partial.buffered - replaced + payload.len();
        self.buffered = attempted;

        if !partial.is_complete() {
            return Ok(None);
        }
        let Some(partial) = self.pending.remove(&transaction_id) else {
            return Ok(None);
        };
        self.buffered -= partial.buffered;
        Ok(Some(partial.into_body()))
    }

    /// Drop every partial message, returning how many were abandoned.
    pub fn abandon_all(&mut self) -> usize {
        let abandoned = self.pending.len();
        self.pending.clear();
        self.buffered = 0;
        abandoned
    }

    /// Drop the partial message for `transaction_id`, if any.
    pub fn discard(&mut self, transaction_id: u32) -> bool {
        match self.pending.remove(&transaction_id) {
            Some(partial) => {
                self.buffered -= partial.buffered;
                true
            }
            None => false,
        }
    }

    /// Number of partial messages currently buffered.
    #[must_use]
    pub fn pending_len(&self) -> usize { self.pending.len() }

    /// Payload bytes held across all partial messages.
    #[must_use]
    pub fn pending_bytes(&self) -> usize { self.buffered }

    /// Whether a partial message exists for `transaction_id`.
    #[must_use]
    pub fn is_pending(&self, transaction_id: u32) -> bool {
        self.pending.contains_key(&transaction_id)
    }

    fn validate(&self, transaction_id: u32, fragment: FragmentHeader) -> Result<(), FramerError> {
        let FragmentHeader {
            total_fragments: total,
            current_fragment: current,
        } = fragment;
        if total == 0 {
            return Err(FramerError::ZeroFragments { transaction_id });
        }
        if current >= total {
            return Err(FramerError::FragmentOutOfRange {
                transaction_id,
                current,
                total,
            });
        }
        let limit = self.config.max_fragments;
        if usize::try_from(total).map_or(true, |total| total > limit.get()) {
            return Err(FramerError::TooManyFragments {
                transaction_id,
                total,
                limit,
            });
        }
        Ok(())
    }

    /// Transaction id and buffered bytes of the oldest partial message.
    fn oldest_pending(&self) -> Option<(u32, usize)> {
        self.pending
            .iter()
            .min_by_key(|(_, partial)| partial.started)
            .map(|(transaction_id, partial)| (*transaction_id, partial.buffered))
    }

    fn evict(&mut self, oldest: u32) {
        if let Some(partial) = self.pending.remove(&oldest) {
            self.buffered -= partial.buffered;
            warn!(
                "evicted partial message for transaction {oldest}: {} of {} fragments buffered",
                partial.fragments.len(),
                partial.total
            );
        }
    }
}

/// Check that `accumulated` plus `additional` stays within the per-message
/// ceiling, returning the new total.
fn check_size_limit(
    limit: NonZeroUsize,
    transaction_id: u32,
    accumulated: usize,
    additional: usize,
) -> Result<usize, FramerError> {
    let Some(total) = accumulated.checked_add(additional) else {
        return Err(FramerError::MessageTooLarge {
            transaction_id,
            attempted: usize::MAX,
            limit,
        });
    };
    if total > limit.get() {
        return Err(FramerError::MessageTooLarge {
            transaction_id,
            attempted: total,
            limit,
        });
    }
    Ok(total)
}
