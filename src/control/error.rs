//! Errors emitted by the control-channel framer.
//!
//! A failing transfer is discarded; partial reassemblies belonging to other
//! transactions are left untouched.

use std::num::NonZeroUsize;

use thiserror::Error;

use super::MessageType;
use crate::{error::ErrorKind, transfer::TransferKind};

/// Errors produced while framing control transfers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FramerError {
    /// The transfer did not arrive on the control pipe.
    #[error("expected a control transfer, found {found:?}")]
    NotControl { found: TransferKind },

    /// A fixed-size structure extends past the available bytes.
    #[error("truncated {what}: have {have} bytes, need {need}")]
    Truncated {
        what: &'static str,
        have: usize,
        need: usize,
    },

    /// `message_length` disagrees with the bytes actually present.
    #[error("declared message length {declared} inconsistent with {actual} byte transfer")]
    LengthMismatch { declared: u32, actual: usize },

    /// A fragment header declared zero fragments.
    #[error("transaction {transaction_id} declares zero fragments")]
    ZeroFragments { transaction_id: u32 },

    /// `current_fragment` is not below `total_fragments`.
    #[error("fragment {current} out of range for {total} fragments in transaction {transaction_id}")]
    FragmentOutOfRange {
        transaction_id: u32,
        current: u32,
        total: u32,
    },

    /// A fragment disagrees with the set it claims to belong to.
    #[error(
        "fragment of transaction {transaction_id} declares {found_total} x {found_type}, pending \
         set is {expected_total} x {expected_type}"
    )]
    InconsistentFragment {
        transaction_id: u32,
        expected_type: MessageType,
        found_type: MessageType,
        expected_total: u32,
        found_total: u32,
    },

    /// `total_fragments` exceeds the configured ceiling.
    #[error("transaction {transaction_id} declares {total} fragments, limit is {limit}")]
    TooManyFragments {
        transaction_id: u32,
        total: u32,
        limit: NonZeroUsize,
    },

    /// The reassembled body would exceed the per-message ceiling.
    #[error("transaction {transaction_id} exceeds size limit: {attempted} bytes > {limit} bytes")]
    MessageTooLarge {
        transaction_id: u32,
        attempted: usize,
        limit: NonZeroUsize,
    },

    /// Buffered partial messages would exceed the per-conversation ceiling.
    #[error(
        "pending reassembly budget exceeded by transaction {transaction_id}: {attempted} bytes > \
         {limit} bytes"
    )]
    PendingBudgetExceeded {
        transaction_id: u32,
        attempted: usize,
        limit: NonZeroUsize,
    },

    /// An information buffer length points past the message body.
    #[error("information buffer of {length} bytes at offset {offset} exceeds {available} byte body")]
    InformationBufferOutOfBounds {
        offset: usize,
        length: u32,
        available: usize,
    },
}

impl FramerError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotControl { .. }
            | Self::Truncated { .. }
            | Self::LengthMismatch { .. }
            | Self::ZeroFragments { .. }
            | Self::FragmentOutOfRange { .. }
            | Self::InconsistentFragment { .. } => ErrorKind::Malformed,
            Self::InformationBufferOutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::TooManyFragments { .. }
            | Self::MessageTooLarge { .. }
            | Self::PendingBudgetExceeded { .. } => ErrorKind::ResourceLimit,
        }
    }
}
