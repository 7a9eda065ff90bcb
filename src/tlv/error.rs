use thiserror::Error;

use crate::error::ErrorKind;

/// Errors raised while decoding TLV records.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TlvError {
    /// Fewer than eight bytes remain for the record header.
    #[error("TLV header at offset {offset} needs 8 bytes but {available} remain")]
    TruncatedHeader { offset: usize, available: usize },

    /// Payload and padding extend past the buffer.
    #[error("TLV at offset {offset} spans to {end} but the buffer holds {available} bytes")]
    PayloadOutOfBounds {
        offset: usize,
        end: usize,
        available: usize,
    },

    /// The list budget itself extends past the buffer.
    #[error("TLV list budget {budget} at offset {offset} exceeds the {available}-byte buffer")]
    BudgetOutOfBounds {
        offset: usize,
        budget: usize,
        available: usize,
    },

    /// A record inside a list would end beyond the list's byte budget.
    #[error("TLV at offset {offset} overruns the list budget ending at {limit}")]
    BudgetOverrun { offset: usize, limit: usize },

    /// A UTF-16 payload with an odd number of bytes.
    #[error("wide string payload has odd length {length}")]
    OddWideString { length: usize },

    /// A `u16` table payload with an odd number of bytes.
    #[error("u16 table payload has odd length {length}")]
    OddTable { length: usize },
}

impl TlvError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PayloadOutOfBounds { .. } | Self::BudgetOutOfBounds { .. } => {
                ErrorKind::OutOfBounds
            }
            Self::TruncatedHeader { .. }
            | Self::BudgetOverrun { .. }
            | Self::OddWideString { .. }
            | Self::OddTable { .. } => ErrorKind::Malformed,
        }
    }
}
