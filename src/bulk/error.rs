use thiserror::Error;

use crate::{error::ErrorKind, transfer::TransferKind};

/// Errors raised while demultiplexing a bulk transfer.
///
/// Each error aborts the current transfer only; nothing is retained between
/// bulk transfers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DemuxError {
    /// The transfer did not travel on a bulk pipe.
    #[error("expected a bulk transfer, found {found:?}")]
    NotBulk { found: TransferKind },

    /// The transfer does not start with an NCM transfer header signature.
    #[error("unrecognised transfer header signature {}", hex::encode(found))]
    UnknownSignature { found: [u8; 4] },

    /// The buffer ends inside a fixed-size structure.
    #[error("{what} at offset {offset} needs {need} bytes but the transfer holds {have}")]
    Truncated {
        what: &'static str,
        offset: usize,
        need: usize,
        have: usize,
    },

    /// A datagram pointer index is not 4-byte aligned.
    #[error("datagram pointer index {index} is not 4-byte aligned")]
    MisalignedNdp { index: u32 },

    /// A datagram pointer lies partly or wholly past the transfer.
    #[error("datagram pointer at {index} spans {length} bytes past the {available}-byte transfer")]
    NdpOutOfBounds {
        index: u32,
        length: usize,
        available: usize,
    },

    /// A datagram pointer's length cannot hold its own header.
    #[error("datagram pointer at {index} declares length {length}, below the {minimum}-byte header")]
    NdpLengthInvalid {
        index: u32,
        length: u16,
        minimum: usize,
    },

    /// A datagram entry would read past the transfer.
    #[error("datagram at {index} with length {length} ends past the {available}-byte transfer")]
    DatagramOutOfBounds {
        index: u32,
        length: u32,
        available: usize,
    },

    /// A datagram index violates the configured alignment.
    #[error("datagram index {index} is not {alignment}-byte aligned")]
    MisalignedDatagram { index: u32, alignment: usize },

    /// More datagram pointers were chained than the configured ceiling.
    #[error("datagram pointer chain exceeds {limit} entries")]
    ChainTooLong { limit: usize },

    /// More datagrams were listed than the configured ceiling.
    #[error("transfer lists more than {limit} datagrams")]
    TooManyDatagrams { limit: usize },
}

impl DemuxError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotBulk { .. }
            | Self::UnknownSignature { .. }
            | Self::Truncated { .. }
            | Self::MisalignedNdp { .. }
            | Self::NdpLengthInvalid { .. }
            | Self::MisalignedDatagram { .. } => ErrorKind::Malformed,
            Self::NdpOutOfBounds { .. } | Self::DatagramOutOfBounds { .. } => {
                ErrorKind::OutOfBounds
            }
            Self::ChainTooLong { .. } | Self::TooManyDatagrams { .. } => ErrorKind::ResourceLimit,
        }
    }
}
