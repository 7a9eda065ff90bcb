//! Crate-level error classification.
//!
//! Each component reports its own error enum. [`ErrorKind`] groups those
//! errors into the categories callers act on, and [`Error`] wraps them for
//! code that drives the whole pipeline through a
//! [`Conversation`](crate::conversation::Conversation).
//!
//! Structurally valid input with an unknown tag or signature is never an
//! error: those values surface as `Unknown` variants carrying the raw bytes.

use std::fmt;

use thiserror::Error;

use crate::{bulk::DemuxError, control::FramerError, tlv::TlvError};

/// Category of a decode failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structurally invalid input: truncated headers, inconsistent lengths.
    Malformed,
    /// An index or length that would read past the transfer if followed.
    OutOfBounds,
    /// A configured ceiling on pending state or chain length was exceeded.
    ResourceLimit,
}

impl ErrorKind {
    /// Stable lowercase label, used for metrics and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::OutOfBounds => "out_of_bounds",
            Self::ResourceLimit => "resource_limit",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Any error raised while decoding one transfer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Control-channel framing failed.
    #[error("control framing failed: {0}")]
    Framer(#[from] FramerError),
    /// Bulk demultiplexing failed.
    #[error("bulk demultiplexing failed: {0}")]
    Demux(#[from] DemuxError),
    /// A TLV list could not be decoded.
    #[error("TLV decoding failed: {0}")]
    Tlv(#[from] TlvError),
}

impl Error {
    /// Category of the underlying failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Framer(err) => err.kind(),
            Self::Demux(err) => err.kind(),
            Self::Tlv(err) => err.kind(),
        }
    }
}

/// Result alias for pipeline-level operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
