//! NCM bulk transfer demultiplexing.
//!
//! A bulk transfer starts with an NCM transfer header whose signature fixes
//! the index width for the whole transfer. The header points at a chain of
//! datagram pointers; each pointer's signature names the session its
//! datagrams belong to.

mod demux;
mod error;
mod header;
mod pointer;
pub mod signature;
mod width;

pub use demux::{Datagram, DemuxWarning, DemuxedTransfer, Demultiplexer};
pub use error::DemuxError;
pub use header::NcmTransferHeader;
pub use pointer::{DatagramEntry, DatagramPointer};
pub use signature::SessionKind;
pub use width::IndexWidth;

/// Transfer header signature selecting 16-bit indices.
pub const NTH16_SIGNATURE: &[u8; 4] = b"NCMH";
/// Transfer header signature selecting 32-bit indices.
pub const NTH32_SIGNATURE: &[u8; 4] = b"ncmh";
