//! Public API for the `mbimframe` library.
//!
//! This crate decodes the transport framing of the Mobile Broadband
//! Interface Model: it reassembles fragmented control messages, correlates
//! requests with their completions across connection epochs, demultiplexes
//! NCM bulk transfers into per-session datagrams, and decodes the nested TLV
//! records carried by extended payloads.
//!
//! Decoding is synchronous. A [`Conversation`] holds the state of one
//! logical connection; [`ConversationRegistry`] shards many of them for
//! concurrent callers.

pub mod bulk;
pub mod byte_order;
pub mod capture;
pub mod catalogue;
pub mod config;
pub mod control;
pub mod conversation;
pub mod correlation;
pub mod error;
pub mod metrics;
pub mod service;
pub mod tlv;
pub mod transfer;

pub use bulk::{Datagram, DemuxError, DemuxedTransfer, Demultiplexer, SessionKind};
pub use config::DecoderConfig;
pub use control::{ControlMessage, FramerError, FramerStatus, MessageFramer};
pub use conversation::{
    Conversation,
    ConversationEvent,
    ConversationId,
    ConversationRegistry,
    DecodedControl,
};
pub use correlation::{TransactionCorrelator, TransactionKey};
pub use error::{Error, ErrorKind, Result};
pub use service::{CommandAddress, CommandId, ServiceId};
pub use tlv::{TlvError, TlvRecord, decode_list, decode_one};
pub use transfer::{Direction, RawTransfer, TransferId, TransferKind};
