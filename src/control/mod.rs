//! Control-channel message framing.
//!
//! This module turns control-pipe transfers into complete MBIM control
//! messages. Each sub-module focuses on a single concept: the wire headers,
//! the connection epoch, fragment reassembly, the framer that ties them
//! together, and typed views of the finished message.

pub mod epoch;
pub mod error;
pub mod framer;
pub mod header;
pub mod message;
pub mod reassembler;

pub use epoch::ConnectionEpoch;
pub use error::FramerError;
pub use framer::{FramerStatus, MessageFramer};
pub use header::{
    CONTROL_HEADER_LEN,
    ControlHeader,
    FRAGMENT_HEADER_LEN,
    FragmentHeader,
    MessageType,
};
pub use message::{
    CommandType,
    ControlMessage,
    ControlPayload,
    InformationBuffer,
    InformationRole,
};
pub use reassembler::{ReassembledBody, Reassembler};
