//! Control-channel headers.
//!
//! Every control transfer starts with a 12-byte [`ControlHeader`]. Message
//! types that may span several transfers follow it with an 8-byte
//! [`FragmentHeader`].

use std::fmt;

use bytes::{Buf, BufMut, BytesMut};

use super::FramerError;
use crate::transfer::Direction;

/// Length of the common control header.
pub const CONTROL_HEADER_LEN: usize = 12;
/// Length of the fragment header carried by fragmentable message types.
pub const FRAGMENT_HEADER_LEN: usize = 8;

/// Control message type.
///
/// Unrecognised values are retained in [`MessageType::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    Open,
    Close,
    Command,
    HostError,
    OpenDone,
    CloseDone,
    CommandDone,
    FunctionError,
    IndicateStatus,
    Unknown(u32),
}

impl MessageType {
    /// Map a wire value to its message type.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbimframe::control::MessageType;
    ///
    /// assert_eq!(MessageType::from_raw(0x8000_0003), MessageType::CommandDone);
    /// assert_eq!(MessageType::from_raw(0x42), MessageType::Unknown(0x42));
    /// ```
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        match value {
            0x0000_0001 => Self::Open,
            0x0000_0002 => Self::Close,
            0x0000_0003 => Self::Command,
            0x0000_0004 => Self::HostError,
            0x8000_0001 => Self::OpenDone,
            0x8000_0002 => Self::CloseDone,
            0x8000_0003 => Self::CommandDone,
            0x8000_0004 => Self::FunctionError,
            0x8000_0007 => Self::IndicateStatus,
            other => Self::Unknown(other),
        }
    }

    /// Wire value of this message type.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::Open => 0x0000_0001,
            Self::Close => 0x0000_0002,
            Self::Command => 0x0000_0003,
            Self::HostError => 0x0000_0004,
            Self::OpenDone => 0x8000_0001,
            Self::CloseDone => 0x8000_0002,
            Self::CommandDone => 0x8000_0003,
            Self::FunctionError => 0x8000_0004,
            Self::IndicateStatus => 0x8000_0007,
            Self::Unknown(other) => other,
        }
    }

    /// Whether this type carries a [`FragmentHeader`].
    #[must_use]
    pub const fn is_fragmentable(self) -> bool {
        matches!(self, Self::Command | Self::CommandDone | Self::IndicateStatus)
    }

    /// Direction a well-formed message of this type travels in.
    ///
    /// Host-originated types have the top bit clear.
    #[must_use]
    pub const fn direction(self) -> Direction {
        if self.raw() & 0x8000_0000 == 0 {
            Direction::HostToDevice
        } else {
            Direction::DeviceToHost
        }
    }
}

impl From<u32> for MessageType {
    fn from(value: u32) -> Self { Self::from_raw(value) }
}

impl From<MessageType> for u32 {
    fn from(value: MessageType) -> Self { value.raw() }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "OPEN_MSG",
            Self::Close => "CLOSE_MSG",
            Self::Command => "COMMAND_MSG",
            Self::HostError => "HOST_ERROR_MSG",
            Self::OpenDone => "OPEN_DONE",
            Self::CloseDone => "CLOSE_DONE",
            Self::CommandDone => "COMMAND_DONE",
            Self::FunctionError => "FUNCTION_ERROR_MSG",
            Self::IndicateStatus => "INDICATE_STATUS_MSG",
            Self::Unknown(raw) => return write!(f, "UNKNOWN({raw:#010x})"),
        };
        f.write_str(name)
    }
}

/// Header present at the start of every control transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlHeader {
    pub message_type: MessageType,
    pub message_length: u32,
    pub transaction_id: u32,
}

impl ControlHeader {
    /// Parse the header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Truncated`] when fewer than
    /// [`CONTROL_HEADER_LEN`] bytes are available.
    pub fn parse(bytes: &[u8]) -> Result<Self, FramerError> {
        let mut buf = bytes;
        if buf.remaining() < CONTROL_HEADER_LEN {
            return Err(FramerError::Truncated {
                what: "control header",
                have: buf.remaining(),
                need: CONTROL_HEADER_LEN,
            });
        }
        Ok(Self {
            message_type: MessageType::from_raw(buf.get_u32_le()),
            message_length: buf.get_u32_le(),
            transaction_id: buf.get_u32_le(),
        })
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.message_type.raw());
        dst.put_u32_le(self.message_length);
        dst.put_u32_le(self.transaction_id);
    }
}

/// Position of one transfer within a fragmented message.
///
/// # Examples
///
/// ```
/// use mbimframe::control::FragmentHeader;
///
/// let header = FragmentHeader::new(3, 2);
/// assert!(header.is_last());
/// assert!(!FragmentHeader::new(3, 0).is_last());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentHeader {
    pub total_fragments: u32,
    pub current_fragment: u32,
}

impl FragmentHeader {
    /// Header of a message that fits one transfer.
    pub const SINGLE: Self = Self::new(1, 0);

    #[must_use]
    pub const fn new(total_fragments: u32, current_fragment: u32) -> Self {
        Self {
            total_fragments,
            current_fragment,
        }
    }

    /// Parse the header from the start of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Truncated`] when fewer than
    /// [`FRAGMENT_HEADER_LEN`] bytes are available.
    pub fn parse(bytes: &[u8]) -> Result<Self, FramerError> {
        let mut buf = bytes;
        if buf.remaining() < FRAGMENT_HEADER_LEN {
            return Err(FramerError::Truncated {
                what: "fragment header",
                have: buf.remaining(),
                need: FRAGMENT_HEADER_LEN,
            });
        }
        Ok(Self::new(buf.get_u32_le(), buf.get_u32_le()))
    }

    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u32_le(self.total_fragments);
        dst.put_u32_le(self.current_fragment);
    }

    /// Whether this is the final fragment of its set.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.total_fragments > 0 && self.current_fragment == self.total_fragments - 1
    }
}
