//! Complete control messages and typed views of their bodies.

use bytes::{Bytes, BytesMut};

use super::{
    CONTROL_HEADER_LEN,
    ConnectionEpoch,
    ControlHeader,
    FRAGMENT_HEADER_LEN,
    FragmentHeader,
    FramerError,
    MessageType,
};
use crate::{
    byte_order::{array_at, le_u32_at},
    service::{CommandAddress, CommandId, ServiceId},
    transfer::TransferId,
};

/// A control message whose fragments, if any, have all arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlMessage {
    message_type: MessageType,
    transaction_id: u32,
    epoch: ConnectionEpoch,
    fragments: u32,
    reordered: bool,
    transfer: TransferId,
    body: Bytes,
}

impl ControlMessage {
    pub(crate) fn new(
        header: &ControlHeader,
        epoch: ConnectionEpoch,
        transfer: TransferId,
        body: Bytes,
    ) -> Self {
        Self {
            message_type: header.message_type,
            transaction_id: header.transaction_id,
            epoch,
            fragments: 1,
            reordered: false,
            transfer,
            body,
        }
    }

    pub(crate) fn with_fragments(mut self, fragments: u32, reordered: bool) -> Self {
        self.fragments = fragments;
        self.reordered = reordered;
        self
    }

    #[must_use]
    pub const fn message_type(&self) -> MessageType { self.message_type }

    #[must_use]
    pub const fn transaction_id(&self) -> u32 { self.transaction_id }

    /// Connection epoch the message completed in.
    #[must_use]
    pub const fn epoch(&self) -> ConnectionEpoch { self.epoch }

    /// Number of transfers the message spanned.
    #[must_use]
    pub const fn fragments(&self) -> u32 { self.fragments }

    /// Whether fragment 0 arrived after a later fragment.
    #[must_use]
    pub const fn reordered(&self) -> bool { self.reordered }

    /// Transfer that completed the message.
    #[must_use]
    pub const fn transfer(&self) -> TransferId { self.transfer }

    /// Bytes following the control and fragment headers.
    #[must_use]
    pub fn body(&self) -> &[u8] { &self.body }

    /// Length of the message in its unfragmented encoding.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let fragment_header = if self.message_type.is_fragmentable() {
            FRAGMENT_HEADER_LEN
        } else {
            0
        };
        CONTROL_HEADER_LEN + fragment_header + self.body.len()
    }

    /// Re-encode the message as a single unfragmented transfer.
    ///
    /// Fragmentable types carry `total_fragments = 1, current_fragment = 0`
    /// and `message_length` covers the whole message.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let length = self.encoded_len();
        let mut dst = BytesMut::with_capacity(length);
        ControlHeader {
            message_type: self.message_type,
            message_length: u32::try_from(length).unwrap_or(u32::MAX),
            transaction_id: self.transaction_id,
        }
        .encode(&mut dst);
        if self.message_type.is_fragmentable() {
            FragmentHeader::SINGLE.encode(&mut dst);
        }
        dst.extend_from_slice(&self.body);
        dst.freeze()
    }

    /// Service and command the message addresses, for types that carry one.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Truncated`] when the body is too short to hold
    /// the address.
    pub fn command_address(&self) -> Result<Option<CommandAddress>, FramerError> {
        if !matches!(
            self.message_type,
            MessageType::Command | MessageType::CommandDone | MessageType::IndicateStatus
        ) {
            return Ok(None);
        }
        read_address(&self.body).map(Some)
    }

    /// Typed view of the body.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Truncated`] when a fixed field is missing and
    /// [`FramerError::InformationBufferOutOfBounds`] when the declared
    /// information buffer extends past the body.
    pub fn payload(&self) -> Result<ControlPayload<'_>, FramerError> {
        let body = self.body.as_ref();
        let payload = match self.message_type {
            MessageType::Open => ControlPayload::Open {
                max_control_transfer: read_u32(body, 0, "OPEN_MSG body")?,
            },
            MessageType::Close => ControlPayload::Close,
            MessageType::Command => {
                let address = read_address(body)?;
                let command_type = CommandType::from(read_u32(body, 20, "COMMAND_MSG body")?);
                ControlPayload::Command {
                    address,
                    command_type,
                    information: information_buffer(body, 24)?,
                }
            }
            MessageType::CommandDone => ControlPayload::CommandDone {
                address: read_address(body)?,
                status: read_u32(body, 20, "COMMAND_DONE body")?,
                information: information_buffer(body, 24)?,
            },
            MessageType::IndicateStatus => ControlPayload::IndicateStatus {
                address: read_address(body)?,
                information: information_buffer(body, 20)?,
            },
            MessageType::OpenDone => ControlPayload::OpenDone {
                status: read_u32(body, 0, "OPEN_DONE body")?,
            },
            MessageType::CloseDone => ControlPayload::CloseDone {
                status: read_u32(body, 0, "CLOSE_DONE body")?,
            },
            MessageType::HostError => ControlPayload::HostError {
                error_status_code: read_u32(body, 0, "HOST_ERROR_MSG body")?,
            },
            MessageType::FunctionError => ControlPayload::FunctionError {
                error_status_code: read_u32(body, 0, "FUNCTION_ERROR_MSG body")?,
            },
            MessageType::Unknown(message_type) => ControlPayload::Unknown { message_type, body },
        };
        Ok(payload)
    }

    /// The addressed information buffer, for types that carry one.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`ControlMessage::payload`].
    pub fn information_buffer(&self) -> Result<Option<InformationBuffer<'_>>, FramerError> {
        let buffer = match self.payload()? {
            ControlPayload::Command {
                address,
                command_type,
                information,
            } => InformationBuffer {
                address,
                role: InformationRole::Request(command_type),
                bytes: information,
            },
            ControlPayload::CommandDone {
                address,
                status,
                information,
            } => InformationBuffer {
                address,
                role: InformationRole::Response { status },
                bytes: information,
            },
            ControlPayload::IndicateStatus {
                address,
                information,
            } => InformationBuffer {
                address,
                role: InformationRole::Indication,
                bytes: information,
            },
            _ => return Ok(None),
        };
        Ok(Some(buffer))
    }
}

/// Whether a COMMAND_MSG queries or sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandType {
    Query,
    Set,
    Unknown(u32),
}

impl From<u32> for CommandType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Query,
            1 => Self::Set,
            other => Self::Unknown(other),
        }
    }
}

/// Typed view of a control message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPayload<'a> {
    Open {
        max_control_transfer: u32,
    },
    Close,
    Command {
        address: CommandAddress,
        command_type: CommandType,
        information: &'a [u8],
    },
    CommandDone {
        address: CommandAddress,
        status: u32,
        information: &'a [u8],
    },
    IndicateStatus {
        address: CommandAddress,
        information: &'a [u8],
    },
    OpenDone {
        status: u32,
    },
    CloseDone {
        status: u32,
    },
    HostError {
        error_status_code: u32,
    },
    FunctionError {
        error_status_code: u32,
    },
    Unknown {
        message_type: u32,
        body: &'a [u8],
    },
}

/// Which side of an exchange an information buffer belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InformationRole {
    Request(CommandType),
    Response { status: u32 },
    Indication,
}

/// Addressed payload handed to field decoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InformationBuffer<'a> {
    pub address: CommandAddress,
    pub role: InformationRole,
    pub bytes: &'a [u8],
}

fn read_u32(body: &[u8], offset: usize, what: &'static str) -> Result<u32, FramerError> {
    le_u32_at(body, offset).ok_or(FramerError::Truncated {
        what,
        have: body.len(),
        need: offset + 4,
    })
}

fn read_address(body: &[u8]) -> Result<CommandAddress, FramerError> {
    let service = array_at::<16>(body, 0).ok_or(FramerError::Truncated {
        what: "service id",
        have: body.len(),
        need: 16,
    })?;
    let command = read_u32(body, 16, "command id")?;
    Ok(CommandAddress::new(
        ServiceId::new(service),
        CommandId::new(command),
    ))
}

/// Read the length-prefixed information buffer whose length sits at
/// `length_offset`.
fn information_buffer(body: &[u8], length_offset: usize) -> Result<&[u8], FramerError> {
    let length = read_u32(body, length_offset, "information buffer length")?;
    let offset = length_offset + 4;
    usize::try_from(length)
        .ok()
        .and_then(|len| offset.checked_add(len))
        .and_then(|end| body.get(offset..end))
        .ok_or(FramerError::InformationBufferOutOfBounds {
            offset,
            length,
            available: body.len(),
        })
}
