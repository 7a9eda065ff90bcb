//! Turns raw control transfers into complete control messages.

use bytes::Bytes;
use log::{debug, warn};

use super::{
    CONTROL_HEADER_LEN,
    ConnectionEpoch,
    ControlHeader,
    ControlMessage,
    FRAGMENT_HEADER_LEN,
    FragmentHeader,
    FramerError,
    MessageType,
    Reassembler,
};
use crate::{
    config::FramerConfig,
    transfer::{RawTransfer, TransferKind},
};

/// Result of submitting one control transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FramerStatus {
    /// The transfer was buffered; more fragments are required.
    Incomplete,
    /// The transfer completed a message.
    Complete(ControlMessage),
}

impl FramerStatus {
    /// Borrow the completed message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&ControlMessage> {
        match self {
            Self::Incomplete => None,
            Self::Complete(message) => Some(message),
        }
    }

    /// Take the completed message, if any.
    #[must_use]
    pub fn into_message(self) -> Option<ControlMessage> {
        match self {
            Self::Incomplete => None,
            Self::Complete(message) => Some(message),
        }
    }
}

/// Control-channel framer for one conversation.
///
/// The framer owns the connection epoch: every OPEN_MSG advances it and
/// abandons partially reassembled messages, since fragment state does not
/// survive a reconnect.
///
/// # Examples
///
/// ```
/// use mbimframe::{
///     Direction,
///     RawTransfer,
///     TransferId,
///     config::FramerConfig,
///     control::{MessageFramer, MessageType},
/// };
///
/// let mut framer = MessageFramer::new(FramerConfig::default());
/// let open = [
///     1, 0, 0, 0, // OPEN_MSG
///     16, 0, 0, 0, // message length
///     1, 0, 0, 0, // transaction id
///     0, 16, 0, 0, // max control transfer
/// ];
/// let transfer = RawTransfer::control(TransferId::new(1), Direction::HostToDevice, &open);
/// let status = framer.submit(&transfer).expect("valid OPEN");
/// let message = status.message().expect("OPEN is never fragmented");
/// assert_eq!(message.message_type(), MessageType::Open);
/// assert_eq!(framer.epoch().get(), 1);
/// ```
#[derive(Debug)]
pub struct MessageFramer {
    reassembler: Reassembler,
    epoch: ConnectionEpoch,
}

impl MessageFramer {
    #[must_use]
    pub fn new(config: FramerConfig) -> Self {
        Self {
            reassembler: Reassembler::new(config),
            epoch: ConnectionEpoch::initial(),
        }
    }

    /// Current connection epoch.
    #[must_use]
    pub const fn epoch(&self) -> ConnectionEpoch { self.epoch }

    /// Borrow the reassembly state, e.g. to inspect pending counts.
    #[must_use]
    pub const fn reassembler(&self) -> &Reassembler { &self.reassembler }

    /// Decode one control transfer.
    ///
    /// # Errors
    ///
    /// Returns a [`FramerError`] when the transfer is not a structurally
    /// valid control message or would break a reassembly ceiling. The
    /// transfer is discarded and unrelated pending state is preserved.
    pub fn submit(&mut self, transfer: &RawTransfer<'_>) -> Result<FramerStatus, FramerError> {
        if transfer.kind() != TransferKind::Control {
            return Err(FramerError::NotControl {
                found: transfer.kind(),
            });
        }
        let bytes = transfer.bytes();
        let header = ControlHeader::parse(bytes)?;
        let message = message_bytes(&header, bytes)?;

        if header.message_type.direction() != transfer.direction()
            && !matches!(header.message_type, MessageType::Unknown(_))
        {
            warn!(
                "{} with transaction {} seen travelling {:?}",
                header.message_type,
                header.transaction_id,
                transfer.direction()
            );
        }

        if header.message_type == MessageType::Open {
            self.epoch = self.epoch.next();
            let abandoned = self.reassembler.abandon_all();
            if abandoned > 0 {
                warn!(
                    "OPEN_MSG abandoned {abandoned} partial messages; entering epoch {}",
                    self.epoch
                );
            }
            debug!(
                "OPEN_MSG with transaction {} starts epoch {}",
                header.transaction_id, self.epoch
            );
        }

        let rest = &message[CONTROL_HEADER_LEN..];
        if !header.message_type.is_fragmentable() {
            return Ok(FramerStatus::Complete(ControlMessage::new(
                &header,
                self.epoch,
                transfer.id(),
                Bytes::copy_from_slice(rest),
            )));
        }

        let fragment = FragmentHeader::parse(rest)?;
        let payload = &rest[FRAGMENT_HEADER_LEN..];
        let Some(reassembled) = self.reassembler.push(&header, fragment, payload)? else {
            debug!(
                "buffered fragment {} of {} for transaction {}",
                fragment.current_fragment, fragment.total_fragments, header.transaction_id
            );
            return Ok(FramerStatus::Incomplete);
        };
        if reassembled.reordered {
            debug!(
                "transaction {} reassembled with fragment 0 out of order",
                header.transaction_id
            );
        }
        let message = ControlMessage::new(&header, self.epoch, transfer.id(), reassembled.body)
            .with_fragments(reassembled.fragments, reassembled.reordered);
        Ok(FramerStatus::Complete(message))
    }

    /// Drop every partial message and reset the epoch, as when the caller
    /// discards the conversation.
    pub fn reset(&mut self) {
        self.reassembler.abandon_all();
        self.epoch = ConnectionEpoch::initial();
    }
}

/// Slice the transfer to its declared `message_length`.
fn message_bytes<'a>(header: &ControlHeader, bytes: &'a [u8]) -> Result<&'a [u8], FramerError> {
    let declared = header.message_length;
    let Some(length) = usize::try_from(declared)
        .ok()
        .filter(|len| (CONTROL_HEADER_LEN..=bytes.len()).contains(len))
    else {
        return Err(FramerError::LengthMismatch {
            declared,
            actual: bytes.len(),
        });
    };
    if length < bytes.len() {
        debug!(
            "ignoring {} trailing bytes after transaction {}",
            bytes.len() - length,
            header.transaction_id
        );
    }
    Ok(&bytes[..length])
}
