//! Per-conversation decoding pipeline.
//!
//! A [`Conversation`] owns every piece of state one logical MBIM connection
//! needs: the control framer with its connection epoch, the transaction
//! table, and the bulk demultiplexer settings. Transfers are decoded one at a
//! time, in capture order.

mod registry;

pub use registry::{ConversationId, ConversationRegistry};

use crate::{
    bulk::{DemuxedTransfer, Demultiplexer},
    config::DecoderConfig,
    control::{ConnectionEpoch, ControlMessage, FramerStatus, MessageFramer},
    correlation::{CorrelatableMessage, Correlation, TransactionCorrelator, TransactionKey},
    error::Result,
    metrics,
    transfer::{RawTransfer, TransferId, TransferKind},
};

/// A control message completed by the last transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedControl {
    pub message: ControlMessage,
    /// For completions, the transfer that carried the matching request.
    pub request: Option<TransferId>,
}

/// Outcome of submitting one transfer to a [`Conversation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationEvent {
    /// A control fragment was buffered.
    Pending,
    /// A control message completed.
    Control(DecodedControl),
    /// A bulk transfer was demultiplexed.
    Bulk(DemuxedTransfer),
}

/// Decoding state for one logical connection.
///
/// # Examples
///
/// ```
/// use mbimframe::{
///     Direction,
///     RawTransfer,
///     TransferId,
///     config::DecoderConfig,
///     conversation::{Conversation, ConversationEvent},
/// };
///
/// let mut conversation = Conversation::new(DecoderConfig::default());
/// let open = [1, 0, 0, 0, 16, 0, 0, 0, 1, 0, 0, 0, 0, 16, 0, 0];
/// let event = conversation
///     .submit(&RawTransfer::control(
///         TransferId::new(1),
///         Direction::HostToDevice,
///         &open,
///     ))
///     .expect("valid OPEN");
/// assert!(matches!(event, ConversationEvent::Control(_)));
/// assert_eq!(conversation.epoch().get(), 1);
/// ```
#[derive(Debug)]
pub struct Conversation {
    framer: MessageFramer,
    correlator: TransactionCorrelator<TransferId>,
    demux: Demultiplexer,
}

impl Conversation {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            framer: MessageFramer::new(config.framer),
            correlator: TransactionCorrelator::new(config.correlator),
            demux: Demultiplexer::new(config.demux),
        }
    }

    /// Decode one transfer of either kind.
    ///
    /// # Errors
    ///
    /// Returns the framer or demultiplexer error for the transfer. The
    /// transfer is dropped; conversation state is otherwise unchanged.
    pub fn submit(&mut self, transfer: &RawTransfer<'_>) -> Result<ConversationEvent> {
        metrics::inc_transfers(transfer.kind());
        let result = match transfer.kind() {
            TransferKind::Control => self.submit_control(transfer),
            TransferKind::Bulk => self.submit_bulk(transfer).map(ConversationEvent::Bulk),
        };
        if let Err(err) = &result {
            metrics::inc_errors(err.kind());
        }
        result
    }

    /// Frame one control transfer and correlate the message it completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framer`](crate::error::Error::Framer) when the
    /// transfer cannot be framed.
    pub fn submit_control(&mut self, transfer: &RawTransfer<'_>) -> Result<ConversationEvent> {
        let FramerStatus::Complete(message) = self.framer.submit(transfer)? else {
            return Ok(ConversationEvent::Pending);
        };
        metrics::inc_messages();
        let request = match message.correlation() {
            Correlation::Request(key) => {
                self.correlator.on_request(key, message.transfer());
                None
            }
            Correlation::Completion(key) => self.correlator.on_completion(key, message.transfer()),
            Correlation::Uncorrelated => None,
        };
        Ok(ConversationEvent::Control(DecodedControl { message, request }))
    }

    /// Demultiplex one bulk transfer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Demux`](crate::error::Error::Demux) when the
    /// transfer is structurally invalid.
    pub fn submit_bulk(&self, transfer: &RawTransfer<'_>) -> Result<DemuxedTransfer> {
        let demuxed = self.demux.demux(transfer)?;
        metrics::add_datagrams(demuxed.datagrams.len());
        Ok(demuxed)
    }

    /// Transfer carrying the request recorded under `key`.
    #[must_use]
    pub fn request_for(&self, key: &TransactionKey) -> Option<TransferId> {
        self.correlator.request(key).copied()
    }

    /// Transfer carrying the first completion recorded under `key`.
    #[must_use]
    pub fn response_to(&self, key: &TransactionKey) -> Option<TransferId> {
        self.correlator.completion(key).copied()
    }

    #[must_use]
    pub const fn epoch(&self) -> ConnectionEpoch { self.framer.epoch() }

    #[must_use]
    pub const fn framer(&self) -> &MessageFramer { &self.framer }

    #[must_use]
    pub const fn correlator(&self) -> &TransactionCorrelator<TransferId> { &self.correlator }

    /// Drop all pending fragments and transactions and return to epoch 0.
    pub fn reset(&mut self) {
        self.framer.reset();
        self.correlator.clear();
    }
}
