//! Walks the datagram pointer chain of one bulk transfer.

use std::ops::Range;

use derive_more::Display;
use log::{debug, warn};

use super::{DatagramEntry, DatagramPointer, DemuxError, NcmTransferHeader, SessionKind};
use crate::{
    config::DemuxConfig,
    tlv::{TlvError, TlvRecord, decode_list},
    transfer::{RawTransfer, TransferKind},
};

/// One datagram located inside a bulk transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Datagram {
    pub kind: SessionKind,
    /// Raw signature of the pointer that listed this datagram.
    pub signature: [u8; 4],
    /// Byte range within the transfer.
    pub range: Range<usize>,
    /// Index of the pointer that listed this datagram.
    pub ndp_index: u32,
}

impl Datagram {
    /// Borrow the datagram's bytes from the transfer it was found in.
    #[must_use]
    pub fn payload<'a>(&self, transfer: &'a [u8]) -> Option<&'a [u8]> {
        transfer.get(self.range.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize { self.range.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.range.is_empty() }

    /// Decode a control sub-channel datagram as a TLV list.
    ///
    /// Returns `None` for datagrams of any other session kind.
    ///
    /// # Errors
    ///
    /// The inner result carries [`decode_list`] errors.
    pub fn control_records<'a>(
        &self,
        transfer: &'a [u8],
    ) -> Option<Result<Vec<TlvRecord<'a>>, TlvError>> {
        (self.kind == SessionKind::ControlSubchannel)
            .then(|| decode_list(transfer, self.range.start, self.range.len()))
    }
}

/// Structural oddities that do not stop demultiplexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum DemuxWarning {
    /// `block_length` differs from the transfer size; the actual size is used.
    #[display("block length {declared} differs from transfer length {actual}")]
    BlockLengthMismatch { declared: u32, actual: usize },
    /// `header_length` differs from the size implied by the signature.
    #[display("header length {declared} differs from expected {expected}")]
    HeaderLengthMismatch { declared: u16, expected: usize },
    /// A pointer's entries ran out before a `(0, 0)` terminator.
    #[display("datagram pointer at {ndp_index} has no terminating entry")]
    UnterminatedEntries { ndp_index: u32 },
    /// `first_ndp_index` is zero, so the transfer carries no datagrams.
    #[display("transfer has no datagram pointer")]
    NoDatagramPointer,
}

/// Everything one bulk transfer yielded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemuxedTransfer {
    pub header: NcmTransferHeader,
    pub datagrams: Vec<Datagram>,
    pub warnings: Vec<DemuxWarning>,
}

impl DemuxedTransfer {
    /// Datagrams belonging to `kind`, in transfer order.
    pub fn session(&self, kind: SessionKind) -> impl Iterator<Item = &Datagram> {
        self.datagrams
            .iter()
            .filter(move |datagram| datagram.kind == kind)
    }
}

/// Stateless NCM demultiplexer.
///
/// # Examples
///
/// ```
/// use mbimframe::{
///     Direction,
///     RawTransfer,
///     TransferId,
///     bulk::{Demultiplexer, SessionKind},
///     config::DemuxConfig,
/// };
///
/// let mut bytes = vec![0u8; 96];
/// bytes[..12].copy_from_slice(b"NCMH\x0c\x00\x00\x00\x60\x00\x10\x00");
/// // IPS0 pointer at 16: length 16, no next pointer, one entry then (0, 0).
/// bytes[16..28].copy_from_slice(b"IPS\x00\x10\x00\x00\x00\x20\x00\x40\x00");
///
/// let transfer = RawTransfer::bulk(TransferId::new(1), Direction::DeviceToHost, &bytes);
/// let demuxed = Demultiplexer::new(DemuxConfig::default())
///     .demux(&transfer)
///     .expect("valid transfer");
/// assert_eq!(demuxed.datagrams.len(), 1);
/// assert_eq!(demuxed.datagrams[0].kind, SessionKind::IpSession(0));
/// assert_eq!(demuxed.datagrams[0].range, 32..96);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Demultiplexer {
    config: DemuxConfig,
}

impl Demultiplexer {
    #[must_use]
    pub const fn new(config: DemuxConfig) -> Self { Self { config } }

    #[must_use]
    pub const fn config(&self) -> &DemuxConfig { &self.config }

    /// Demultiplex one bulk transfer.
    ///
    /// # Errors
    ///
    /// Returns [`DemuxError::NotBulk`] for control transfers and otherwise
    /// the errors of [`Demultiplexer::demux_bytes`].
    pub fn demux(&self, transfer: &RawTransfer<'_>) -> Result<DemuxedTransfer, DemuxError> {
        if transfer.kind() != TransferKind::Bulk {
            return Err(DemuxError::NotBulk {
                found: transfer.kind(),
            });
        }
        self.demux_bytes(transfer.bytes())
    }

    /// Demultiplex the bytes of one bulk transfer.
    ///
    /// # Errors
    ///
    /// Fails when the transfer header is unrecognised or truncated, when a
    /// pointer or datagram is misaligned or out of range, and when the
    /// configured chain or datagram ceilings are reached.
    pub fn demux_bytes(&self, bytes: &[u8]) -> Result<DemuxedTransfer, DemuxError> {
        let header = NcmTransferHeader::parse(bytes)?;
        let width = header.width;
        let mut warnings = Vec::new();

        if usize::from(header.header_length) != width.nth_len() {
            warnings.push(DemuxWarning::HeaderLengthMismatch {
                declared: header.header_length,
                expected: width.nth_len(),
            });
        }
        if usize::try_from(header.block_length).ok() != Some(bytes.len()) {
            warnings.push(DemuxWarning::BlockLengthMismatch {
                declared: header.block_length,
                actual: bytes.len(),
            });
        }

        let mut datagrams = Vec::new();
        let mut next = header.first_ndp_index;
        if next == 0 {
            warnings.push(DemuxWarning::NoDatagramPointer);
        }
        let mut followed = 0;
        while next != 0 {
            if followed == self.config.max_ndp_chain.get() {
                return Err(DemuxError::ChainTooLong {
                    limit: self.config.max_ndp_chain.get(),
                });
            }
            followed += 1;

            let pointer = DatagramPointer::parse(bytes, next, width)?;
            if !pointer.terminated {
                warnings.push(DemuxWarning::UnterminatedEntries { ndp_index: next });
            }
            for entry in &pointer.entries {
                if entry.index == 0 || entry.length == 0 {
                    debug!("skipping empty datagram entry in pointer at {next}");
                    continue;
                }
                if datagrams.len() == self.config.max_datagrams.get() {
                    return Err(DemuxError::TooManyDatagrams {
                        limit: self.config.max_datagrams.get(),
                    });
                }
                datagrams.push(Datagram {
                    kind: pointer.kind,
                    signature: pointer.signature,
                    range: self.datagram_range(bytes, *entry)?,
                    ndp_index: next,
                });
            }
            next = pointer.next_ndp_index;
        }

        for warning in &warnings {
            warn!(
                "NCM transfer {} ({}-bit): {warning}",
                header.sequence_number,
                width.bits()
            );
        }
        debug!(
            "NCM transfer {} yielded {} datagrams from {followed} pointers",
            header.sequence_number,
            datagrams.len()
        );
        Ok(DemuxedTransfer {
            header,
            datagrams,
            warnings,
        })
    }

    fn datagram_range(&self, bytes: &[u8], entry: DatagramEntry) -> Result<Range<usize>, DemuxError> {
        let alignment = self.config.datagram_alignment.get();
        let out_of_bounds = || DemuxError::DatagramOutOfBounds {
            index: entry.index,
            length: entry.length,
            available: bytes.len(),
        };
        let start = usize::try_from(entry.index).map_err(|_| out_of_bounds())?;
        if start % alignment != 0 {
            return Err(DemuxError::MisalignedDatagram {
                index: entry.index,
                alignment,
            });
        }
        let end = usize::try_from(entry.length)
            .ok()
            .and_then(|length| start.checked_add(length))
            .filter(|end| *end <= bytes.len())
            .ok_or_else(out_of_bounds)?;
        Ok(start..end)
    }
}
