//! Raw USB transfers as delivered to the decoder.
//!
//! A [`RawTransfer`] borrows the caller's buffer for the duration of one
//! decode call; nothing in the core retains the borrow.

use derive_more::{Display, From, Into};

/// Direction of a USB transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    HostToDevice,
    DeviceToHost,
}

/// Pipe a transfer travelled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferKind {
    Control,
    Bulk,
}

/// Caller-assigned identity of a transfer, such as a capture frame number.
///
/// Correlation stores these to point completions back at their request.
///
/// # Examples
///
/// ```
/// use mbimframe::TransferId;
/// let id = TransferId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into,
)]
#[display("{_0}")]
pub struct TransferId(u64);

impl TransferId {
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// One transfer's bytes tagged with its direction and pipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawTransfer<'a> {
    id: TransferId,
    direction: Direction,
    kind: TransferKind,
    bytes: &'a [u8],
}

impl<'a> RawTransfer<'a> {
    #[must_use]
    pub const fn new(
        id: TransferId,
        direction: Direction,
        kind: TransferKind,
        bytes: &'a [u8],
    ) -> Self {
        Self {
            id,
            direction,
            kind,
            bytes,
        }
    }

    /// A control-pipe transfer.
    #[must_use]
    pub const fn control(id: TransferId, direction: Direction, bytes: &'a [u8]) -> Self {
        Self::new(id, direction, TransferKind::Control, bytes)
    }

    /// A bulk-pipe transfer.
    #[must_use]
    pub const fn bulk(id: TransferId, direction: Direction, bytes: &'a [u8]) -> Self {
        Self::new(id, direction, TransferKind::Bulk, bytes)
    }

    #[must_use]
    pub const fn id(&self) -> TransferId { self.id }

    #[must_use]
    pub const fn direction(&self) -> Direction { self.direction }

    #[must_use]
    pub const fn kind(&self) -> TransferKind { self.kind }

    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] { self.bytes }

    #[must_use]
    pub const fn len(&self) -> usize { self.bytes.len() }

    #[must_use]
    pub const fn is_empty(&self) -> bool { self.bytes.is_empty() }
}
