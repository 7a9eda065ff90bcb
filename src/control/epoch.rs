use derive_more::{Display, From, Into};

/// Count of OPEN messages observed on a conversation.
///
/// Transaction ids are unique only between two OPENs, so correlation keys
/// pair them with the epoch. Epoch `0` covers traffic captured before the
/// first OPEN.
///
/// # Examples
///
/// ```
/// use mbimframe::control::ConnectionEpoch;
/// let epoch = ConnectionEpoch::initial();
/// assert_eq!(epoch.next().get(), 1);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into,
)]
#[display("{_0}")]
pub struct ConnectionEpoch(u64);

impl ConnectionEpoch {
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    /// Epoch in force before any OPEN is seen.
    #[must_use]
    pub const fn initial() -> Self { Self(0) }

    #[must_use]
    pub const fn get(self) -> u64 { self.0 }

    /// The epoch that follows this one. Saturates rather than wrapping.
    #[must_use]
    pub const fn next(self) -> Self { Self(self.0.saturating_add(1)) }
}
