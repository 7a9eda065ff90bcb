//! Decoder configuration.
//!
//! Every ceiling that bounds per-conversation memory or per-transfer work
//! lives here. The types derive `serde` traits so embedders can load them
//! from whatever configuration source they already use.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(value) => value,
        None => panic!("configuration default must be non-zero"),
    }
}

/// Limits applied while reassembling fragmented control messages.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use mbimframe::config::FramerConfig;
///
/// let config = FramerConfig {
///     max_pending_messages: NonZeroUsize::new(4).expect("non-zero"),
///     ..FramerConfig::default()
/// };
/// assert_eq!(config.max_pending_messages.get(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Largest reassembled body accepted for one message.
    pub max_message_size: NonZeroUsize,
    /// Bytes buffered across all partial messages of one conversation.
    pub max_pending_bytes: NonZeroUsize,
    /// Partial messages kept at once; the oldest is evicted beyond this.
    pub max_pending_messages: NonZeroUsize,
    /// Largest `total_fragments` value accepted.
    pub max_fragments: NonZeroUsize,
}

impl FramerConfig {
    pub const DEFAULT: Self = Self {
        max_message_size: non_zero(64 * 1024),
        max_pending_bytes: non_zero(256 * 1024),
        max_pending_messages: non_zero(64),
        max_fragments: non_zero(256),
    };
}

impl Default for FramerConfig {
    fn default() -> Self { Self::DEFAULT }
}

/// Limits applied to the request/response table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelatorConfig {
    /// Transactions retained; the oldest is evicted beyond this.
    pub max_pending_transactions: NonZeroUsize,
}

impl CorrelatorConfig {
    pub const DEFAULT: Self = Self {
        max_pending_transactions: non_zero(4096),
    };
}

impl Default for CorrelatorConfig {
    fn default() -> Self { Self::DEFAULT }
}

/// Limits applied while walking NCM datagram pointer chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemuxConfig {
    /// Datagram pointers followed per transfer.
    pub max_ndp_chain: NonZeroUsize,
    /// Datagrams emitted per transfer.
    pub max_datagrams: NonZeroUsize,
    /// Alignment required of datagram indices. Pointer indices are always
    /// 4-byte aligned regardless of this value.
    pub datagram_alignment: NonZeroUsize,
}

impl DemuxConfig {
    pub const DEFAULT: Self = Self {
        max_ndp_chain: non_zero(32),
        max_datagrams: non_zero(1024),
        datagram_alignment: non_zero(4),
    };
}

impl Default for DemuxConfig {
    fn default() -> Self { Self::DEFAULT }
}

/// Complete configuration for one conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub framer: FramerConfig,
    pub correlator: CorrelatorConfig,
    pub demux: DemuxConfig,
}
