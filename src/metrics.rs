//! Metric helpers for `mbimframe`.
//!
//! This module defines metric names and helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers do nothing.

#[cfg(feature = "metrics")]
use metrics::counter;

use crate::{error::ErrorKind, transfer::TransferKind};

/// Name of the counter tracking decoded transfers.
pub const TRANSFERS_DECODED: &str = "mbimframe_transfers_decoded_total";
/// Name of the counter tracking completed control messages.
pub const MESSAGES_COMPLETED: &str = "mbimframe_messages_completed_total";
/// Name of the counter tracking demultiplexed datagrams.
pub const DATAGRAMS_DEMUXED: &str = "mbimframe_datagrams_demuxed_total";
/// Name of the counter tracking decode errors.
pub const DECODE_ERRORS: &str = "mbimframe_decode_errors_total";

const fn kind_label(kind: TransferKind) -> &'static str {
    match kind {
        TransferKind::Control => "control",
        TransferKind::Bulk => "bulk",
    }
}

/// Record a transfer submitted for decoding.
pub fn inc_transfers(kind: TransferKind) {
    #[cfg(feature = "metrics")]
    counter!(TRANSFERS_DECODED, "kind" => kind_label(kind)).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind_label(kind);
}

/// Record a completed control message.
pub fn inc_messages() {
    #[cfg(feature = "metrics")]
    counter!(MESSAGES_COMPLETED).increment(1);
}

/// Record `count` datagrams emitted from one bulk transfer.
pub fn add_datagrams(count: usize) {
    #[cfg(feature = "metrics")]
    counter!(DATAGRAMS_DEMUXED).increment(u64::try_from(count).unwrap_or(u64::MAX));
    #[cfg(not(feature = "metrics"))]
    let _ = count;
}

/// Record a decode error of the given kind.
pub fn inc_errors(kind: ErrorKind) {
    #[cfg(feature = "metrics")]
    counter!(DECODE_ERRORS, "kind" => kind.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}
