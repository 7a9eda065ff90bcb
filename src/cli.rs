//! Command line interface for the `mbimframe` binary.
//!
//! Kept free of crate imports so `build.rs` can render the man page from it.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;

/// Command line arguments for the `mbimframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mbimframe",
    version,
    about = "Reassemble, correlate and demultiplex MBIM transfers from a text capture"
)]
pub struct Cli {
    /// Capture file with one `<ctrl|bulk> <h2d|d2h> <hex>` transfer per line.
    /// Standard input is read when omitted.
    pub capture: Option<PathBuf>,

    /// Largest reassembled control message, in bytes.
    #[arg(long)]
    pub max_message_size: Option<NonZeroUsize>,

    /// Partial control messages kept before the oldest is evicted.
    #[arg(long)]
    pub max_pending_messages: Option<NonZeroUsize>,

    /// Datagram pointers followed per bulk transfer.
    #[arg(long)]
    pub max_ndp_chain: Option<NonZeroUsize>,

    /// Alignment required of datagram indices.
    #[arg(long)]
    pub datagram_alignment: Option<NonZeroUsize>,

    /// Report decode errors and continue with the next transfer.
    #[arg(short, long)]
    pub keep_going: bool,
}
