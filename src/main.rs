//! Decode a text capture of MBIM transfers.
//!
//! Prints one line per completed control message and one line per
//! demultiplexed datagram.

mod cli;

use std::{fs, io, io::Read};

use clap::Parser;
use mbimframe::{
    bulk::DemuxedTransfer,
    capture::{CaptureLine, parse_capture},
    config::DecoderConfig,
    conversation::{Conversation, ConversationEvent, DecodedControl},
};

fn config(cli: &cli::Cli) -> DecoderConfig {
    let mut config = DecoderConfig::default();
    if let Some(limit) = cli.max_message_size {
        config.framer.max_message_size = limit;
    }
    if let Some(limit) = cli.max_pending_messages {
        config.framer.max_pending_messages = limit;
    }
    if let Some(limit) = cli.max_ndp_chain {
        config.demux.max_ndp_chain = limit;
    }
    if let Some(alignment) = cli.datagram_alignment {
        config.demux.datagram_alignment = alignment;
    }
    config
}

fn print_control(line: usize, decoded: &DecodedControl) {
    let message = &decoded.message;
    let mut summary = format!(
        "line {line}: {} epoch={} tid={}",
        message.message_type(),
        message.epoch(),
        message.transaction_id()
    );
    if let Ok(Some(address)) = message.command_address() {
        summary.push_str(&format!(" {address}"));
    }
    if message.fragments() > 1 {
        summary.push_str(&format!(" fragments={}", message.fragments()));
    }
    if let Some(request) = decoded.request {
        summary.push_str(&format!(" request=line {request}"));
    }
    println!("{summary}");
}

fn print_bulk(line: usize, demuxed: &DemuxedTransfer) {
    println!(
        "line {line}: NTB seq={} {}-bit, {} datagrams",
        demuxed.header.sequence_number,
        demuxed.header.width.bits(),
        demuxed.datagrams.len()
    );
    for datagram in &demuxed.datagrams {
        println!(
            "  {} [{}..{})",
            datagram.kind, datagram.range.start, datagram.range.end
        );
    }
    for warning in &demuxed.warnings {
        println!("  warning: {warning}");
    }
}

fn decode(
    lines: &[CaptureLine],
    config: DecoderConfig,
    keep_going: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut conversation = Conversation::new(config);
    for line in lines {
        match conversation.submit(&line.transfer()) {
            Ok(ConversationEvent::Pending) => {}
            Ok(ConversationEvent::Control(decoded)) => print_control(line.line, &decoded),
            Ok(ConversationEvent::Bulk(demuxed)) => print_bulk(line.line, &demuxed),
            Err(err) if keep_going => eprintln!("line {}: {err} ({})", line.line, err.kind()),
            Err(err) => return Err(format!("line {}: {err}", line.line).into()),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let text = match &cli.capture {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let lines = parse_capture(&text)?;
    decode(&lines, config(&cli), cli.keep_going)
}
