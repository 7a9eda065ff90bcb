//! Integration tests for NCM bulk transfer demultiplexing.

use mbimframe::{
    Conversation,
    ConversationEvent,
    DecoderConfig,
    Demultiplexer,
    Direction,
    ErrorKind,
    RawTransfer,
    SessionKind,
    TransferId,
    config::DemuxConfig,
};
use mbimframe_testing::{NtbBuilder, NtbWidth};
use proptest::{prelude::Strategy, prop_assert, prop_assert_eq, test_runner::TestCaseError};
use rstest::rstest;

mod common;
use common::deterministic_runner;

#[test]
fn bulk_transfer_routes_through_the_conversation() {
    let bytes = NtbBuilder::new(NtbWidth::Sixteen, 96)
        .first_ndp(16)
        .ndp(16, NtbWidth::Sixteen.ips(0), 0, &[(32, 64)])
        .datagram(32, &[0x45; 64])
        .build();
    let mut conversation = Conversation::new(DecoderConfig::default());
    let event = conversation
        .submit(&RawTransfer::bulk(TransferId::new(1), Direction::DeviceToHost, &bytes))
        .expect("valid transfer");

    let ConversationEvent::Bulk(demuxed) = event else {
        panic!("bulk transfers are demultiplexed");
    };
    assert_eq!(demuxed.datagrams.len(), 1);
    let datagram = &demuxed.datagrams[0];
    assert_eq!(datagram.kind, SessionKind::IpSession(0));
    assert_eq!(datagram.range, 32..96);
    assert_eq!(datagram.payload(&bytes), Some(&[0x45; 64][..]));
}

/// A chain of `count` empty 16-bit pointers, each linking to the next.
fn chain(count: usize) -> Vec<u8> {
    let offsets: Vec<usize> = (0..count).map(|i| 16 + 12 * i).collect();
    let mut builder = NtbBuilder::new(NtbWidth::Sixteen, 16 + 12 * count).first_ndp(16);
    for (i, offset) in offsets.iter().enumerate() {
        let next = offsets.get(i + 1).map_or(0, |next| *next as u32);
        builder = builder.ndp(*offset, NtbWidth::Sixteen.ips(0), next, &[]);
    }
    builder.build()
}

#[rstest]
#[case(96)]
fn pointer_chains_stop_at_the_configured_ceiling(#[case] cases: u32) {
    let demux = Demultiplexer::new(DemuxConfig::default());
    let limit = demux.config().max_ndp_chain.get();
    let mut runner = deterministic_runner(cases);
    runner
        .run(&(1usize..80), |count| {
            let bytes = chain(count);
            let result = demux.demux_bytes(&bytes);
            if count <= limit {
                let demuxed = result
                    .map_err(|err| TestCaseError::fail(format!("chain of {count} rejected: {err}")))?;
                prop_assert!(demuxed.datagrams.is_empty());
            } else {
                let err = result
                    .err()
                    .ok_or_else(|| TestCaseError::fail(format!("chain of {count} accepted")))?;
                prop_assert_eq!(err.kind(), ErrorKind::ResourceLimit);
            }
            Ok(())
        })
        .expect("chain ceiling should bound every transfer");
}

fn out_of_bounds_entry() -> impl Strategy<Value = (u32, u32)> {
    (9u32..64, 1u32..256)
        .prop_map(|(slot, length)| (slot * 4, length))
        .prop_filter("entry must overrun the transfer", |(index, length)| {
            index + length > 64
        })
}

#[rstest]
#[case(128)]
fn entries_past_the_transfer_are_out_of_bounds(#[case] cases: u32) {
    let demux = Demultiplexer::new(DemuxConfig::default());
    let mut runner = deterministic_runner(cases);
    runner
        .run(&out_of_bounds_entry(), |(index, length)| {
            let bytes = NtbBuilder::new(NtbWidth::Sixteen, 64)
                .first_ndp(16)
                .ndp(16, NtbWidth::Sixteen.ips(0), 0, &[(index, length)])
                .build();
            let err = demux
                .demux_bytes(&bytes)
                .err()
                .ok_or_else(|| TestCaseError::fail(format!("({index}, {length}) accepted")))?;
            prop_assert_eq!(err.kind(), ErrorKind::OutOfBounds);
            Ok(())
        })
        .expect("overrunning entries should be rejected");
}
