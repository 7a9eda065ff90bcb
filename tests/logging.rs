//! Tests for the warnings logged when decoder state is dropped.

use std::num::NonZeroUsize;

use log::Level;
use mbimframe::{
    Conversation,
    ConversationId,
    ConversationRegistry,
    DecoderConfig,
    Direction,
    RawTransfer,
    TransferId,
    config::{CorrelatorConfig, FramerConfig},
};
use mbimframe_testing::{ControlMessageBuilder, LoggerHandle, logger, message_type};
use rstest::rstest;

fn limit(value: usize) -> NonZeroUsize { NonZeroUsize::new(value).expect("non-zero limit") }

fn submit(conversation: &mut Conversation, id: u64, direction: Direction, bytes: &[u8]) {
    conversation
        .submit(&RawTransfer::control(TransferId::new(id), direction, bytes))
        .expect("valid control transfer");
}

fn first_of_two(transaction_id: u32) -> Vec<u8> {
    ControlMessageBuilder::new(message_type::COMMAND, transaction_id)
        .body(vec![0; 32])
        .fragments(&[16, 16])
        .swap_remove(0)
}

#[rstest]
fn reopen_reports_abandoned_partials(mut logger: LoggerHandle) {
    let mut conversation = Conversation::new(DecoderConfig::default());
    let open = ControlMessageBuilder::open(1, 4096).encode();
    submit(&mut conversation, 1, Direction::HostToDevice, &open);
    submit(&mut conversation, 2, Direction::HostToDevice, &first_of_two(5));
    while logger.pop().is_some() {}

    submit(&mut conversation, 3, Direction::HostToDevice, &open);
    assert!(logger.drain_contains(Level::Warn, "abandoned 1 partial"));
    assert_eq!(conversation.framer().reassembler().pending_len(), 0);
}

#[rstest]
fn full_reassembler_reports_eviction(mut logger: LoggerHandle) {
    let config = DecoderConfig {
        framer: FramerConfig {
            max_pending_messages: limit(1),
            ..FramerConfig::default()
        },
        ..DecoderConfig::default()
    };
    let mut conversation = Conversation::new(config);
    submit(&mut conversation, 1, Direction::HostToDevice, &first_of_two(5));
    while logger.pop().is_some() {}

    submit(&mut conversation, 2, Direction::HostToDevice, &first_of_two(6));
    assert!(logger.drain_contains(Level::Warn, "evicted partial message for transaction 5"));
    assert!(conversation.framer().reassembler().is_pending(6));
}

#[rstest]
fn full_transaction_table_reports_eviction(mut logger: LoggerHandle) {
    let config = DecoderConfig {
        correlator: CorrelatorConfig {
            max_pending_transactions: limit(1),
        },
        ..DecoderConfig::default()
    };
    let mut conversation = Conversation::new(config);
    let service = *mbimframe::ServiceId::BASIC_CONNECT.as_bytes();
    let first = ControlMessageBuilder::command(1, service, 1, 0, &[]).encode();
    let second = ControlMessageBuilder::command(2, service, 1, 0, &[]).encode();
    submit(&mut conversation, 1, Direction::HostToDevice, &first);
    while logger.pop().is_some() {}

    submit(&mut conversation, 2, Direction::HostToDevice, &second);
    assert!(logger.drain_contains(Level::Warn, "transaction table full"));
    assert_eq!(conversation.correlator().len(), 1);
}

#[rstest]
fn open_through_registry_reports_connection_once(mut logger: LoggerHandle) {
    let registry = ConversationRegistry::new(DecoderConfig::default());
    let open = ControlMessageBuilder::open(1, 4096).encode();
    while logger.pop().is_some() {}

    registry
        .submit(
            ConversationId::new(1),
            &RawTransfer::control(TransferId::new(1), Direction::HostToDevice, &open),
        )
        .expect("valid OPEN");

    let mut opened = 0;
    let mut epoch_started = false;
    while let Some(record) = logger.pop() {
        if record.args().contains("connection opened") {
            opened += 1;
        }
        if record.level() == Level::Debug && record.args().contains("starts epoch 1") {
            epoch_started = true;
        }
    }
    assert_eq!(opened, 1);
    assert!(epoch_started);
}
