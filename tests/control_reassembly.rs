//! Integration tests for control reassembly and request correlation.

use mbimframe::{
    Conversation,
    ConversationEvent,
    DecoderConfig,
    Direction,
    FramerStatus,
    MessageFramer,
    RawTransfer,
    TransferId,
    config::FramerConfig,
    control::{ConnectionEpoch, MessageType},
    service::ServiceId,
};
use mbimframe_testing::{ControlMessageBuilder, message_type};
use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any},
    prop_assert,
    prop_assert_eq,
    test_runner::TestCaseError,
};
use rstest::rstest;

mod common;
use common::deterministic_runner;

fn submit(conversation: &mut Conversation, id: u64, direction: Direction, bytes: &[u8]) -> ConversationEvent {
    conversation
        .submit(&RawTransfer::control(TransferId::new(id), direction, bytes))
        .expect("valid control transfer")
}

#[test]
fn fragmented_command_reassembles_and_links_its_completion() {
    let mut conversation = Conversation::new(DecoderConfig::default());
    let open = ControlMessageBuilder::open(1, 4096).encode();
    submit(&mut conversation, 1, Direction::HostToDevice, &open);
    assert_eq!(conversation.epoch(), ConnectionEpoch::new(1));

    let information: Vec<u8> = (0..572u32).map(|i| (i % 256) as u8).collect();
    let command = ControlMessageBuilder::command(
        7,
        *ServiceId::BASIC_CONNECT.as_bytes(),
        12,
        1,
        &information,
    );
    assert_eq!(command.body_bytes().len(), 600);
    let fragments = command.fragments(&[256, 256, 88]);

    assert_eq!(
        submit(&mut conversation, 2, Direction::HostToDevice, &fragments[0]),
        ConversationEvent::Pending
    );
    assert_eq!(
        submit(&mut conversation, 3, Direction::HostToDevice, &fragments[1]),
        ConversationEvent::Pending
    );
    let ConversationEvent::Control(request) =
        submit(&mut conversation, 4, Direction::HostToDevice, &fragments[2])
    else {
        panic!("third fragment completes the command");
    };
    assert_eq!(request.message.body(), command.body_bytes());
    assert_eq!(request.message.to_bytes().as_ref(), command.encode().as_slice());
    assert_eq!(request.message.epoch(), ConnectionEpoch::new(1));
    assert_eq!(request.message.transaction_id(), 7);

    let done = ControlMessageBuilder::command_done(
        7,
        *ServiceId::BASIC_CONNECT.as_bytes(),
        12,
        0,
        &[],
    )
    .encode();
    let ConversationEvent::Control(response) =
        submit(&mut conversation, 5, Direction::DeviceToHost, &done)
    else {
        panic!("COMMAND_DONE is a single transfer");
    };
    assert_eq!(response.message.message_type(), MessageType::CommandDone);
    assert_eq!(response.request, Some(TransferId::new(4)));
}

#[rstest]
#[case::two(2)]
#[case::five(5)]
fn completion_before_request_does_not_resolve(#[case] transaction_id: u32) {
    let mut conversation = Conversation::new(DecoderConfig::default());
    let done = ControlMessageBuilder::command_done(
        transaction_id,
        *ServiceId::SMS.as_bytes(),
        1,
        0,
        &[],
    )
    .encode();
    let ConversationEvent::Control(response) =
        submit(&mut conversation, 1, Direction::DeviceToHost, &done)
    else {
        panic!("COMMAND_DONE is a single transfer");
    };
    assert_eq!(response.request, None);
}

fn delivery_strategy() -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    (vec(any::<u8>(), 1..512), 1usize..8).prop_flat_map(|(body, fragments)| {
        let order = Just((0..fragments).collect::<Vec<_>>()).prop_shuffle();
        (Just(body), order)
    })
}

#[rstest]
#[case(64)]
#[case(128)]
fn any_delivery_order_reassembles_the_same_bytes(#[case] cases: u32) {
    let mut runner = deterministic_runner(cases);
    runner
        .run(&delivery_strategy(), |(body, order)| {
            let message = ControlMessageBuilder::new(message_type::COMMAND, 9).body(body.clone());
            let chunk = body.len().div_ceil(order.len());
            let fragments = message.fragments(&vec![chunk; order.len()]);

            let mut framer = MessageFramer::new(FramerConfig::default());
            let mut completed = None;
            for (step, index) in order.iter().enumerate() {
                let transfer = RawTransfer::control(
                    TransferId::new(step as u64),
                    Direction::HostToDevice,
                    &fragments[*index],
                );
                let status = framer
                    .submit(&transfer)
                    .map_err(|err| TestCaseError::fail(format!("fragment rejected: {err}")))?;
                if step + 1 < order.len() {
                    prop_assert_eq!(&status, &FramerStatus::Incomplete);
                } else {
                    completed = status.into_message();
                }
            }

            let message = completed
                .ok_or_else(|| TestCaseError::fail("last fragment did not complete".to_owned()))?;
            prop_assert_eq!(message.body(), body.as_slice());
            prop_assert_eq!(message.fragments() as usize, order.len());
            prop_assert!(framer.reassembler().pending_len() == 0);
            Ok(())
        })
        .expect("reassembly should not depend on delivery order");
}
