//! Tests for fragment ordering, duplicates and resource ceilings.

use std::num::NonZeroUsize;

use rstest::{fixture, rstest};

use crate::{
    config::FramerConfig,
    control::{ControlHeader, FragmentHeader, FramerError, MessageType, Reassembler},
    error::ErrorKind,
};

fn header(message_type: MessageType, transaction_id: u32) -> ControlHeader {
    ControlHeader {
        message_type,
        message_length: 0,
        transaction_id,
    }
}

fn command(transaction_id: u32) -> ControlHeader { header(MessageType::Command, transaction_id) }

fn limits(max_message_size: usize, max_pending_bytes: usize, max_pending_messages: usize) -> FramerConfig {
    FramerConfig {
        max_message_size: NonZeroUsize::new(max_message_size).expect("non-zero"),
        max_pending_bytes: NonZeroUsize::new(max_pending_bytes).expect("non-zero"),
        max_pending_messages: NonZeroUsize::new(max_pending_messages).expect("non-zero"),
        ..FramerConfig::default()
    }
}

#[fixture]
fn reassembler() -> Reassembler { Reassembler::new(FramerConfig::default()) }

#[rstest]
fn single_fragment_completes_immediately(mut reassembler: Reassembler) {
    let body = reassembler
        .push(&command(1), FragmentHeader::SINGLE, &[1, 2, 3])
        .expect("single fragment accepted")
        .expect("single fragment completes");

    assert_eq!(body.body.as_ref(), &[1, 2, 3]);
    assert_eq!(body.fragments, 1);
    assert_eq!(reassembler.pending_len(), 0);
}

#[rstest]
fn ordered_fragments_concatenate(mut reassembler: Reassembler) {
    assert!(
        reassembler
            .push(&command(2), FragmentHeader::new(2, 0), &[5, 6, 7])
            .expect("first fragment accepted")
            .is_none()
    );
    assert_eq!(reassembler.pending_bytes(), 3);

    let body = reassembler
        .push(&command(2), FragmentHeader::new(2, 1), &[8, 9])
        .expect("final fragment accepted")
        .expect("message completes");

    assert_eq!(body.body.as_ref(), &[5, 6, 7, 8, 9]);
    assert!(!body.reordered);
    assert_eq!(reassembler.pending_len(), 0);
    assert_eq!(reassembler.pending_bytes(), 0);
}

#[rstest]
fn reversed_delivery_completes_on_last_missing_index(mut reassembler: Reassembler) {
    for current in [2, 1] {
        assert!(
            reassembler
                .push(&command(3), FragmentHeader::new(3, current), &[current as u8])
                .expect("fragment accepted")
                .is_none()
        );
    }
    let body = reassembler
        .push(&command(3), FragmentHeader::new(3, 0), &[0])
        .expect("fragment 0 accepted")
        .expect("fragment 0 fills the set");

    assert_eq!(body.body.as_ref(), &[0, 1, 2]);
    assert!(body.reordered, "fragment 0 arrived last");
}

#[rstest]
fn duplicate_fragment_overwrites(mut reassembler: Reassembler) {
    reassembler
        .push(&command(4), FragmentHeader::new(2, 0), &[1, 1, 1, 1])
        .expect("first copy accepted");
    reassembler
        .push(&command(4), FragmentHeader::new(2, 0), &[2, 2])
        .expect("duplicate accepted");
    assert_eq!(reassembler.pending_bytes(), 2);

    let body = reassembler
        .push(&command(4), FragmentHeader::new(2, 1), &[3])
        .expect("final accepted")
        .expect("message completes");
    assert_eq!(body.body.as_ref(), &[2, 2, 3]);
}

#[rstest]
fn inconsistent_total_is_rejected_and_pending_kept(mut reassembler: Reassembler) {
    reassembler
        .push(&command(5), FragmentHeader::new(3, 0), &[1])
        .expect("first accepted");

    let err = reassembler
        .push(&command(5), FragmentHeader::new(4, 1), &[2])
        .expect_err("total mismatch must fail");
    assert!(matches!(
        err,
        FramerError::InconsistentFragment {
            expected_total: 3,
            found_total: 4,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(reassembler.is_pending(5));
    assert_eq!(reassembler.pending_bytes(), 1);
}

#[rstest]
fn type_change_within_set_is_rejected(mut reassembler: Reassembler) {
    reassembler
        .push(&command(6), FragmentHeader::new(2, 0), &[1])
        .expect("first accepted");
    let err = reassembler
        .push(
            &header(MessageType::CommandDone, 6),
            FragmentHeader::new(2, 1),
            &[2],
        )
        .expect_err("type change must fail");
    assert!(matches!(err, FramerError::InconsistentFragment { .. }));
}

#[rstest]
#[case::zero_total(FragmentHeader::new(0, 0), ErrorKind::Malformed)]
#[case::current_past_total(FragmentHeader::new(2, 2), ErrorKind::Malformed)]
#[case::too_many_fragments(FragmentHeader::new(100_000, 0), ErrorKind::ResourceLimit)]
fn invalid_fragment_headers_are_rejected(
    mut reassembler: Reassembler,
    #[case] fragment: FragmentHeader,
    #[case] kind: ErrorKind,
) {
    let err = reassembler
        .push(&command(7), fragment, &[0])
        .expect_err("invalid header must fail");
    assert_eq!(err.kind(), kind);
    assert_eq!(reassembler.pending_len(), 0);
}

#[test]
fn message_size_limit_applies_across_fragments() {
    let mut reassembler = Reassembler::new(limits(8, 64, 4));
    reassembler
        .push(&command(8), FragmentHeader::new(2, 0), &[0; 6])
        .expect("within limit");

    let err = reassembler
        .push(&command(8), FragmentHeader::new(2, 1), &[0; 3])
        .expect_err("9 bytes exceeds the limit");
    assert!(matches!(
        err,
        FramerError::MessageTooLarge { attempted: 9, .. }
    ));
}

#[test]
fn message_at_exact_limit_is_accepted() {
    let mut reassembler = Reassembler::new(limits(8, 64, 4));
    reassembler
        .push(&command(9), FragmentHeader::new(2, 0), &[0; 4])
        .expect("first accepted");
    let body = reassembler
        .push(&command(9), FragmentHeader::new(2, 1), &[0; 4])
        .expect("exactly at limit")
        .expect("complete");
    assert_eq!(body.body.len(), 8);
}

#[test]
fn pending_budget_spans_transactions() {
    let mut reassembler = Reassembler::new(limits(16, 20, 8));
    reassembler
        .push(&command(10), FragmentHeader::new(2, 0), &[0; 12])
        .expect("first transaction buffered");

    let err = reassembler
        .push(&command(11), FragmentHeader::new(2, 0), &[0; 12])
        .expect_err("24 pending bytes exceed the budget");
    assert_eq!(err.kind(), ErrorKind::ResourceLimit);
    assert!(reassembler.is_pending(10));
    assert!(!reassembler.is_pending(11));
}

#[test]
fn rejected_fragment_does_not_evict_at_count_ceiling() {
    let mut reassembler = Reassembler::new(limits(64, 20, 1));
    reassembler
        .push(&command(10), FragmentHeader::new(2, 0), &[0; 12])
        .expect("first transaction buffered");

    let err = reassembler
        .push(&command(11), FragmentHeader::new(2, 0), &[0; 24])
        .expect_err("24 bytes exceed the budget even after eviction");
    assert!(matches!(
        err,
        FramerError::PendingBudgetExceeded {
            transaction_id: 11,
            ..
        }
    ));
    assert!(reassembler.is_pending(10), "rejected fragment must not evict");
    assert_eq!(reassembler.pending_len(), 1);
    assert_eq!(reassembler.pending_bytes(), 12);
}

#[test]
fn eviction_frees_budget_for_the_new_transaction() {
    let mut reassembler = Reassembler::new(limits(64, 20, 1));
    reassembler
        .push(&command(10), FragmentHeader::new(2, 0), &[0; 12])
        .expect("first transaction buffered");
    reassembler
        .push(&command(11), FragmentHeader::new(2, 0), &[0; 16])
        .expect("evicting transaction 10 leaves room");

    assert!(!reassembler.is_pending(10));
    assert!(reassembler.is_pending(11));
    assert_eq!(reassembler.pending_bytes(), 16);
}

#[test]
fn oldest_partial_is_evicted_at_count_ceiling() {
    let mut reassembler = Reassembler::new(limits(64, 256, 2));
    for transaction_id in [20, 21, 22] {
        reassembler
            .push(&command(transaction_id), FragmentHeader::new(2, 0), &[1, 2])
            .expect("fragment accepted");
    }

    assert_eq!(reassembler.pending_len(), 2);
    assert!(!reassembler.is_pending(20), "oldest evicted");
    assert!(reassembler.is_pending(21));
    assert!(reassembler.is_pending(22));
    assert_eq!(reassembler.pending_bytes(), 4);
}

#[rstest]
fn abandon_and_discard_release_memory(mut reassembler: Reassembler) {
    for transaction_id in [30, 31] {
        reassembler
            .push(&command(transaction_id), FragmentHeader::new(2, 0), &[0; 5])
            .expect("fragment accepted");
    }
    assert!(reassembler.discard(30));
    assert!(!reassembler.discard(30));
    assert_eq!(reassembler.pending_bytes(), 5);

    assert_eq!(reassembler.abandon_all(), 1);
    assert_eq!(reassembler.pending_bytes(), 0);
}
