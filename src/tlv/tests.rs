//! Tests for TLV record and list decoding.

use mbimframe_testing::TlvBuilder;
use rstest::rstest;

use super::{TlvError, TlvType, decode_list, decode_one};
use crate::error::ErrorKind;

#[test]
fn wide_string_record_advances_past_header_and_payload() {
    let bytes = TlvBuilder::new().wide_string(10, "MBIM").build();
    let (record, next) = decode_one(&bytes, 0).expect("valid record");

    assert_eq!(record.tlv_type(), TlvType::WideString);
    assert_eq!(record.data_length, 8);
    assert_eq!(record.padding_length, 0);
    assert_eq!(record.wide_string().expect("even payload"), "MBIM");
    assert_eq!(next, 16);
    assert_eq!(record.encoded_len(), 16);
}

#[test]
fn padding_is_consumed_but_not_part_of_payload() {
    let bytes = TlvBuilder::new().record(13, &[1, 2, 3, 4, 5]).build();
    let (record, next) = decode_one(&bytes, 0).expect("valid record");
    assert_eq!(record.payload, &[1, 2, 3, 4, 5]);
    assert_eq!(record.padding.len(), 3);
    assert_eq!(next, 16);
}

#[test]
fn decode_one_honours_offset() {
    let bytes = TlvBuilder::new()
        .raw(&[0xff; 4])
        .record(11, &[1, 0, 2, 0])
        .build();
    let (record, next) = decode_one(&bytes, 4).expect("valid record");
    assert_eq!(record.u16_table().expect("even payload"), vec![1, 2]);
    assert_eq!(next, bytes.len());
}

#[rstest]
#[case::empty(&[], ErrorKind::Malformed)]
#[case::short_header(&[10, 0, 0, 0, 4, 0], ErrorKind::Malformed)]
#[case::payload_past_end(&[10, 0, 0, 0, 4, 0, 0, 0, 1, 2], ErrorKind::OutOfBounds)]
#[case::padding_past_end(&[10, 0, 0, 4, 2, 0, 0, 0, 1, 2, 0], ErrorKind::OutOfBounds)]
#[case::huge_length(&[10, 0, 0, 0, 0xff, 0xff, 0xff, 0xff], ErrorKind::OutOfBounds)]
fn invalid_records_are_rejected(#[case] bytes: &[u8], #[case] kind: ErrorKind) {
    let err = decode_one(bytes, 0).expect_err("invalid record");
    assert_eq!(err.kind(), kind);
}

#[test]
fn list_consumes_exactly_the_budget() {
    let bytes = TlvBuilder::new()
        .wide_string(10, "a")
        .record(12, &[0; 6])
        .record(11, &[])
        .build();
    let records = decode_list(&bytes, 0, bytes.len()).expect("valid list");
    assert_eq!(records.len(), 3);
    let consumed: usize = records.iter().map(|record| record.encoded_len()).sum();
    assert_eq!(consumed, bytes.len());
}

#[test]
fn list_stops_at_budget_before_trailing_bytes() {
    let first = TlvBuilder::new().record(13, &[1, 2, 3, 4]);
    let budget = first.len();
    let bytes = first.raw(&[0xee; 7]).build();
    let records = decode_list(&bytes, 0, budget).expect("trailing bytes outside budget");
    assert_eq!(records.len(), 1);
}

#[test]
fn zero_budget_yields_no_records() {
    assert_eq!(decode_list(&[1, 2, 3], 1, 0).expect("empty list"), vec![]);
}

#[test]
fn record_overshooting_budget_is_malformed() {
    let bytes = TlvBuilder::new()
        .record(13, &[0; 4])
        .record(13, &[0; 8])
        .build();
    let err = decode_list(&bytes, 0, bytes.len() - 4).expect_err("second record overshoots");
    assert_eq!(err, TlvError::BudgetOverrun { offset: 12, limit: 24 });
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn budget_past_buffer_is_out_of_bounds() {
    let bytes = TlvBuilder::new().record(13, &[0; 4]).build();
    let err = decode_list(&bytes, 4, bytes.len()).expect_err("budget past buffer");
    assert_eq!(err.kind(), ErrorKind::OutOfBounds);
}

#[test]
fn nested_lists_use_record_length_as_budget() {
    let inner = TlvBuilder::new().wide_string(10, "apn").record(11, &[5, 0]);
    let bytes = TlvBuilder::new()
        .nested(1, inner)
        .record(13, &[9; 4])
        .build();

    let records = decode_list(&bytes, 0, bytes.len()).expect("outer list");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].tlv_type(), TlvType::UePolicies);

    let children = records[0].children().expect("inner list");
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].wide_string().expect("string"), "apn");
    assert_eq!(children[1].u16_table().expect("table"), vec![5]);
}

#[rstest]
#[case::wide_string(true)]
#[case::table(false)]
fn odd_payloads_are_malformed(#[case] as_string: bool) {
    let bytes = TlvBuilder::new().record(10, &[1, 2, 3]).build();
    let (record, _) = decode_one(&bytes, 0).expect("valid record");
    let kind = if as_string {
        record.wide_string().map(drop)
    } else {
        record.u16_table().map(drop)
    }
    .expect_err("odd payload")
    .kind();
    assert_eq!(kind, ErrorKind::Malformed);
}

#[rstest]
#[case(0, TlvType::Invalid, "INVALID")]
#[case(10, TlvType::WideString, "WCHAR_STR")]
#[case(17, TlvType::WakePacket, "WAKE_PACKET")]
#[case(18, TlvType::Unknown(18), "UNKNOWN(0x0012)")]
fn tlv_types_round_trip_their_tags(
    #[case] tag: u16,
    #[case] expected: TlvType,
    #[case] name: &str,
) {
    let ty = TlvType::from_raw(tag);
    assert_eq!(ty, expected);
    assert_eq!(ty.raw(), tag);
    assert_eq!(ty.to_string(), name);
}
