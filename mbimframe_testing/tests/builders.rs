//! Sanity checks for the wire builders themselves.

use mbimframe_testing::{ControlMessageBuilder, NtbBuilder, NtbWidth, TlvBuilder, message_type};
use rstest::rstest;

#[test]
fn fragments_carry_headers_and_cover_body() {
    let body: Vec<u8> = (0..=255).collect();
    let message = ControlMessageBuilder::new(message_type::COMMAND, 9).body(body.clone());
    let fragments = message.fragments(&[100, 100, 56]);

    assert_eq!(fragments.len(), 3);
    let rebuilt: Vec<u8> = fragments.iter().flat_map(|f| f[20..].to_vec()).collect();
    assert_eq!(rebuilt, body);
    assert_eq!(&fragments[1][12..16], &3u32.to_le_bytes());
    assert_eq!(&fragments[1][16..20], &1u32.to_le_bytes());
}

#[test]
fn open_has_no_fragment_header() {
    let encoded = ControlMessageBuilder::open(1, 4096).encode();
    assert_eq!(encoded.len(), 16);
    assert_eq!(&encoded[4..8], &16u32.to_le_bytes());
}

#[rstest]
#[case(NtbWidth::Sixteen, 12)]
#[case(NtbWidth::ThirtyTwo, 16)]
fn single_ndp_writes_header_length(#[case] width: NtbWidth, #[case] header_length: u16) {
    let (ntb, entries) = NtbBuilder::single_ndp(width, width.ips(0), &[vec![1; 5]]);
    assert_eq!(&ntb[4..6], &header_length.to_le_bytes());
    assert_eq!(entries.len(), 1);
    let (index, len) = entries[0];
    assert_eq!(len, 5);
    assert_eq!(ntb[index as usize], 1);
}

#[test]
fn tlv_records_are_padded() {
    let tlv = TlvBuilder::new().record(1, &[1, 2, 3]).build();
    assert_eq!(tlv.len(), 12);
    assert_eq!(tlv[3], 1);
}
