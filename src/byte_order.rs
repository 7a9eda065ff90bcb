//! Helpers for little-endian field reads.
//!
//! MBIM and NCM encode every multi-byte field little-endian. These helpers
//! keep Clippy expectations scoped to the conversion points and offer
//! bounds-checked reads at arbitrary offsets so decoders never index past a
//! transfer.

/// Parse a little-endian `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use mbimframe::byte_order::read_le_u16;
///
/// assert_eq!(read_le_u16([0x34, 0x12]), 0x1234);
/// ```
#[must_use]
pub fn read_le_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "MBIM fields are little-endian on the wire."
    )]
    u16::from_le_bytes(bytes)
}

/// Parse a little-endian `u32` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use mbimframe::byte_order::read_le_u32;
///
/// assert_eq!(read_le_u32([0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
/// ```
#[must_use]
pub fn read_le_u32(bytes: [u8; 4]) -> u32 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "MBIM fields are little-endian on the wire."
    )]
    u32::from_le_bytes(bytes)
}

/// Read a little-endian `u16` at `offset`, or `None` if it would overrun.
///
/// # Examples
///
/// ```
/// use mbimframe::byte_order::le_u16_at;
///
/// assert_eq!(le_u16_at(&[0, 0x34, 0x12], 1), Some(0x1234));
/// assert_eq!(le_u16_at(&[0, 0x34], 1), None);
/// ```
#[must_use]
pub fn le_u16_at(bytes: &[u8], offset: usize) -> Option<u16> {
    array_at(bytes, offset).map(read_le_u16)
}

/// Read a little-endian `u32` at `offset`, or `None` if it would overrun.
#[must_use]
pub fn le_u32_at(bytes: &[u8], offset: usize) -> Option<u32> {
    array_at(bytes, offset).map(read_le_u32)
}

/// Copy `N` bytes starting at `offset`, or `None` if they are not all present.
#[must_use]
pub fn array_at<const N: usize>(bytes: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    bytes.get(offset..end)?.try_into().ok()
}
